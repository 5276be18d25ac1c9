use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "words.json".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LexiconConfig {
    /// Primary dataset, required at startup
    #[serde(default = "default_path")]
    pub path: String,
    /// Extra datasets merged over the primary one
    #[serde(default)]
    pub additional_paths: Vec<String>,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            additional_paths: vec![],
        }
    }
}
