use serde::{Deserialize, Serialize};

fn default_markup() -> String {
    "plain".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RenderConfig {
    /// "plain" for terminals, "html" for rich-text front ends
    #[serde(default = "default_markup")]
    pub markup: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            markup: default_markup(),
        }
    }
}
