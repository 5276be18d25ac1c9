use std::path::Path;

use crate::error::DatasetLoadError;
use crate::lexicon::Lexicon;

pub struct LexiconLoader;

impl LexiconLoader {
    /// Load a dataset from file path
    pub fn load_from_file(path: &Path) -> Result<Lexicon, DatasetLoadError> {
        tracing::info!("Loading lexicon from file: {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|source| DatasetLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut lexicon = Lexicon::from_json(&json)?;
        lexicon.set_source(path.display().to_string());
        tracing::info!("Loaded {} lexicon entries from file", lexicon.len());
        Ok(lexicon)
    }

    /// Load the primary dataset, then merge additional ones over it.
    /// Only the primary dataset is required; broken extras are skipped.
    pub fn load_with_additional(
        primary: &Path,
        additional_paths: &[String],
    ) -> Result<Lexicon, DatasetLoadError> {
        let mut lexicon = Self::load_from_file(primary)?;

        for path in additional_paths {
            match Self::load_from_file(Path::new(path)) {
                Ok(additional) => {
                    tracing::info!("Merging additional lexicon from: {}", path);
                    lexicon = Self::merge(lexicon, additional);
                }
                Err(e) => {
                    tracing::warn!("Failed to load lexicon from {}: {}", path, e);
                }
            }
        }

        Ok(lexicon)
    }

    /// Merge two lexicons (later entries override earlier ones by word)
    pub fn merge(base: Lexicon, additional: Lexicon) -> Lexicon {
        base.merge(additional)
    }
}
