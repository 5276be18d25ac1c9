#[derive(Debug, thiserror::Error)]
pub enum DatasetLoadError {
    #[error("Cannot read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("Malformed entry {word}: MEANINGS is missing")]
    MalformedEntry { word: String },
}
