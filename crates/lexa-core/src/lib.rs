pub mod error;
pub mod lexicon;
pub mod loader;
pub mod preprocess;
pub mod render;

pub use error::{DatasetLoadError, EntryError};
pub use lexicon::{Lexicon, LexiconEntry, LexiconMetadata, Meaning};
pub use loader::LexiconLoader;
pub use render::{EntryRenderer, Markup, RenderedEntry};
