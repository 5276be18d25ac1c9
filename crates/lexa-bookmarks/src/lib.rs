mod error;
mod store;

pub use error::BookmarkStoreError;
pub use store::{BookmarkStore, Toggle};
