// Adapters layer: concrete implementations of the domain ports.

pub mod memory_store;
pub mod news;

pub use memory_store::{InMemoryStore, StoreSnapshot};
pub use news::FeedNewsProvider;
