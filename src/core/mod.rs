pub mod content;
pub mod monitor;
pub mod playlist;

pub use crate::domain::model::{ContentItem, ContentKind, ContentProportion, Playlist};
pub use crate::domain::ports::{ContentStore, MonitorStore, NewsProvider};
pub use crate::utils::error::Result;
