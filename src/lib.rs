pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FeedNewsProvider, InMemoryStore, StoreSnapshot};
pub use config::AppConfig;
pub use crate::core::{
    content::TvContentService,
    monitor::ContentMonitor,
    playlist::{build_playlist, PlaylistBuilder},
};
pub use utils::error::{CondoTvError, Result};
