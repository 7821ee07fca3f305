pub mod adapters;
pub mod api;
pub mod browse;
pub mod config;
pub mod core;
pub mod domain;
pub mod matching;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::MatchArgs;
pub use config::{cli::LocalStorage, toml_config::AppConfig};

pub use adapters::JsonFileSource;
pub use api::ApiClient;
pub use crate::core::{engine::MatchEngine, pipeline::ShiftMatchPipeline};
pub use matching::{calculate_shift_matches, get_top_matches};
pub use utils::error::{MarketplaceError, Result};
