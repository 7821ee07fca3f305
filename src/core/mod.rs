pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{MatchInput, MatchReport};
pub use crate::domain::ports::{ConfigProvider, MarketplaceApi, MatchSource, Pipeline, Storage};
pub use crate::utils::error::Result;
