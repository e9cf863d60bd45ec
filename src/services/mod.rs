//! External collaborators consumed through traits.

pub mod credentials;
pub mod market_data;
pub mod sentiment;

pub use credentials::{CredentialStore, EnvCredentialStore, StaticCredentialStore};
pub use market_data::{MarketDataError, MarketDataProvider, StaticMarketDataProvider};
pub use sentiment::{
    FearGreedSource, FixedSentimentSource, MarketBreadthSource, SentimentError, SentimentReading,
    SentimentSource,
};
