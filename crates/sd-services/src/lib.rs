pub mod config;
pub mod error;
pub mod fetch;
pub mod ideas;
pub mod images;

pub use config::ServiceConfig;
pub use error::ClientError;
pub use fetch::HttpFetcher;
pub use ideas::IdeaClient;
pub use images::{ImageHit, ImageSearchClient};
