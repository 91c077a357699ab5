pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use models::{EnrichedProduct, Enrichment, PublishPayload, PublishReport, RawListing};
pub use services::DailyPipeline;
