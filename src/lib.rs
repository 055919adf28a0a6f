//! Product data extraction for price tracking.
//!
//! Given a product page URL, [`Extractor`] fetches the page, picks a
//! strategy (by platform fingerprint or, in legacy mode, by hostname) and
//! returns a validated [`ProductRecord`]. Persistence is left to the caller.

pub mod config;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod normalize;
pub mod page;
pub mod selection;
pub mod strategies;
pub mod structured;

pub use config::{Config, SelectionMode};
pub use error::{ExtractionError, FetchError, RequiredField, StrategyError};
pub use extractor::Extractor;
pub use models::ProductRecord;
pub use strategies::StrategyKind;
