//! Shared application state
//!
//! Built once at startup from configuration and passed read-only into every
//! handler via `web::Data`. The adapter, postcode table, and reference
//! tables are never mutated after load; the flat-file logs serialize their
//! own writes internally.

use crate::config::Config;
use crate::dataset::{DatasetLogger, FeedbackLog};
use crate::error::ApiError;
use crate::geocode::{Geocoder, PostcodeTable};
use crate::scrape::{HttpProductScraper, ProductScraper};
use ecotrace_model::{ModelBundle, ScoringAdapter};
use std::sync::Arc;

pub struct AppState {
    pub adapter: ScoringAdapter,
    pub scraper: Arc<dyn ProductScraper>,
    pub geocoder: Arc<dyn Geocoder>,
    pub dataset: DatasetLogger,
    /// Clean training log: scraped rows with every value in-vocabulary
    pub training: DatasetLogger,
    pub feedback: FeedbackLog,
}

impl AppState {
    /// Load everything the handlers need: model bundle, postcode table,
    /// flat-file log paths.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let bundle = ModelBundle::from_file(&config.model.bundle_path)?;
        let geocoder = PostcodeTable::from_csv(&config.data.postcode_path)?;

        Ok(Self {
            adapter: ScoringAdapter::new(bundle),
            scraper: Arc::new(HttpProductScraper::new()?),
            geocoder: Arc::new(geocoder),
            dataset: DatasetLogger::new(&config.data.dataset_path),
            training: DatasetLogger::new(&config.data.training_path),
            feedback: FeedbackLog::new(&config.data.feedback_path),
        })
    }

    /// Assemble state from parts, for tests and embedding.
    pub fn new(
        adapter: ScoringAdapter,
        scraper: Arc<dyn ProductScraper>,
        geocoder: Arc<dyn Geocoder>,
        dataset: DatasetLogger,
        training: DatasetLogger,
        feedback: FeedbackLog,
    ) -> Self {
        Self {
            adapter,
            scraper,
            geocoder,
            dataset,
            training,
            feedback,
        }
    }
}
