use std::sync::Arc;
use std::time::Duration;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::clients::HttpClient;
use crate::config::{PipelineConfig, Settings};
use crate::error::Result;
use crate::models::{EnrichedProduct, PublishPayload, PublishReport, RawListing};
use crate::services::builder::ProductBuilder;
use crate::services::fallback::fallback_listings;
use crate::services::image::{HttpPageFetcher, ImageResolver};
use crate::services::llm::Translator;
use crate::services::producthunt::{PostsPageSource, ProductHuntApi, ProductHuntAuth, fetch_top_listings};
use crate::services::publisher::Publisher;

/// Where the day's listings come from.
enum ListingSource {
    Api(Arc<dyn PostsPageSource>),
    /// Credentials were missing; only the fallback dataset is available.
    Unavailable(String),
}

/// Fetch → enrich → publish, run once per invocation.
pub struct DailyPipeline {
    source: ListingSource,
    builder: ProductBuilder,
    publisher: Publisher,
    top_count: usize,
    config: PipelineConfig,
}

impl DailyPipeline {
    pub fn new(
        source: Arc<dyn PostsPageSource>,
        builder: ProductBuilder,
        publisher: Publisher,
        top_count: usize,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source: ListingSource::Api(source),
            builder,
            publisher,
            top_count,
            config,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let source = match ProductHuntAuth::from_credentials(&settings.credentials) {
            Ok(auth) => ListingSource::Api(Arc::new(ProductHuntApi::new(&settings.producthunt, auth)?)),
            Err(e) => {
                warn!(error = %e, "Product Hunt credentials missing");
                ListingSource::Unavailable(e.to_string())
            }
        };

        let fetcher = HttpPageFetcher::new(
            HttpClient::plain()?,
            Duration::from_secs(settings.images.scrape_timeout_secs),
        );
        let builder = ProductBuilder::new(
            Translator::from_settings(settings)?,
            ImageResolver::new(Arc::new(fetcher))?,
            &settings.display,
        )?;

        Ok(Self {
            source,
            builder,
            publisher: Publisher::from_settings(settings)?,
            top_count: settings.producthunt.top_count,
            config: settings.pipeline.clone(),
        })
    }

    async fn listings(&self, date: NaiveDate) -> Vec<RawListing> {
        let fetched = match &self.source {
            ListingSource::Api(source) => fetch_top_listings(source.as_ref(), date, self.top_count).await,
            ListingSource::Unavailable(reason) => {
                warn!(reason = %reason, "Skipping fetch, using fallback listings");
                return fallback_listings();
            }
        };

        match fetched {
            Ok(listings) => listings,
            Err(e) => {
                warn!(error = %e, "Failed to fetch Product Hunt listings, using fallback listings");
                fallback_listings()
            }
        }
    }

    /// Fetches and enriches the listings posted on `date`, highest votes first.
    pub async fn collect(&self, date: NaiveDate) -> Vec<EnrichedProduct> {
        let listings = self.listings(date).await;
        let mut products = self.builder.build_all(listings).await;

        if self.config.require_image {
            let before = products.len();
            products.retain(|product| !product.og_image_url.is_empty());
            if products.len() < before {
                info!(dropped = before - products.len(), "Dropped products without images");
            }
        }

        for (index, product) in products.iter().enumerate() {
            debug!(markdown = %product.to_markdown(index + 1), "Enriched product");
        }
        products
    }

    /// Enriches the posts of `listing_date` and publishes them as the digest sent on `today`.
    pub async fn run(&self, today: NaiveDate, listing_date: NaiveDate) -> Result<PublishReport> {
        info!(listing_date = %listing_date, "Starting daily digest");
        let products = self.collect(listing_date).await;
        let payload = PublishPayload::new(listing_date, today, products);
        self.publisher.publish(&payload).await
    }
}
