use chrono::FixedOffset;
use tracing::{info, warn};

use crate::config::DisplayConfig;
use crate::error::Result;
use crate::models::{EnrichedProduct, RawListing, featured_flag};
use crate::services::image::ImageResolver;
use crate::services::llm::Translator;
use crate::utils::time::{display_offset, to_display_time};

/// Turns raw listings into enriched products, one call at a time.
#[derive(Clone)]
pub struct ProductBuilder {
    translator: Translator,
    images: ImageResolver,
    offset: FixedOffset,
    time_format: String,
}

impl ProductBuilder {
    pub fn new(translator: Translator, images: ImageResolver, display: &DisplayConfig) -> Result<Self> {
        Ok(Self {
            translator,
            images,
            offset: display_offset(display.utc_offset_hours)?,
            time_format: display.time_format.clone(),
        })
    }

    pub async fn build(&self, raw: RawListing) -> EnrichedProduct {
        info!(product = %raw.name, votes = raw.votes_count, "Enriching listing");

        let description = raw.description.unwrap_or_default();
        let image = self.images.resolve(&raw.name, raw.media.as_deref(), &raw.url).await;
        let tagline = self.translator.translate(&raw.tagline).await;
        let trans_description = self.translator.translate(&description).await;
        let keywords = self.translator.keywords(&raw.name, &raw.tagline, &description).await;

        let created_at = to_display_time(&raw.created_at, self.offset, &self.time_format)
            .unwrap_or_else(|e| {
                warn!(product = %raw.name, created_at = %raw.created_at, error = %e, "Keeping unparsed timestamp");
                raw.created_at.clone()
            });

        EnrichedProduct {
            featured: featured_flag(raw.featured_at.as_deref()).to_string(),
            og_image_url: image.into_value(),
            keyword: keywords.into_value(),
            translated_tagline: tagline.into_value(),
            trans_description: trans_description.into_value(),
            name: raw.name,
            tagline: raw.tagline,
            description,
            votes_count: raw.votes_count,
            created_at,
            website: raw.website,
            url: raw.url,
        }
    }

    pub async fn build_all(&self, listings: Vec<RawListing>) -> Vec<EnrichedProduct> {
        let mut products = Vec::with_capacity(listings.len());
        for listing in listings {
            products.push(self.build(listing).await);
        }
        products
    }
}
