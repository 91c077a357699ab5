use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::product::EnrichedProduct;

/// The `product_data` parameter handed to the publishing workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishPayload {
    pub title: String,
    pub date: String,
    pub description: String,
    pub products: Vec<EnrichedProduct>,
}

impl PublishPayload {
    /// `listing_date` is the day the products were posted; `run_date` is when the digest is sent.
    pub fn new(listing_date: NaiveDate, run_date: NaiveDate, products: Vec<EnrichedProduct>) -> Self {
        let date_label = listing_date.format("%Y-%m-%d").to_string();
        Self {
            title: format!("Product Hunt 每日精选 - {date_label}"),
            date: run_date.format("%Y-%m-%d").to_string(),
            description: format!("这里是 {date_label} 在 Product Hunt 上的前 {} 名产品。", products.len()),
            products,
        }
    }

    pub fn to_parameters(&self) -> serde_json::Result<serde_json::Value> {
        Ok(serde_json::json!({ "product_data": serde_json::to_value(self)? }))
    }
}
