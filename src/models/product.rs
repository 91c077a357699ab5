use serde::{Deserialize, Serialize};

pub const FEATURED_YES: &str = "是";
pub const FEATURED_NO: &str = "否";

/// Any non-empty feature timestamp marks the listing as featured.
pub fn featured_flag(featured_at: Option<&str>) -> &'static str {
    match featured_at {
        Some(ts) if !ts.trim().is_empty() => FEATURED_YES,
        _ => FEATURED_NO,
    }
}

/// A listing after enrichment, in the field layout the publishing workflow expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedProduct {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub votes_count: i64,
    pub created_at: String,
    pub featured: String,
    pub website: String,
    pub url: String,
    pub og_image_url: String,
    pub keyword: String,
    pub translated_tagline: String,
    pub trans_description: String,
}

impl EnrichedProduct {
    pub fn to_markdown(&self, rank: usize) -> String {
        format!(
            "## [{rank}. {name}]({url})\n\
             **标语**：{tagline}\n\
             **介绍**：{description}\n\
             **产品网站**: [立即访问]({website})\n\
             **Product Hunt**: [View on Product Hunt]({url})\n\n\
             ![{name}]({image})\n\n\
             **关键词**：{keyword}\n\
             **票数**: 🔺{votes}\n\
             **是否精选**：{featured}\n\
             **发布时间**：{created_at}\n\n\
             ---\n\n",
            rank = rank,
            name = self.name,
            url = self.url,
            tagline = self.translated_tagline,
            description = self.trans_description,
            website = self.website,
            image = self.og_image_url,
            keyword = self.keyword,
            votes = self.votes_count,
            featured = self.featured,
            created_at = self.created_at,
        )
    }
}
