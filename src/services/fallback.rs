use crate::models::{Media, RawListing};

fn image(url: &str) -> Option<Vec<Media>> {
    Some(vec![Media {
        url: Some(url.to_string()),
        media_type: Some("image".to_string()),
        video_url: None,
    }])
}

/// Canned listings used when the day's posts cannot be fetched.
pub fn fallback_listings() -> Vec<RawListing> {
    vec![
        RawListing {
            id: "1".to_string(),
            name: "Venice".to_string(),
            tagline: "Private & censorship-resistant AI | Unlock unlimited intelligence".to_string(),
            description: Some("Venice is a private, censorship-resistant AI platform powered by open-source models and decentralized infrastructure. The app combines the benefits of decentralized blockchain technology with the power of generative AI.".to_string()),
            votes_count: 566,
            created_at: "2025-03-07T16:01:00Z".to_string(),
            featured_at: Some("2025-03-07T16:01:00Z".to_string()),
            website: "https://www.producthunt.com/r/4D6Z6F7I3SXTGN".to_string(),
            url: "https://www.producthunt.com/posts/venice-3".to_string(),
            media: image("https://ph-files.imgix.net/97baee49-6dda-47f5-8a47-91d2c56e1976.jpeg"),
        },
        RawListing {
            id: "2".to_string(),
            name: "Mistral OCR".to_string(),
            tagline: "Introducing the world's most powerful document understanding API".to_string(),
            description: Some("Introducing Mistral OCR—an advanced, lightweight optical character recognition model focused on speed, accuracy, and efficiency. Whether extracting text from images or digitizing documents, it delivers top-tier performance with ease.".to_string()),
            votes_count: 477,
            created_at: "2025-03-07T16:01:00Z".to_string(),
            featured_at: Some("2025-03-07T16:01:00Z".to_string()),
            website: "https://www.producthunt.com/r/SPXNTAWQSVRLGH".to_string(),
            url: "https://www.producthunt.com/posts/mistral-ocr".to_string(),
            media: image("https://ph-files.imgix.net/4224517b-29e4-4944-98c9-2eee59374870.png"),
        },
    ]
}
