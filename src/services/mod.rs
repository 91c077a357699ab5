pub mod builder;
pub mod fallback;
pub mod image;
pub mod llm;
pub mod pipeline;
pub mod producthunt;
pub mod publisher;
pub mod wechat;

pub use builder::ProductBuilder;
pub use fallback::fallback_listings;
pub use image::{HttpPageFetcher, ImageResolver, MetaImageScanner, PageFetcher};
pub use llm::{ChatModel, OpenAiChat, Translator, fallback_keywords};
pub use pipeline::DailyPipeline;
pub use producthunt::{DateWindow, PostsPageSource, ProductHuntApi, ProductHuntAuth, fetch_top_listings};
pub use publisher::{EventStream, Publisher, WorkflowTransport};
pub use wechat::{WechatMedia, parse_upload_response};
