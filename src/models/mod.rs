mod enrichment;
mod listing;
mod payload;
mod product;
mod workflow;

pub use enrichment::Enrichment;
pub use listing::{GraphqlError, GraphqlResponse, Media, PageInfo, PostsConnection, PostsData, PostsPage, RawListing, TokenResponse};
pub use payload::PublishPayload;
pub use product::{EnrichedProduct, FEATURED_NO, FEATURED_YES, featured_flag};
pub use workflow::{ErrorEvent, InterruptEvent, MessageEvent, PublishReport, SseFrame, WorkflowEvent, WorkflowRequest};
