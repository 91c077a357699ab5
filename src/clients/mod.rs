pub mod coze;
pub mod http;
pub mod sse;

pub use coze::CozeClient;
pub use http::HttpClient;
pub use sse::SseDecoder;
