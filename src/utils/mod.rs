pub mod logging;
pub mod retry;
pub mod time;

pub use logging::init_tracing;
pub use retry::retry_with_backoff;
pub use time::{previous_day, sleep_with_jitter, to_display_time};
