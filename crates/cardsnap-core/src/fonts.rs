mod cache;
pub(crate) mod dirs;
mod embedded;
mod metrics;
mod resolve;

pub use metrics::{FontHandle, LineMetrics, TextMeasure};
pub use resolve::{FontResolver, FontSet, FontStyle};
