//! Request Orchestration
//!
//! Plumbing shared by every outbound call: the single-flight queue, retry
//! with backoff, per-call timeouts, the suggestion cache and simulated
//! progress reporting.

pub mod cache;
pub mod progress;
pub mod queue;
pub mod retry;
pub mod timeout;

pub use cache::{SuggestionCache, content_hash};
pub use progress::{ProgressCallback, ProgressEstimator};
pub use queue::RequestQueue;
pub use retry::{RetryPolicy, call_with_retry};
pub use timeout::{TimeoutConfig, with_timeout};
