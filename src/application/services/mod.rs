//! Application services - Business logic orchestration

pub mod auto_responses;

pub use auto_responses::{AutoResponseInfo, AutoResponseRegistry, DEFAULT_NAMESPACE};
