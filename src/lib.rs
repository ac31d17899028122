//! Cricfeed: cricket data aggregation behind a strict daily call budget
//!
//! The upstream provider allows a fixed number of calls per day, so every
//! request goes through a caching/quota/deduplication layer instead of
//! straight to the network. Fresh cache entries are served directly,
//! concurrent requests for the same resource collapse into a single upstream
//! call, and when the quota is exhausted or the upstream fails the layer
//! degrades to stale data rather than erroring.

pub mod api;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod quota;
pub mod singleflight;
pub mod upstream;

pub use api::CricketApi;
pub use config::FeedConfig;
pub use fetch::FetchOrchestrator;
pub use upstream::{HttpUpstream, Upstream, UpstreamError};
