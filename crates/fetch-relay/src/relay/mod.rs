//! The relay step: target extraction, outbound fetch, and request correlation.

pub mod correlation;
pub mod fetch;
