//! Analysis and result aggregation modules
//!
//! Turns extracted features into the final analysis:
//! - Disease keys and explanations
//! - Probability mapping
//! - Risk levels and summary
//! - Result types and metadata

pub mod disease;
pub mod metadata;
pub mod probability;
pub mod result;
pub mod risk;
