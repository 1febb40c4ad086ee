//! Image preprocessing modules
//!
//! Utilities for preparing decoded images for analysis and display:
//! - Aspect-preserving downscaling

pub mod resize;
