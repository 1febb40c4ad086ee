//! Image I/O modules
//!
//! Upload validation, image decoding and the RGBA pixel buffer, using `image`.

pub mod decoder;
pub mod image_buffer;
pub mod upload;
