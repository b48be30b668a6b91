//! Turning renderer bytes into frames.

/// PNG/GIF/APNG decoding into straight-alpha frames.
pub mod decode;
