//! Output encoding.

/// PNG stills and looping GIF animations.
pub mod animation;
