//! Frame compositing: trimming, side-by-side merging and background placement.

/// End-to-end "actor does something to target" composition.
pub mod action;
/// Standing a subject on a background.
pub mod background;
/// Bounding boxes and cropping.
pub mod bbox;
/// Straight-alpha pixel blending and pasting.
pub mod blend;
/// Side-by-side merging of stills and animations.
pub mod merge;
/// Sprite geometry helpers.
pub mod sprite;
