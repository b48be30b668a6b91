//! Sprite compositing for character-render chat bots.
//!
//! Rendered sprites arrive as PNG/GIF bytes from an external character renderer. This crate
//! turns them into frames, trims and merges them, stands the result on a background and
//! encodes it as a PNG still or a looping GIF.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: renderer bytes -> [`Frame`] / [`FrameSequence`]
//! 2. **Trim**: [`compute_bounding_box`] over every frame, then [`crop`]
//! 3. **Merge**: [`merge`] two stills or animations side by side, [`symmetrize`] the result
//! 4. **Place**: [`apply_background`] onto a color or scenery image
//! 5. **Encode**: [`encode`] to PNG or GIF bytes
//!
//! [`compose_action`] runs steps 2 to 4 for the common "actor does something to target" case.
//!
//! All image operations are pure and synchronous. The caches in [`cache`] track outstanding
//! bot replies and are not synchronized.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod encode;
mod foundation;

/// Expiring caches for reply tracking.
pub mod cache;
/// Serializable host defaults.
pub mod config;

pub use assets::decode::{decode_frame, decode_sequence};
pub use cache::ExpiringCache;
pub use cache::clock::{Clock, ManualClock, MonotonicClock};
pub use cache::lru::LruCache;
pub use cache::reply::ReplyCache;
pub use cache::ttl::{PRUNE_EVERY, TtlCache};
pub use compose::action::{ActionOpts, center_gap, compose_action};
pub use compose::background::{Background, apply_background};
pub use compose::bbox::{compute_bounding_box, crop, frame_bounding_box};
pub use compose::blend::{over, paste_over, paste_replace};
pub use compose::merge::{
    MergeOpts, Side, ZOrder, merge, merge_pair, merge_symmetric, merged_size,
    reverse_cyclic_index, symmetrize,
};
pub use compose::sprite::{
    add_border, center_on_canvas, crop_emote, min_width, mirror, normalize_sizes,
    pfp_placeholder,
};
pub use config::ComposeConfig;
pub use encode::animation::{
    EncodeConfig, OutputFormat, encode, encode_png, encode_sequence, encode_with,
};
pub use foundation::core::{BoundingBox, Durations, Frame, FrameSequence, Rgba8, TRANSPARENT};
pub use foundation::error::{SpriteError, SpriteResult};
