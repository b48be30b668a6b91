use std::hash::Hash;
use std::io::Read;
use std::time::Duration;

use anyhow::Context as _;

use crate::cache::reply::ReplyCache;
use crate::cache::ttl::TtlCache;
use crate::compose::action::ActionOpts;
use crate::compose::background::Background;
use crate::compose::merge::ZOrder;
use crate::compose::sprite::{crop_emote, pfp_placeholder};
use crate::encode::animation::{EncodeConfig, OutputFormat};
use crate::foundation::core::{Durations, Frame, Rgba8, TRANSPARENT};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Host-supplied defaults for the compositing pipeline.
///
/// Every field has a default, so `{}` is a valid config document.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    /// Distance between the two characters' centers in action compositions.
    pub pad: u32,
    pub border: u32,
    /// A single number or one number per frame.
    pub durations_ms: Option<Durations>,
    pub background: Rgba8,
    pub z_order: ZOrder,
    pub format: OutputFormat,
    pub loop_forever: bool,
    pub gif_speed: i32,
    /// Box a profile picture is shrunk into when standing in for a character.
    pub pfp_size: u32,
    /// Body height of an unzoomed render, removed when cropping emotes.
    pub emote_body_height: u32,
    /// Rows of body kept below the head in emotes.
    pub emote_pad: u32,
    pub reply_ttl_secs: u64,
    pub reply_cache_max: Option<usize>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            pad: 40,
            border: 10,
            durations_ms: None,
            background: TRANSPARENT,
            z_order: ZOrder::RightOnTop,
            format: OutputFormat::Animated,
            loop_forever: true,
            gif_speed: 10,
            pfp_size: 128,
            emote_body_height: 33,
            emote_pad: 8,
            reply_ttl_secs: 300,
            reply_cache_max: None,
        }
    }
}

impl ComposeConfig {
    pub fn from_json_str(s: &str) -> SpriteResult<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse compose config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_reader(r: impl Read) -> SpriteResult<Self> {
        let cfg: Self = serde_json::from_reader(r).context("parse compose config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SpriteResult<()> {
        if self.pfp_size == 0 {
            return Err(SpriteError::config("pfp_size must be non-zero"));
        }
        if self.emote_pad > self.emote_body_height {
            return Err(SpriteError::config("emote_pad must not exceed emote_body_height"));
        }
        if self.reply_ttl_secs == 0 {
            return Err(SpriteError::config("reply_ttl_secs must be non-zero"));
        }
        if self.reply_cache_max == Some(0) {
            return Err(SpriteError::config("reply_cache_max must be non-zero when set"));
        }
        if let Some(Durations::PerFrame(v)) = &self.durations_ms
            && v.is_empty()
        {
            return Err(SpriteError::config("durations_ms list must not be empty"));
        }
        self.encode_config()
            .validate()
            .map_err(|e| SpriteError::config(e.to_string()))?;
        Ok(())
    }

    pub fn action_opts(&self) -> ActionOpts {
        ActionOpts {
            pad: self.pad,
            border: self.border,
            durations: self.durations_ms.clone(),
            background: Background::Color(self.background),
            ground_y: None,
            z_order: self.z_order,
            mirror_actor: true,
        }
    }

    pub fn encode_config(&self) -> EncodeConfig {
        EncodeConfig {
            format: self.format,
            loop_forever: self.loop_forever,
            gif_speed: self.gif_speed,
        }
    }

    pub fn reply_ttl(&self) -> Duration {
        Duration::from_secs(self.reply_ttl_secs)
    }

    /// Empty reply tracker using `reply_ttl_secs` and `reply_cache_max`.
    pub fn reply_cache<K: Eq + Hash + Clone, V>(&self) -> ReplyCache<K, V> {
        let mut inner = TtlCache::new(self.reply_ttl());
        if let Some(max) = self.reply_cache_max {
            inner = inner.with_max_size(max);
        }
        ReplyCache::with_cache(inner)
    }

    /// Turn a profile picture into a stand-in character render of `pfp_size`.
    pub fn pfp_target(&self, pfp: &Frame) -> SpriteResult<Frame> {
        pfp_placeholder(pfp, self.pfp_size)
    }

    /// Crop a render at `zoom` down to its head using the configured body height and pad.
    pub fn emote(&self, render: &Frame, zoom: f32) -> SpriteResult<Frame> {
        crop_emote(render, zoom, self.emote_body_height, self.emote_pad)
    }
}
