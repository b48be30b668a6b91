use std::io::Cursor;

use anyhow::Context as _;

use crate::foundation::core::{Durations, Frame, FrameSequence};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Output container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// First frame only, as PNG.
    Still,
    /// Every frame, as an animated GIF.
    #[default]
    Animated,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Still => "png",
            OutputFormat::Animated => "gif",
        }
    }
}

/// Encoder settings that do not depend on the frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    pub format: OutputFormat,
    /// Repeat the animation indefinitely.
    pub loop_forever: bool,
    /// GIF quantizer speed, 1 (best) to 30 (fastest).
    pub gif_speed: i32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Animated,
            loop_forever: true,
            gif_speed: 10,
        }
    }
}

impl EncodeConfig {
    pub fn validate(&self) -> SpriteResult<()> {
        if !(1..=30).contains(&self.gif_speed) {
            return Err(SpriteError::invalid_input(format!(
                "gif speed must be within 1..=30, got {}",
                self.gif_speed
            )));
        }
        Ok(())
    }
}

/// Serialize `frames` to PNG (still) or GIF (animated).
///
/// `durations` is broadcast from a scalar or must match `frames` element-wise. GIF stores
/// delays in centiseconds, so each duration is rounded to the nearest 10 ms. The output
/// holds no timestamps, so identical input gives identical bytes.
#[tracing::instrument(skip(frames, durations), fields(frames = frames.len()))]
pub fn encode(
    frames: &[Frame],
    durations: &Durations,
    loop_forever: bool,
    format: OutputFormat,
) -> SpriteResult<Vec<u8>> {
    encode_with(
        frames,
        durations,
        &EncodeConfig {
            format,
            loop_forever,
            ..EncodeConfig::default()
        },
    )
}

/// [`encode`] with an explicit [`EncodeConfig`].
pub fn encode_with(
    frames: &[Frame],
    durations: &Durations,
    cfg: &EncodeConfig,
) -> SpriteResult<Vec<u8>> {
    cfg.validate()?;
    let first = frames
        .first()
        .ok_or_else(|| SpriteError::invalid_input("nothing to encode: no frames"))?;

    match cfg.format {
        OutputFormat::Still => encode_png(first),
        OutputFormat::Animated => {
            let delays = durations.resolve(frames.len())?;
            encode_gif(frames, &delays, cfg)
        }
    }
}

/// Encode a sequence with its own per-frame timing.
pub fn encode_sequence(seq: &FrameSequence, cfg: &EncodeConfig) -> SpriteResult<Vec<u8>> {
    encode_with(
        seq.frames(),
        &Durations::PerFrame(seq.durations_ms().to_vec()),
        cfg,
    )
}

pub fn encode_png(frame: &Frame) -> SpriteResult<Vec<u8>> {
    if frame.is_empty() {
        return Err(SpriteError::invalid_input("cannot encode an empty frame"));
    }
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(frame.to_rgba_image())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("write png")?;
    Ok(buf)
}

fn encode_gif(frames: &[Frame], delays_ms: &[u32], cfg: &EncodeConfig) -> SpriteResult<Vec<u8>> {
    let (w, h) = frames[0].dimensions();
    if w == 0 || h == 0 || w > u32::from(u16::MAX) || h > u32::from(u16::MAX) {
        return Err(SpriteError::invalid_input(format!(
            "gif frames must be 1..=65535 px per side, got {w}x{h}"
        )));
    }
    if let Some(bad) = frames.iter().find(|f| f.dimensions() != (w, h)) {
        return Err(SpriteError::invalid_input(format!(
            "animated frames must share one size: {w}x{h} vs {}x{}",
            bad.width(),
            bad.height()
        )));
    }

    let mut buf = Vec::new();
    {
        let mut encoder = image::codecs::gif::GifEncoder::new_with_speed(&mut buf, cfg.gif_speed);
        if cfg.loop_forever {
            encoder
                .set_repeat(image::codecs::gif::Repeat::Infinite)
                .map_err(|e| SpriteError::encode(format!("set gif repeat: {e}")))?;
        }
        for (frame, &ms) in frames.iter().zip(delays_ms) {
            let delay = image::Delay::from_numer_denom_ms(gif_delay_ms(ms), 1);
            let gif_frame = image::Frame::from_parts(frame.to_rgba_image(), 0, 0, delay);
            encoder
                .encode_frame(gif_frame)
                .map_err(|e| SpriteError::encode(format!("write gif frame: {e}")))?;
        }
    }
    tracing::debug!(bytes = buf.len(), frames = frames.len(), "encoded gif");
    Ok(buf)
}

/// `ms` rounded to the nearest centisecond the GIF delay field can hold.
fn gif_delay_ms(ms: u32) -> u32 {
    let cs = (u64::from(ms) + 5) / 10;
    let cs = cs.min(u64::from(u16::MAX)) as u32;
    cs * 10
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::decode::{decode_frame, decode_sequence};

    fn frames(n: u8) -> Vec<Frame> {
        (0..n)
            .map(|i| Frame::filled(4, 3, [i * 60, 0, 255 - i * 60, 255]))
            .collect()
    }

    #[test]
    fn still_encodes_first_frame_as_png() {
        let bytes = encode(&frames(3), &Durations::Uniform(100), true, OutputFormat::Still).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
        let back = decode_frame(&bytes).unwrap();
        assert_eq!(back, frames(1)[0]);
    }

    #[test]
    fn animated_keeps_per_frame_timing() {
        let d = Durations::PerFrame(vec![100, 200, 100]);
        let bytes = encode(&frames(3), &d, true, OutputFormat::Animated).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Gif);
        let seq = decode_sequence(&bytes).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.durations_ms(), &[100, 200, 100]);
    }

    #[test]
    fn delays_round_to_whole_centiseconds() {
        assert_eq!(gif_delay_ms(175), 180);
        assert_eq!(gif_delay_ms(454), 450);
        assert_eq!(gif_delay_ms(u32::MAX), u32::from(u16::MAX) * 10);

        let d = Durations::PerFrame(vec![175, 454, 30]);
        let bytes = encode(&frames(3), &d, true, OutputFormat::Animated).unwrap();
        let seq = decode_sequence(&bytes).unwrap();
        assert_eq!(seq.durations_ms(), &[180, 450, 30]);
    }

    #[test]
    fn loop_flag_controls_netscape_block() {
        let d = Durations::Uniform(50);
        let looped = encode(&frames(2), &d, true, OutputFormat::Animated).unwrap();
        let once = encode(&frames(2), &d, false, OutputFormat::Animated).unwrap();
        let has_loop = |b: &[u8]| b.windows(11).any(|w| w == b"NETSCAPE2.0");
        assert!(has_loop(&looped));
        assert!(!has_loop(&once));
    }

    #[test]
    fn encoding_is_deterministic() {
        let d = Durations::PerFrame(vec![30, 40]);
        let a = encode(&frames(2), &d, true, OutputFormat::Animated).unwrap();
        let b = encode(&frames(2), &d, true, OutputFormat::Animated).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let d = Durations::PerFrame(vec![100]);
        let err = encode(&frames(2), &d, true, OutputFormat::Animated).unwrap_err();
        assert!(err.is_invalid_input());

        let err = encode(&[], &Durations::Uniform(1), true, OutputFormat::Still).unwrap_err();
        assert!(err.is_invalid_input());

        let mixed = vec![Frame::transparent(2, 2), Frame::transparent(3, 2)];
        let err = encode(&mixed, &Durations::Uniform(1), true, OutputFormat::Animated).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn config_validates_speed() {
        let cfg = EncodeConfig {
            gif_speed: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        assert!(EncodeConfig::default().validate().is_ok());
    }
}
