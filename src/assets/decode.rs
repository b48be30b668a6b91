use std::io::Cursor;

use image::AnimationDecoder as _;

use crate::foundation::core::{Frame, FrameSequence};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Decode a single raster (PNG, GIF first frame, ...) into a straight-alpha [`Frame`].
pub fn decode_frame(bytes: &[u8]) -> SpriteResult<Frame> {
    if bytes.is_empty() {
        return Err(SpriteError::decode("no image bytes"));
    }
    let dyn_img = image::load_from_memory(bytes).map_err(|e| codec_error("decode image", e))?;
    Ok(Frame::from(dyn_img.to_rgba8()))
}

/// Decode every frame of an animated GIF or APNG, keeping per-frame delays.
///
/// Still images decode to a sequence of length 1.
pub fn decode_sequence(bytes: &[u8]) -> SpriteResult<FrameSequence> {
    if bytes.is_empty() {
        return Err(SpriteError::decode("no image bytes"));
    }
    let format = image::guess_format(bytes).map_err(|e| codec_error("sniff image format", e))?;

    let frames = match format {
        image::ImageFormat::Gif => {
            let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes))
                .map_err(|e| codec_error("open gif decoder", e))?;
            decoder
                .into_frames()
                .collect_frames()
                .map_err(|e| codec_error("decode gif frames", e))?
        }
        image::ImageFormat::Png => {
            let decoder = image::codecs::png::PngDecoder::new(Cursor::new(bytes))
                .map_err(|e| codec_error("open png decoder", e))?;
            if !decoder.is_apng().map_err(|e| codec_error("probe apng", e))? {
                return Ok(FrameSequence::still(decode_frame(bytes)?));
            }
            decoder
                .apng()
                .map_err(|e| codec_error("open apng decoder", e))?
                .into_frames()
                .collect_frames()
                .map_err(|e| codec_error("decode apng frames", e))?
        }
        _ => return Ok(FrameSequence::still(decode_frame(bytes)?)),
    };

    if frames.is_empty() {
        return Err(SpriteError::decode("animation has no frames"));
    }

    let mut out = Vec::with_capacity(frames.len());
    let mut durations = Vec::with_capacity(frames.len());
    for f in frames {
        let (numer, denom) = f.delay().numer_denom_ms();
        durations.push(if denom == 0 { 0 } else { numer / denom });
        out.push(Frame::from(f.into_buffer()));
    }

    FrameSequence::new(out, durations)
}

fn codec_error(what: &str, err: image::ImageError) -> SpriteError {
    SpriteError::decode(format!("{what}: {err}"))
}
