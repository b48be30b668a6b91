//! Small geometry helpers applied to renderer output before and after merging.

use crate::compose::bbox::crop;
use crate::compose::blend::{paste_over, paste_replace};
use crate::foundation::core::{BoundingBox, Frame};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Horizontal flip.
pub fn mirror(frame: &Frame) -> Frame {
    Frame::from(image::imageops::flip_horizontal(&frame.to_rgba_image()))
}

/// Paste `frame` centered on a transparent `width` x `height` canvas.
///
/// A canvas smaller than the frame clips it evenly on both sides.
pub fn center_on_canvas(frame: &Frame, width: u32, height: u32) -> Frame {
    let mut canvas = Frame::transparent(width, height);
    let x = (i64::from(width) - i64::from(frame.width())).div_euclid(2);
    let y = (i64::from(height) - i64::from(frame.height())).div_euclid(2);
    paste_replace(&mut canvas, frame, x, y);
    canvas
}

/// Center every frame on a canvas as large as the widest and tallest frame.
///
/// Feet-centered renders keep a shared feet line this way even when poses differ in size.
pub fn normalize_sizes(frames: &[Frame]) -> SpriteResult<Vec<Frame>> {
    if frames.is_empty() {
        return Err(SpriteError::invalid_input("no frames to normalize"));
    }
    let w = frames.iter().map(Frame::width).max().unwrap_or(0);
    let h = frames.iter().map(Frame::height).max().unwrap_or(0);
    Ok(frames.iter().map(|f| center_on_canvas(f, w, h)).collect())
}

/// Widen `frame` to at least `width`, content anchored at x=0.
pub fn min_width(frame: &Frame, width: u32) -> Frame {
    if frame.width() >= width {
        return frame.clone();
    }
    let mut canvas = Frame::transparent(width, frame.height());
    paste_replace(&mut canvas, frame, 0, 0);
    canvas
}

/// Surround `frame` with `border` transparent pixels on every side.
pub fn add_border(frame: &Frame, border: u32) -> SpriteResult<Frame> {
    if border == 0 {
        return Ok(frame.clone());
    }
    let grown = |side: u32| {
        border
            .checked_mul(2)
            .and_then(|b| side.checked_add(b))
            .ok_or_else(|| SpriteError::invalid_input(format!("border {border} is too large")))
    };
    let mut canvas = Frame::transparent(grown(frame.width())?, grown(frame.height())?);
    paste_replace(&mut canvas, frame, i64::from(border), i64::from(border));
    Ok(canvas)
}

/// Keep only the head of a full-body render.
///
/// Removes `zoom * (body_height - pad)` rows from the bottom; `pad` rows of body stay visible.
pub fn crop_emote(frame: &Frame, zoom: f32, body_height: u32, pad: u32) -> SpriteResult<Frame> {
    if !(zoom.is_finite() && zoom > 0.0) {
        return Err(SpriteError::invalid_input(format!("zoom must be positive, got {zoom}")));
    }
    let body = (zoom * body_height.saturating_sub(pad) as f32).round() as u32;
    if body >= frame.height() {
        return Err(SpriteError::invalid_input(format!(
            "emote crop of {body}px leaves nothing of a {}px tall sprite",
            frame.height()
        )));
    }
    Ok(crop(
        frame,
        BoundingBox::full(frame.width(), frame.height() - body),
    ))
}

/// Stand a profile picture in for a character render.
///
/// The picture is shrunk (never enlarged) to fit a `size` x `size` box, then placed at
/// `(size / 2, 0)` on a transparent `(size * 3 / 2) x (size * 2)` canvas so its bottom
/// edge sits on the vertical midpoint, like the feet of a feet-centered render.
pub fn pfp_placeholder(pfp: &Frame, size: u32) -> SpriteResult<Frame> {
    if size == 0 {
        return Err(SpriteError::invalid_input("placeholder size must be non-zero"));
    }
    if pfp.is_empty() {
        return Err(SpriteError::invalid_input("profile picture is empty"));
    }

    let (Some(w), Some(h)) = (size.checked_mul(3).map(|v| v / 2), size.checked_mul(2)) else {
        return Err(SpriteError::invalid_input(format!(
            "placeholder size {size} is too large"
        )));
    };

    let fitted = fit_within(pfp, size);
    let mut canvas = Frame::transparent(w, h);
    paste_over(&mut canvas, &fitted, i64::from(size / 2), 0);
    Ok(canvas)
}

fn fit_within(frame: &Frame, size: u32) -> Frame {
    let (w, h) = frame.dimensions();
    if w <= size && h <= size {
        return frame.clone();
    }
    let scale = f64::from(size) / f64::from(w.max(h));
    let nw = ((f64::from(w) * scale).round() as u32).clamp(1, size);
    let nh = ((f64::from(h) * scale).round() as u32).clamp(1, size);
    Frame::from(image::imageops::resize(
        &frame.to_rgba_image(),
        nw,
        nh,
        image::imageops::FilterType::Lanczos3,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::TRANSPARENT;

    const INK: [u8; 4] = [20, 30, 40, 255];

    #[test]
    fn mirror_flips_columns() {
        let f = Frame::new(2, 1, vec![1, 1, 1, 255, 2, 2, 2, 255]).unwrap();
        let m = mirror(&f);
        assert_eq!(m.pixel(0, 0), Some([2, 2, 2, 255]));
        assert_eq!(m.pixel(1, 0), Some([1, 1, 1, 255]));
    }

    #[test]
    fn normalize_centers_on_largest_extent() {
        let frames = vec![Frame::filled(4, 2, INK), Frame::filled(2, 6, INK)];
        let out = normalize_sizes(&frames).unwrap();
        assert!(out.iter().all(|f| f.dimensions() == (4, 6)));
        assert_eq!(out[0].pixel(0, 1), Some(TRANSPARENT));
        assert_eq!(out[0].pixel(0, 2), Some(INK));
        assert_eq!(out[1].pixel(0, 0), Some(TRANSPARENT));
        assert_eq!(out[1].pixel(1, 0), Some(INK));
        assert!(normalize_sizes(&[]).is_err());
    }

    #[test]
    fn min_width_only_grows() {
        let f = Frame::filled(3, 2, INK);
        assert_eq!(min_width(&f, 2), f);
        let wide = min_width(&f, 5);
        assert_eq!(wide.dimensions(), (5, 2));
        assert_eq!(wide.pixel(2, 0), Some(INK));
        assert_eq!(wide.pixel(3, 0), Some(TRANSPARENT));
    }

    #[test]
    fn border_surrounds_content() {
        let out = add_border(&Frame::filled(2, 2, INK), 3).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(out.pixel(2, 2), Some(TRANSPARENT));
        assert_eq!(out.pixel(3, 3), Some(INK));
        assert_eq!(out.pixel(4, 4), Some(INK));
        assert_eq!(out.pixel(5, 5), Some(TRANSPARENT));
    }

    #[test]
    fn oversized_geometry_is_invalid_input() {
        let f = Frame::filled(2, 2, INK);
        assert!(add_border(&f, u32::MAX).unwrap_err().is_invalid_input());
        assert!(pfp_placeholder(&f, u32::MAX).unwrap_err().is_invalid_input());
    }

    #[test]
    fn emote_crop_removes_scaled_body() {
        let f = Frame::filled(10, 100, INK);
        let head = crop_emote(&f, 2.0, 33, 8).unwrap();
        assert_eq!(head.dimensions(), (10, 50));
        assert!(crop_emote(&f, 4.0, 33, 8).is_err());
        assert!(crop_emote(&f, 0.0, 33, 8).is_err());
    }

    #[test]
    fn placeholder_mimics_feet_centered_render() {
        let pfp = Frame::filled(256, 128, INK);
        let out = pfp_placeholder(&pfp, 64).unwrap();
        assert_eq!(out.dimensions(), (96, 128));
        // shrunk to 64x32 at (32, 0)
        assert_eq!(out.pixel(31, 0), Some(TRANSPARENT));
        assert_eq!(out.pixel(40, 10).map(|p| p[3]), Some(255));
        assert_eq!(out.pixel(40, 32), Some(TRANSPARENT));
        assert_eq!(out.pixel(40, 100), Some(TRANSPARENT));
        assert!(pfp_placeholder(&pfp, 0).is_err());
    }

    #[test]
    fn small_pfp_is_not_enlarged() {
        let pfp = Frame::filled(10, 10, INK);
        let out = pfp_placeholder(&pfp, 64).unwrap();
        assert_eq!(out.pixel(32, 0), Some(INK));
        assert_eq!(out.pixel(41, 9), Some(INK));
        assert_eq!(out.pixel(42, 0), Some(TRANSPARENT));
    }
}
