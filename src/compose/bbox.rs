use crate::foundation::core::{BoundingBox, Frame, Rgba8};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Tight box around the non-transparent pixels of a single frame.
///
/// Pixels exactly equal to `ignore` count as transparent. A frame with no visible pixel
/// yields its full extent, so the result is never empty.
pub fn frame_bounding_box(frame: &Frame, ignore: Option<Rgba8>) -> BoundingBox {
    let (w, h) = frame.dimensions();
    let mut left = u32::MAX;
    let mut top = u32::MAX;
    let mut right = 0u32;
    let mut bottom = 0u32;

    for y in 0..h {
        let row = frame.row(y);
        for (x, px) in row.chunks_exact(4).enumerate() {
            if !is_visible(px, ignore) {
                continue;
            }
            let x = x as u32;
            left = left.min(x);
            right = right.max(x + 1);
            top = top.min(y);
            bottom = y + 1;
        }
    }

    if left == u32::MAX {
        return BoundingBox::full(w, h);
    }
    BoundingBox {
        left,
        top,
        right,
        bottom,
    }
}

/// Union of the per-frame boxes: one crop rectangle that clips no frame of an animation.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn compute_bounding_box(frames: &[Frame], ignore: Option<Rgba8>) -> SpriteResult<BoundingBox> {
    let (first, rest) = frames
        .split_first()
        .ok_or_else(|| SpriteError::invalid_input("bounding box needs at least one frame"))?;

    let bbox = rest.iter().fold(frame_bounding_box(first, ignore), |acc, f| {
        acc.union(frame_bounding_box(f, ignore))
    });
    tracing::debug!(?bbox, "computed bounding box");
    Ok(bbox)
}

/// Sub-rectangle of `frame`; `bbox` is clamped to the frame first.
pub fn crop(frame: &Frame, bbox: BoundingBox) -> Frame {
    let right = bbox.right.min(frame.width());
    let bottom = bbox.bottom.min(frame.height());
    let left = bbox.left.min(right);
    let top = bbox.top.min(bottom);

    let out_w = (right - left) as usize;
    let mut data = Vec::with_capacity(out_w * (bottom - top) as usize * 4);
    for y in top..bottom {
        let row = frame.row(y);
        data.extend_from_slice(&row[(left as usize) * 4..(right as usize) * 4]);
    }
    Frame::from_parts(right - left, bottom - top, data)
}

fn is_visible(px: &[u8], ignore: Option<Rgba8>) -> bool {
    if px[3] == 0 {
        return false;
    }
    match ignore {
        Some(c) => px != c.as_slice(),
        None => true,
    }
}
