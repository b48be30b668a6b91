use crate::compose::blend::{paste_over, paste_replace};
use crate::foundation::core::{Frame, Rgba8, TRANSPARENT};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Which side is painted last.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZOrder {
    #[default]
    LeftOnTop,
    RightOnTop,
}

/// Geometry and paint options for [`merge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeOpts {
    /// Horizontal gap in pixels between the two images; negative values overlap them.
    pub pad: i32,
    pub z_order: ZOrder,
    /// Canvas fill behind both images.
    pub background: Rgba8,
}

impl Default for MergeOpts {
    fn default() -> Self {
        Self {
            pad: 0,
            z_order: ZOrder::LeftOnTop,
            background: TRANSPARENT,
        }
    }
}

/// One side of a merge: a still frame or an animation.
#[derive(Clone, Copy, Debug)]
pub enum Side<'a> {
    Still(&'a Frame),
    Frames(&'a [Frame]),
}

impl<'a> Side<'a> {
    fn len(self) -> usize {
        match self {
            Side::Still(_) => 1,
            Side::Frames(f) => f.len(),
        }
    }

    fn first(self) -> Option<&'a Frame> {
        match self {
            Side::Still(f) => Some(f),
            Side::Frames(f) => f.first(),
        }
    }

    /// Frame shown at output position `i` when the output has `out_len` frames.
    ///
    /// Stills broadcast. A shorter sequence is walked backwards from its last element,
    /// wrapping around, so it oscillates instead of hard-restarting.
    fn at(self, i: usize, out_len: usize) -> &'a Frame {
        match self {
            Side::Still(f) => f,
            Side::Frames(frames) => {
                let len = frames.len();
                if len == out_len {
                    &frames[i]
                } else {
                    &frames[reverse_cyclic_index(i, len)]
                }
            }
        }
    }
}

impl<'a> From<&'a Frame> for Side<'a> {
    fn from(f: &'a Frame) -> Self {
        Side::Still(f)
    }
}

impl<'a> From<&'a [Frame]> for Side<'a> {
    fn from(f: &'a [Frame]) -> Self {
        Side::Frames(f)
    }
}

impl<'a> From<&'a Vec<Frame>> for Side<'a> {
    fn from(f: &'a Vec<Frame>) -> Self {
        Side::Frames(f.as_slice())
    }
}

/// `(len - 1 - i) mod len`, non-negative.
pub fn reverse_cyclic_index(i: usize, len: usize) -> usize {
    debug_assert!(len > 0);
    let len_i = len as i64;
    (len_i - 1 - i as i64).rem_euclid(len_i) as usize
}

/// Canvas size for two images placed side by side with a `pad` gap.
///
/// The width never drops below either natural width, so a large negative `pad` at most
/// stacks the narrower image on top of the wider one.
pub fn merged_size(left: (u32, u32), right: (u32, u32), pad: i32) -> (u32, u32) {
    let natural = i64::from(left.0) + i64::from(right.0) + i64::from(pad);
    let natural = u32::try_from(natural.max(0)).unwrap_or(u32::MAX);
    let width = left.0.max(right.0).max(natural);
    (width, left.1.max(right.1))
}

/// Place `left` and `right` on one canvas.
///
/// `left` is anchored at x=0, `right` flush with the right edge, both vertically centered.
pub fn merge_pair(left: &Frame, right: &Frame, opts: &MergeOpts) -> Frame {
    let (width, height) = merged_size(left.dimensions(), right.dimensions(), opts.pad);
    let mut canvas = Frame::filled(width, height, opts.background);

    let left_pos = (0i64, i64::from((height - left.height()) / 2));
    let right_pos = (
        i64::from(width - right.width()),
        i64::from((height - right.height()) / 2),
    );

    let (back, back_pos, front, front_pos) = match opts.z_order {
        ZOrder::LeftOnTop => (right, right_pos, left, left_pos),
        ZOrder::RightOnTop => (left, left_pos, right, right_pos),
    };
    paste_over(&mut canvas, back, back_pos.0, back_pos.1);
    paste_over(&mut canvas, front, front_pos.0, front_pos.1);
    canvas
}

/// Merge two stills or two animations frame by frame.
///
/// The output has `max(len(left), len(right))` frames; see [`Side`] for how the shorter
/// side is repeated.
#[tracing::instrument(skip(left, right), fields(left = left.len(), right = right.len()))]
pub fn merge(left: Side<'_>, right: Side<'_>, opts: &MergeOpts) -> SpriteResult<Vec<Frame>> {
    if left.len() == 0 || right.len() == 0 {
        return Err(SpriteError::invalid_input("cannot merge an empty frame sequence"));
    }

    let out_len = left.len().max(right.len());
    let merged: Vec<Frame> = (0..out_len)
        .map(|i| merge_pair(left.at(i, out_len), right.at(i, out_len), opts))
        .collect();

    if let Some(first) = merged.first() {
        tracing::debug!(
            width = first.width(),
            height = first.height(),
            frames = out_len,
            "merged canvas"
        );
    }
    Ok(merged)
}

/// Widen every frame by `|widthDiff|` so the pair's visual center stays put across frames.
///
/// `widthDiff = floor((left_width - right_width) / 2)` uses the natural widths of the first
/// left and right frames. Content sits at x=0 when the left side is wider, otherwise it is
/// shifted right by `|widthDiff|`.
pub fn symmetrize(frames: &[Frame], left_width: u32, right_width: u32) -> Vec<Frame> {
    let diff = (i64::from(left_width) - i64::from(right_width)).div_euclid(2);
    let extra = diff.unsigned_abs() as u32;
    let x = if diff > 0 { 0 } else { i64::from(extra) };
    tracing::debug!(diff, "symmetrize offset");

    frames
        .iter()
        .map(|f| {
            let mut canvas = Frame::transparent(f.width() + extra, f.height());
            paste_replace(&mut canvas, f, x, 0);
            canvas
        })
        .collect()
}

/// [`merge`] followed by [`symmetrize`] using the first frame of each side.
pub fn merge_symmetric(
    left: Side<'_>,
    right: Side<'_>,
    opts: &MergeOpts,
) -> SpriteResult<Vec<Frame>> {
    let merged = merge(left, right, opts)?;
    let (Some(l), Some(r)) = (left.first(), right.first()) else {
        return Err(SpriteError::invalid_input("cannot merge an empty frame sequence"));
    };
    Ok(symmetrize(&merged, l.width(), r.width()))
}
