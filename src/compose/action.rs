use crate::compose::background::{Background, apply_background};
use crate::compose::bbox::{compute_bounding_box, crop};
use crate::compose::merge::{MergeOpts, Side, ZOrder, merge, symmetrize};
use crate::compose::sprite::{add_border, center_on_canvas, mirror};
use crate::foundation::core::{Durations, Frame, FrameSequence, TRANSPARENT};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Options for [`compose_action`].
#[derive(Clone, Debug, PartialEq)]
pub struct ActionOpts {
    /// Horizontal distance in pixels between the centers of the two characters.
    pub pad: u32,
    /// Transparent margin kept around the trimmed pair.
    pub border: u32,
    /// Output timing; `None` keeps the actor animation's own delays.
    pub durations: Option<Durations>,
    pub background: Background,
    /// Ground line of an image background, measured up from its bottom edge.
    pub ground_y: Option<u32>,
    pub z_order: ZOrder,
    /// Flip the actor so it faces the target.
    pub mirror_actor: bool,
}

impl Default for ActionOpts {
    fn default() -> Self {
        Self {
            pad: 40,
            border: 10,
            durations: None,
            background: Background::Color(TRANSPARENT),
            ground_y: None,
            z_order: ZOrder::RightOnTop,
            mirror_actor: true,
        }
    }
}

/// Compose an animated actor doing something to a still target.
///
/// Both inputs are feet-centered renders. The actor frames are brought to one size, merged
/// with the target, trimmed to the union bounding box, re-centered, bordered and stood on
/// the background. The result is ready for animated encoding.
#[tracing::instrument(skip_all, fields(frames = actor.len(), pad = opts.pad))]
pub fn compose_action(
    actor: &FrameSequence,
    target: &Frame,
    opts: &ActionOpts,
) -> SpriteResult<FrameSequence> {
    if target.is_empty() {
        return Err(SpriteError::invalid_input("target render is empty"));
    }

    let w = actor.frames().iter().map(Frame::width).max().unwrap_or(0);
    let h = actor.frames().iter().map(Frame::height).max().unwrap_or(0);
    if w == 0 || h == 0 {
        return Err(SpriteError::invalid_input("actor render is empty"));
    }

    let normalized: Vec<Frame> = actor
        .frames()
        .iter()
        .map(|f| {
            let f = if opts.mirror_actor { mirror(f) } else { f.clone() };
            center_on_canvas(&f, w, h)
        })
        .collect();

    let merge_opts = MergeOpts {
        pad: center_gap(opts.pad, w, target.width()),
        z_order: opts.z_order,
        background: opts.background.color().unwrap_or(TRANSPARENT),
    };
    let merged = merge(Side::Frames(&normalized), Side::Still(target), &merge_opts)?;
    let canvas_h = merged.first().map(Frame::height).unwrap_or(h);

    let bbox = compute_bounding_box(&merged, opts.background.color())?;
    let feet_y = i64::from(bbox.bottom) - i64::from(canvas_h / 2) + i64::from(opts.border);
    let feet_y = u32::try_from(feet_y.max(0)).unwrap_or(0);
    tracing::debug!(?bbox, feet_y, "trimmed action canvas");

    let cropped: Vec<Frame> = merged.iter().map(|f| crop(f, bbox)).collect();
    let centered = symmetrize(&cropped, w, target.width());

    let ground_y = match opts.background {
        Background::Color(_) => None,
        Background::Image(_) => Some(opts.ground_y.unwrap_or(0)),
    };

    let mut out = Vec::with_capacity(centered.len());
    for f in &centered {
        let subject = add_border(f, opts.border)?;
        let framed = apply_background(&subject, &opts.background, Some(feet_y), ground_y)
            .ok_or_else(|| {
                SpriteError::invalid_input(format!(
                    "background too small for a {}x{} action",
                    subject.width(),
                    subject.height()
                ))
            })?;
        out.push(framed);
    }

    let durations = match &opts.durations {
        Some(d) => d.clone(),
        None => Durations::PerFrame(actor.durations_ms().to_vec()),
    };
    FrameSequence::new(out, durations)
}

/// Merge gap that puts the centers of `left_w` and `right_w` wide images `pad` apart.
///
/// The merged canvas is then `(left_w + right_w) / 2 + pad` wide, rounding down.
pub fn center_gap(pad: u32, left_w: u32, right_w: u32) -> i32 {
    let sum = i64::from(left_w) + i64::from(right_w);
    let gap = i64::from(pad) + sum / 2 - sum;
    gap.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
