use crate::compose::blend::paste_over;
use crate::foundation::core::{Frame, Rgba8};

/// What a subject is placed onto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Background {
    /// Solid fill the size of the subject.
    Color(Rgba8),
    /// Scenery image; the subject must fit inside it.
    Image(Frame),
}

impl Background {
    /// The color to treat as empty when trimming, if this is a solid fill.
    pub fn color(&self) -> Option<Rgba8> {
        match self {
            Background::Color(c) => Some(*c),
            Background::Image(_) => None,
        }
    }
}

impl From<Rgba8> for Background {
    fn from(c: Rgba8) -> Self {
        Background::Color(c)
    }
}

impl From<Frame> for Background {
    fn from(f: Frame) -> Self {
        Background::Image(f)
    }
}

/// Stand `subject` on the ground line of `background`.
///
/// Both lines are heights measured up from the bottom edge: `subject_feet_y` is the feet line
/// of the subject (default: its vertical midpoint, the feet-centered render convention) and
/// `background_ground_y` the ground line of the background (default: its bottom edge; for
/// a color, the subject's feet line so the subject keeps its own size and position).
///
/// Returns `None` when the subject would stick out of the background above the ground
/// line or is wider than it. The result always has the background's dimensions.
pub fn apply_background(
    subject: &Frame,
    background: &Background,
    subject_feet_y: Option<u32>,
    background_ground_y: Option<u32>,
) -> Option<Frame> {
    let feet = subject_feet_y.unwrap_or(subject.height() / 2);

    let (mut canvas, ground) = match background {
        Background::Color(c) => (
            Frame::filled(subject.width(), subject.height(), *c),
            background_ground_y.unwrap_or(feet),
        ),
        Background::Image(img) => (img.clone(), background_ground_y.unwrap_or(0)),
    };

    let above_feet = i64::from(subject.height()) - i64::from(feet);
    let above_ground = i64::from(canvas.height()) - i64::from(ground);
    if above_feet > above_ground || subject.width() > canvas.width() {
        tracing::debug!(
            subject_w = subject.width(),
            subject_h = subject.height(),
            bg_w = canvas.width(),
            bg_h = canvas.height(),
            "subject does not fit background"
        );
        return None;
    }

    let x = i64::from((canvas.width() - subject.width()) / 2);
    let y = above_ground - above_feet;
    paste_over(&mut canvas, subject, x, y);
    Some(canvas)
}
