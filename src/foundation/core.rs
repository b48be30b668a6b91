use crate::foundation::error::{SpriteError, SpriteResult};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Fully transparent black, the default canvas fill.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Pixel rectangle with exclusive `right`/`bottom` edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32, // exclusive
    pub bottom: u32, // exclusive
}

impl BoundingBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> SpriteResult<Self> {
        if left > right || top > bottom {
            return Err(SpriteError::invalid_input(format!(
                "bounding box edges out of order: ({left}, {top}, {right}, {bottom})"
            )));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Box covering a whole `width` x `height` raster.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        }
    }

    pub fn width(self) -> u32 {
        self.right - self.left
    }

    pub fn height(self) -> u32 {
        self.bottom - self.top
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn contains(self, x: u32, y: u32) -> bool {
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }
}

/// Decoded raster with straight alpha, row-major RGBA8.
///
/// `data.len() == width * height * 4` always holds; every transform in this crate
/// returns a new `Frame` rather than mutating its input.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SpriteResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(SpriteError::invalid_input(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A `width` x `height` frame with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: Rgba8) -> Self {
        let px = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(px * 4);
        for _ in 0..px {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Caller guarantees `data.len() == width * height * 4`.
    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            data,
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Row-major RGBA8 bytes of row `y`.
    pub(crate) fn row(&self, y: u32) -> &[u8] {
        let stride = (self.width as usize) * 4;
        let start = (y as usize) * stride;
        &self.data[start..start + stride]
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        // Length invariant is enforced by every constructor.
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

impl From<image::RgbaImage> for Frame {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

fn byte_len(width: u32, height: u32) -> SpriteResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SpriteError::invalid_input("frame buffer size overflow"))
}

/// Per-frame display time for animated output.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Durations {
    /// Same duration for every frame.
    Uniform(u32),
    /// One duration per frame.
    PerFrame(Vec<u32>),
}

impl Durations {
    /// Expand to exactly `n` per-frame durations in milliseconds.
    pub fn resolve(&self, n: usize) -> SpriteResult<Vec<u32>> {
        match self {
            Self::Uniform(ms) => Ok(vec![*ms; n]),
            Self::PerFrame(v) if v.len() == n => Ok(v.clone()),
            Self::PerFrame(v) => Err(SpriteError::invalid_input(format!(
                "got {} durations for {n} frames",
                v.len()
            ))),
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::Uniform(100)
    }
}

impl From<u32> for Durations {
    fn from(ms: u32) -> Self {
        Self::Uniform(ms)
    }
}

impl From<Vec<u32>> for Durations {
    fn from(v: Vec<u32>) -> Self {
        Self::PerFrame(v)
    }
}

/// Ordered frames with per-frame timing in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    durations_ms: Vec<u32>,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>, durations: impl Into<Durations>) -> SpriteResult<Self> {
        if frames.is_empty() {
            return Err(SpriteError::invalid_input("frame sequence must not be empty"));
        }
        let durations_ms = durations.into().resolve(frames.len())?;
        Ok(Self {
            frames,
            durations_ms,
        })
    }

    /// Degenerate one-frame sequence.
    pub fn still(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
            durations_ms: vec![0],
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn durations_ms(&self) -> &[u32] {
        &self.durations_ms
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn into_parts(self) -> (Vec<Frame>, Vec<u32>) {
        (self.frames, self.durations_ms)
    }
}
