//! Letterbox/scale-fit selection for the fixed 854x480 output frame.
//!
//! Every transcode produces an 854x480 frame. Sources whose aspect ratio
//! rounds to 1.7 are resized directly with Lanczos; everything else is scaled
//! to fit and padded (centered) to the target size.

use std::fmt;

/// Output frame width.
pub const TARGET_WIDTH: u32 = 854;

/// Output frame height.
pub const TARGET_HEIGHT: u32 = 480;

/// Aspect ratio (rounded to one decimal) that is resized without padding.
const DIRECT_SCALE_ASPECT_RATIO: f64 = 1.7;

/// Width and height of a video stream, both non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Returns `None` if either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Aspect ratio rounded to one decimal place.
    ///
    /// Rounding is applied to the exact binary value of the quotient, so
    /// 660/400 (stored just below 1.65) rounds to 1.6.
    pub fn rounded_aspect_ratio(&self) -> f64 {
        let ratio = f64::from(self.width) / f64::from(self.height);
        format!("{ratio:.1}").parse().unwrap_or(ratio)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How a source is mapped onto the output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleFit {
    /// Resize straight to 854x480 with Lanczos.
    DirectLanczos,
    /// Scale a small source up to `width`x`height`, then pad.
    UpscalePad { width: u32, height: u32 },
    /// Scale down to fit inside 854x480, then pad.
    DownscalePad,
}

impl ScaleFit {
    /// The ffmpeg `-vf` filter chain for this fit.
    pub fn filter(&self) -> String {
        let pad = format!("pad={TARGET_WIDTH}:{TARGET_HEIGHT}:(ow-iw)/2:(oh-ih)/2");
        match self {
            ScaleFit::DirectLanczos => {
                format!("scale={TARGET_WIDTH}x{TARGET_HEIGHT}:flags=lanczos")
            }
            ScaleFit::UpscalePad { width, height } => {
                format!("scale={width}:{height}:force_original_aspect_ratio=increase,{pad}")
            }
            ScaleFit::DownscalePad => format!(
                "scale={TARGET_WIDTH}:{TARGET_HEIGHT}:force_original_aspect_ratio=decrease,{pad}"
            ),
        }
    }
}

impl fmt::Display for ScaleFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filter())
    }
}

/// Picks the scale/pad strategy for a source of the given dimensions.
#[must_use]
pub fn compute_fit(dims: Dimensions) -> ScaleFit {
    if dims.rounded_aspect_ratio() == DIRECT_SCALE_ASPECT_RATIO {
        return ScaleFit::DirectLanczos;
    }

    if dims.width <= TARGET_WIDTH && dims.height <= TARGET_HEIGHT {
        let width_ratio = f64::from(TARGET_WIDTH) / f64::from(dims.width);
        let height_ratio = f64::from(TARGET_HEIGHT) / f64::from(dims.height);
        let ratio = width_ratio.min(height_ratio);
        ScaleFit::UpscalePad {
            width: (f64::from(dims.width) * ratio).trunc() as u32,
            height: (f64::from(dims.height) * ratio).trunc() as u32,
        }
    } else {
        ScaleFit::DownscalePad
    }
}
