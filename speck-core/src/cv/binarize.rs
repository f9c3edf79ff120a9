// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use num::{ToPrimitive, Zero};

/// Default foreground rule: any nonzero intensity
pub fn is_nonzero<T: Zero>(intensity: T) -> bool {
    !intensity.is_zero()
}

/// A global intensity threshold used to binarize pixels
///
/// A pixel is foreground when its value is strictly greater than `level`,
/// or less than or equal to `level` when `invert` is set (dark objects on a
/// bright background). The default level of zero is the nonzero rule for
/// unsigned images.
///
/// # Examples
///
/// ```
/// use speck_core::cv::Threshold;
///
/// let bright = Threshold::new(100.0, false);
/// assert!(bright.is_foreground(101u8));
/// assert!(!bright.is_foreground(100u8));
///
/// let dark = Threshold::new(100.0, true);
/// assert!(dark.is_foreground(100u16));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Threshold {
    pub level: f64,
    pub invert: bool,
}

impl Threshold {
    pub fn new(level: f64, invert: bool) -> Self {
        Threshold { level, invert }
    }

    /// Classify one pixel; values that cannot be read as f64 are background
    pub fn is_foreground<T: ToPrimitive>(&self, intensity: T) -> bool {
        match intensity.to_f64() {
            Some(v) if v.is_nan() => false,
            Some(v) => (v > self.level) != self.invert,
            None => false,
        }
    }
}
