// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use serde::Serialize;

/// Accumulated statistics of one connected foreground region
///
/// Sums are kept instead of averages so two partial blobs can be merged by
/// simple addition. The start coordinate is the first pixel of the blob in
/// scan order (top-to-bottom, left-to-right).
///
/// # Examples
///
/// ```
/// use speck_core::cv::Blob;
///
/// let blob = Blob {
///     sum_x: 6,
///     sum_y: 3,
///     sum_intensity: 765.0,
///     count: 3,
///     xmin: 1,
///     xmax: 3,
///     ymin: 1,
///     ymax: 1,
///     start_x: 1,
///     start_y: 1,
/// };
///
/// assert_eq!(blob.centroid(), (2.0, 1.0));
/// assert_eq!(blob.as_xyxy(), [1, 1, 3, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Blob {
    pub sum_x: u64,
    pub sum_y: u64,
    pub sum_intensity: f64,
    pub count: u32,
    pub xmin: u32,
    pub xmax: u32,
    pub ymin: u32,
    pub ymax: u32,
    pub start_x: u32,
    pub start_y: u32,
}

// >>> ACCUMULATE METHODS

impl Blob {
    /// A blob holding exactly one pixel
    pub(crate) fn seed(x: u32, y: u32, intensity: f64) -> Self {
        Blob {
            sum_x: x as u64,
            sum_y: y as u64,
            sum_intensity: intensity,
            count: 1,
            xmin: x,
            xmax: x,
            ymin: y,
            ymax: y,
            start_x: x,
            start_y: y,
        }
    }

    /// Extend the blob by one pixel
    pub(crate) fn push(&mut self, x: u32, y: u32, intensity: f64) {
        self.sum_x += x as u64;
        self.sum_y += y as u64;
        self.sum_intensity += intensity;
        self.count += 1;

        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    /// Add the statistics of `other` into this blob
    pub(crate) fn absorb(&mut self, other: &Blob) {
        self.sum_x += other.sum_x;
        self.sum_y += other.sum_y;
        self.sum_intensity += other.sum_intensity;
        self.count += other.count;

        self.xmin = self.xmin.min(other.xmin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymin = self.ymin.min(other.ymin);
        self.ymax = self.ymax.max(other.ymax);

        if (other.start_y, other.start_x) < (self.start_y, self.start_x) {
            self.start_x = other.start_x;
            self.start_y = other.start_y;
        }
    }
}

// <<< ACCUMULATE METHODS

// >>> PROPERTY METHODS

impl Blob {
    /// Unweighted center of mass as (x, y)
    pub fn centroid(&self) -> (f64, f64) {
        if self.count == 0 {
            return (0.0, 0.0);
        }

        let n = self.count as f64;
        (self.sum_x as f64 / n, self.sum_y as f64 / n)
    }

    /// Average pixel intensity
    pub fn mean_intensity(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }

        self.sum_intensity / self.count as f64
    }

    /// Width of the bounding box in pixels
    pub fn width(&self) -> u32 {
        self.xmax - self.xmin + 1
    }

    /// Height of the bounding box in pixels
    pub fn height(&self) -> u32 {
        self.ymax - self.ymin + 1
    }

    /// Number of pixels covered by the bounding box
    pub fn bbox_area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Fraction of the bounding box covered by the blob
    pub fn extent(&self) -> f64 {
        self.count as f64 / self.bbox_area() as f64
    }

    /// Inclusive bounding box in xyxy format
    pub fn as_xyxy(&self) -> [u32; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

// <<< PROPERTY METHODS
