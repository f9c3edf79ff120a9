// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::ops::Deref;

use image::{ImageBuffer, Luma};
use num::ToPrimitive;

/// Read-only, row-major access to a single-channel image
///
/// Implementors only describe their geometry and expose the backing slice;
/// row and pixel lookups are derived from the stride and are bounds-checked.
pub trait Raster {
    type Pixel: Copy + ToPrimitive;

    /// Number of pixels per row
    fn width(&self) -> u32;

    /// Number of rows
    fn height(&self) -> u32;

    /// Number of elements between the starts of two consecutive rows
    fn stride(&self) -> usize;

    /// The backing pixel storage, including any row padding
    fn as_slice(&self) -> &[Self::Pixel];

    /// The visible pixels of row `y`
    fn row(&self, y: u32) -> &[Self::Pixel] {
        let start = y as usize * self.stride();
        &self.as_slice()[start..start + self.width() as usize]
    }

    /// The pixel at column `x` of row `y`
    fn intensity(&self, x: u32, y: u32) -> Self::Pixel {
        self.row(y)[x as usize]
    }
}

macro_rules! impl_raster_for_luma {
    ($($t:ty),*) => {
        $(
            impl<C> Raster for ImageBuffer<Luma<$t>, C>
            where
                C: Deref<Target = [$t]>,
            {
                type Pixel = $t;

                fn width(&self) -> u32 {
                    ImageBuffer::width(self)
                }

                fn height(&self) -> u32 {
                    ImageBuffer::height(self)
                }

                fn stride(&self) -> usize {
                    ImageBuffer::width(self) as usize
                }

                fn as_slice(&self) -> &[$t] {
                    self.as_raw()
                }
            }
        )*
    };
}

impl_raster_for_luma!(u8, u16, f32);
