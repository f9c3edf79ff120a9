// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::iter::Iterator;
use std::marker::PhantomData;
use std::ops::Deref;

use num::ToPrimitive;

use crate::error::SpeckError;
use crate::im::Raster;

/// A row-major, single-channel container storing a grid of pixels.
///
/// The struct is generic over the pixel type `T` and over the container that
/// holds raw pixel data as a slice (`[T]`) or vector (`Vec<T>`). Rows may be
/// padded: `stride` is the number of elements between the starts of two
/// consecutive rows and must be at least the width. The container must hold
/// at least `stride * (h - 1) + w` elements.
///
/// # Examples
///
/// ```
/// use speck_core::im::SpeckBuffer;
///
/// let width = 10;
/// let height = 10;
/// let data = vec![0u8; (width * height) as usize];
///
/// let buffer = SpeckBuffer::new(width, height, data);
///
/// assert_eq!(buffer.unwrap().len(), (width * height) as usize);
/// ```
///
/// ```
/// use speck_core::im::SpeckBuffer;
///
/// let data = vec![0u8; 12];
///
/// // Two rows of 4 pixels padded to a stride of 6
/// let buffer = SpeckBuffer::with_stride(4, 2, 6, data.as_slice());
/// assert!(buffer.is_ok());
///
/// // Stride smaller than width
/// let buffer = SpeckBuffer::with_stride(4, 2, 3, data.as_slice());
/// assert!(buffer.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SpeckBuffer<T, Container> {
    w: u32,                   // Width
    h: u32,                   // Height
    stride: usize,            // Elements per row including padding
    pub buffer: Container,    // Slice
    _phantom: PhantomData<T>, // Pixel
}

impl<T, Container> SpeckBuffer<T, Container>
where
    T: Copy + ToPrimitive,
    Container: Deref<Target = [T]>,
{
    /// Initializes a tightly packed buffer from a generic data container
    ///
    /// # Arguments
    ///
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `buffer` - A generic container (e.g. `Vec` or slice) of `width * height` pixels
    pub fn new(
        width: u32,
        height: u32,
        buffer: Container,
    ) -> Result<SpeckBuffer<T, Container>, SpeckError> {
        if width as usize * height as usize != buffer.len() {
            return Err(SpeckError::BufferSizeError);
        }

        Self::with_stride(width, height, width as usize, buffer)
    }

    /// Initializes a buffer whose rows are `stride` elements apart
    ///
    /// # Arguments
    ///
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `stride` - Number of elements between the starts of consecutive rows
    /// * `buffer` - A generic container (e.g. `Vec` or slice)
    pub fn with_stride(
        width: u32,
        height: u32,
        stride: usize,
        buffer: Container,
    ) -> Result<SpeckBuffer<T, Container>, SpeckError> {
        if stride < width as usize {
            return Err(SpeckError::ImageError("Stride must not be smaller than width."));
        }

        let required = match height {
            0 => 0,
            h => stride * (h as usize - 1) + width as usize,
        };

        if buffer.len() < required {
            return Err(SpeckError::BufferSizeError);
        }

        Ok(SpeckBuffer {
            w: width,
            h: height,
            stride,
            buffer,
            _phantom: PhantomData,
        })
    }
}

// >>> PROPERTY METHODS

impl<T, Container> SpeckBuffer<T, Container>
where
    T: Copy + ToPrimitive,
    Container: Deref<Target = [T]>,
{
    /// Width of the image
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height of the image
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Number of elements between the starts of consecutive rows
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Shape/dimensions of the image
    pub fn shape(&self) -> (u32, u32) {
        (self.h, self.w)
    }

    /// Number of visible pixels
    pub fn len(&self) -> usize {
        self.w as usize * self.h as usize
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl<T, Container> SpeckBuffer<T, Container>
where
    T: Copy + ToPrimitive,
    Container: Deref<Target = [T]>,
{
    /// Returns the raw buffer
    pub fn into_raw(self) -> Container {
        self.buffer
    }

    /// Returns a reference to the raw buffer
    pub fn as_raw(&self) -> &Container {
        &self.buffer
    }

    /// An iterator over the visible part of each row
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.h).map(move |y| self.row(y))
    }

    /// Cast visible pixels to f64 and return them row-major without padding
    pub fn to_f64(&self) -> Vec<f64> {
        self.iter_rows()
            .flat_map(|row| row.iter().map(|x| x.to_f64().unwrap_or(0f64)))
            .collect()
    }
}

// <<< CONVERSION METHODS

impl<T, Container> Raster for SpeckBuffer<T, Container>
where
    T: Copy + ToPrimitive,
    Container: Deref<Target = [T]>,
{
    type Pixel = T;

    fn width(&self) -> u32 {
        self.w
    }

    fn height(&self) -> u32 {
        self.h
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn as_slice(&self) -> &[T] {
        &self.buffer
    }
}
