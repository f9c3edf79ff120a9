// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use image::{DynamicImage, open as open_dynamic};
use npyz::{DType, NpyFile, TypeChar};

use crate::constant;
use crate::cv::{Blob, BlobExtractor, ScanReport, Threshold};
use crate::error::SpeckError;
use crate::im::SpeckBuffer;
use crate::{impl_enum_dispatch, match_variants};

/// A single-channel image in one of the supported pixel types
///
/// Color images are converted to luma on load so every variant can be fed
/// straight into a [`BlobExtractor`].
#[derive(Debug, Clone)]
pub enum SpeckImage {
    U8(SpeckBuffer<u8, Vec<u8>>),
    U16(SpeckBuffer<u16, Vec<u16>>),
    F32(SpeckBuffer<f32, Vec<f32>>),
}

// >>> I/O METHODS

impl SpeckImage {
    /// Open a new image from a provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to an image with a valid extension
    ///
    /// ```no_run
    /// use speck_core::im::SpeckImage;
    /// let image = SpeckImage::open("image.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SpeckImage, SpeckError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if ext == "npy" {
                let bytes = std::fs::read(&path).map_err(|_| {
                    SpeckError::NoFileError(path.as_ref().display().to_string())
                })?;

                let npy = NpyFile::new(&bytes[..]).map_err(|_| SpeckError::ImageReadError)?;
                return Self::new_from_numpy(npy);
            }

            if constant::IMAGE_DYNAMIC_FORMATS.iter().any(|e| e == &ext) {
                let image = open_dynamic(&path).map_err(|_| SpeckError::ImageReadError)?;
                return Self::new_from_dynamic(image);
            }
        }

        Err(SpeckError::ImageExtensionError)
    }

    /// Initialize a new image from a DynamicImage
    ///
    /// Grayscale images keep their bit depth. Alpha channels are dropped and
    /// color images are converted to luma at the matching depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{GrayImage, DynamicImage};
    /// use speck_core::im::SpeckImage;
    ///
    /// let gray = GrayImage::new(10, 10);
    /// let dynamic = DynamicImage::ImageLuma8(gray);
    /// let image = SpeckImage::new_from_dynamic(dynamic).unwrap();
    ///
    /// assert_eq!(image.width(), 10);
    /// ```
    pub fn new_from_dynamic(image: DynamicImage) -> Result<SpeckImage, SpeckError> {
        let width = image.width();
        let height = image.height();

        match image {
            DynamicImage::ImageLuma8(buffer) => Ok(SpeckImage::U8(SpeckBuffer::new(
                width,
                height,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageLumaA8(buffer) => Ok(SpeckImage::U8(SpeckBuffer::new(
                width,
                height,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|pixel| pixel[0])
                    .collect(),
            )?)),
            DynamicImage::ImageLuma16(buffer) => Ok(SpeckImage::U16(SpeckBuffer::new(
                width,
                height,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageLumaA16(buffer) => Ok(SpeckImage::U16(SpeckBuffer::new(
                width,
                height,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|pixel| pixel[0])
                    .collect(),
            )?)),
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Ok(SpeckImage::U8(
                SpeckBuffer::new(width, height, image.to_luma8().into_raw())?,
            )),
            DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgba16(_) => Ok(SpeckImage::U16(
                SpeckBuffer::new(width, height, image.to_luma16().into_raw())?,
            )),
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => Ok(SpeckImage::F32(
                SpeckBuffer::new(width, height, image.to_luma32f().into_raw())?,
            )),
            _ => Err(SpeckError::ImageFormatError),
        }
    }

    /// Initialize a new image from a numpy array buffer
    ///
    /// # Arguments
    ///
    /// * `npy` - A (height, width) or (height, width, 1) shaped numpy array buffer
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use npyz::NpyFile;
    /// use speck_core::im::SpeckImage;
    ///
    /// let bytes = std::fs::read("image.npy").unwrap();
    /// let npy = NpyFile::new(&bytes[..]).unwrap();
    /// let image = SpeckImage::new_from_numpy(npy);
    /// ```
    pub fn new_from_numpy(npy: NpyFile<&[u8]>) -> Result<SpeckImage, SpeckError> {
        let shape = npy.shape().to_vec();

        let (h, w, c) = match shape.len() {
            2 => (shape[0] as u32, shape[1] as u32, 1u32),
            3 => (shape[0] as u32, shape[1] as u32, shape[2] as u32),
            _ => {
                return Err(SpeckError::ImageError(
                    "Numpy arrays must have an (H, W) or (H, W, 1) shape.",
                ));
            }
        };

        if c != 1 {
            return Err(SpeckError::ImageFormatError);
        }

        match npy.dtype() {
            DType::Plain(x) => match (x.type_char(), x.size_field()) {
                (TypeChar::Uint, 1) => {
                    let data: Vec<u8> = npy.into_vec().map_err(|_| SpeckError::ImageReadError)?;
                    Ok(SpeckImage::U8(SpeckBuffer::new(w, h, data)?))
                }
                (TypeChar::Uint, 2) => {
                    let data: Vec<u16> = npy.into_vec().map_err(|_| SpeckError::ImageReadError)?;
                    Ok(SpeckImage::U16(SpeckBuffer::new(w, h, data)?))
                }
                (TypeChar::Float, 4) => {
                    let data: Vec<f32> = npy.into_vec().map_err(|_| SpeckError::ImageReadError)?;
                    Ok(SpeckImage::F32(SpeckBuffer::new(w, h, data)?))
                }
                _ => Err(SpeckError::ImageError(
                    "A numpy array with a valid data type was not detected.",
                )),
            },
            _ => Err(SpeckError::ImageError(
                "Only plain numpy arrays are currently supported.",
            )),
        }
    }
}

// <<< I/O METHODS

// >>> PROPERTY METHODS

impl_enum_dispatch!(SpeckImage, U8, U16, F32; width(&self) -> u32);
impl_enum_dispatch!(SpeckImage, U8, U16, F32; height(&self) -> u32);
impl_enum_dispatch!(SpeckImage, U8, U16, F32; len(&self) -> usize);
impl_enum_dispatch!(SpeckImage, U8, U16, F32; is_empty(&self) -> bool);

impl SpeckImage {
    /// Name of the pixel type
    pub fn dtype(&self) -> &'static str {
        match self {
            SpeckImage::U8(_) => "u8",
            SpeckImage::U16(_) => "u16",
            SpeckImage::F32(_) => "f32",
        }
    }
}

// <<< PROPERTY METHODS

// >>> MEASURE METHODS

impl SpeckImage {
    /// Scan the image for blobs after binarizing it with `threshold`
    ///
    /// # Arguments
    ///
    /// * `extractor` - A reusable extractor; it is reset before scanning
    /// * `threshold` - Binarization rule applied to every pixel
    /// * `min_size` - Blobs with fewer pixels are dropped
    /// * `output` - Caller-owned output slots; its length caps the number of blobs
    pub fn extract(
        &self,
        extractor: &mut BlobExtractor,
        threshold: &Threshold,
        min_size: u32,
        output: &mut [Blob],
    ) -> ScanReport {
        match_variants!(self, SpeckImage, U8, U16, F32; buffer => {
            extractor.scan(buffer, |p| threshold.is_foreground(p), min_size, output)
        })
    }
}

// <<< MEASURE METHODS

#[cfg(test)]
mod test {

    use super::*;
    use crate::cv::ScanStatus;
    use image::{GrayImage, Luma, RgbImage};

    #[test]
    fn test_image_from_dynamic_gray() {
        let mut gray = GrayImage::new(4, 3);
        gray.put_pixel(1, 1, Luma([200u8]));

        let image = SpeckImage::new_from_dynamic(DynamicImage::ImageLuma8(gray)).unwrap();

        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 3);
        assert_eq!(image.dtype(), "u8");
        assert_eq!(image.len(), 12);
    }

    #[test]
    fn test_image_from_dynamic_rgb() {
        let rgb = RgbImage::new(2, 2);
        let image = SpeckImage::new_from_dynamic(DynamicImage::ImageRgb8(rgb)).unwrap();
        assert_eq!(image.dtype(), "u8");
    }

    #[test]
    fn test_image_open_bad_extension() {
        let image = SpeckImage::open("image.unknown");
        assert!(matches!(image, Err(SpeckError::ImageExtensionError)));
    }

    #[test]
    fn test_image_save_and_open() {
        const TEST_IMAGE: &str = "TEST_SPECK_IMAGE_OPEN.png";

        let mut gray = GrayImage::new(5, 5);
        for (x, y) in [(1, 1), (2, 1), (1, 2), (4, 4)] {
            gray.put_pixel(x, y, Luma([255u8]));
        }
        gray.save(TEST_IMAGE).unwrap();

        let image = SpeckImage::open(TEST_IMAGE).unwrap();
        std::fs::remove_file(TEST_IMAGE).unwrap();

        let mut extractor = BlobExtractor::default();
        let mut output = vec![Blob::default(); 8];
        let report = image.extract(&mut extractor, &Threshold::default(), 1, &mut output);

        assert_eq!(report.status, ScanStatus::Complete);
        assert_eq!(report.count, 2);
        assert_eq!(output[0].count, 3);
        assert_eq!(output[1].count, 1);
    }
}
