// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

//! Single-pass, bounded-memory extraction of connected foreground blobs
//!
//! The extractor scans a binarized raster once, top-to-bottom and
//! left-to-right, and streams every blob out as soon as no later row can
//! extend it. No label image is ever built and memory use is fixed by the
//! open-blob and per-row run capacities chosen at construction.
//!
//! # Examples
//!
//! ```
//! use speck_core::cv::{BlobExtractor, ScanStatus, is_nonzero};
//! use speck_core::im::SpeckBuffer;
//!
//! let pixels: Vec<u8> = vec![
//!     0, 0, 0, 0, 0, 0,
//!     0, 1, 1, 0, 0, 0,
//!     0, 1, 1, 0, 0, 1,
//!     0, 0, 0, 0, 0, 0,
//! ];
//!
//! // One background pixel inside a row does not split a blob; two do
//! let raster = SpeckBuffer::new(6, 4, pixels).unwrap();
//! let mut extractor = BlobExtractor::default();
//! let (blobs, status) = extractor.extract(&raster, is_nonzero, 1, 16);
//!
//! assert_eq!(status, ScanStatus::Complete);
//! assert_eq!(blobs.len(), 2);
//! ```

pub mod constant;
pub mod cv;
pub mod error;
pub mod im;
pub mod io;
pub mod ut;
