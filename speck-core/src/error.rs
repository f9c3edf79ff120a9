// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fmt;

use crate::cv::ScanStatus;

#[derive(Debug, Clone)]
pub enum SpeckError {
    BufferSizeError,
    CapacityError(&'static str),
    ImageError(&'static str),
    ImageReadError,
    ImageFormatError,
    ImageExtensionError,
    ScanIncomplete(ScanStatus),
    TableWriteError(String),
    JsonWriteError,
    NoFileError(String),
    DirError(String),
    OtherError(String),
}

impl fmt::Display for SpeckError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpeckError::BufferSizeError => {
                write!(
                    f,
                    "[speck::BufferSizeError] The buffer is too small for the provided width, height, and stride."
                )
            }
            SpeckError::CapacityError(message) => {
                write!(f, "[speck::CapacityError] Invalid capacity. {}", message)
            }
            SpeckError::ImageError(message) => {
                write!(f, "[speck::ImageError] Failed to create image. {}", message)
            }
            SpeckError::ImageReadError => {
                write!(f, "[speck::ImageReadError] Failed to read image.")
            }
            SpeckError::ImageFormatError => {
                write!(
                    f,
                    "[speck::ImageFormatError] Only single-channel u8, u16, and f32 images are currently supported."
                )
            }
            SpeckError::ImageExtensionError => {
                write!(
                    f,
                    "[speck::ImageExtensionError] Could not detect a valid image extension for input."
                )
            }
            SpeckError::ScanIncomplete(status) => {
                write!(
                    f,
                    "[speck::ScanIncomplete] The scan stopped early ({}). Only blobs completed before the overflow were reported.",
                    status
                )
            }
            SpeckError::TableWriteError(message) => {
                write!(f, "[speck::TableWriteError] Failed to write table. {}", message)
            }
            SpeckError::JsonWriteError => {
                write!(
                    f,
                    "[speck::JsonWriteError] Failed to successfully write blobs to output."
                )
            }
            SpeckError::NoFileError(message) => {
                write!(
                    f,
                    "[speck::NoFileError] File could not be found. {}.",
                    message
                )
            }
            SpeckError::DirError(message) => {
                write!(
                    f,
                    "[speck::DirError] Directory could not be read. {}.",
                    message
                )
            }
            SpeckError::OtherError(message) => {
                write!(f, "[speck::OtherError] Error: {}.", message)
            }
        }
    }
}

impl std::error::Error for SpeckError {}
