// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde_json::{Value, json};

use crate::cv::{Blob, ScanStatus};
use crate::error::SpeckError;

/// Convert blobs and the scan status into a json document
///
/// Each blob carries the same fields as a row of [`super::blobs_to_dataframe`].
///
/// # Examples
///
/// ```
/// use speck_core::cv::{Blob, ScanStatus};
/// use speck_core::io::blobs_to_json;
///
/// let blob = Blob { count: 1, ..Blob::default() };
/// let document = blobs_to_json(&[blob], ScanStatus::Complete);
///
/// assert_eq!(document["status"], "Complete");
/// assert_eq!(document["blobs"][0]["area"], 1);
/// ```
pub fn blobs_to_json(blobs: &[Blob], status: ScanStatus) -> Value {
    let blobs: Vec<Value> = blobs
        .iter()
        .enumerate()
        .map(|(id, blob)| {
            let (centroid_x, centroid_y) = blob.centroid();
            json!({
                "id": id,
                "start_x": blob.start_x,
                "start_y": blob.start_y,
                "xmin": blob.xmin,
                "ymin": blob.ymin,
                "xmax": blob.xmax,
                "ymax": blob.ymax,
                "area": blob.count,
                "centroid_x": centroid_x,
                "centroid_y": centroid_y,
                "mean_intensity": blob.mean_intensity(),
            })
        })
        .collect();

    json!({ "status": status, "blobs": blobs })
}

/// Write blobs and the scan status to a json file
pub fn write_blobs_json<P: AsRef<Path>>(
    path: P,
    blobs: &[Blob],
    status: ScanStatus,
) -> Result<(), SpeckError> {
    let file = File::create(path).map_err(|_| SpeckError::JsonWriteError)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer(writer, &blobs_to_json(blobs, status))
        .map_err(|_| SpeckError::JsonWriteError)?;

    Ok(())
}
