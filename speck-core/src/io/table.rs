// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::constant::BLOB_TABLE_COLUMNS;
use crate::cv::{Blob, ScanStatus};
use crate::error::SpeckError;
use crate::io::write_blobs_json;

/// Convert blobs into a table with one row per blob
///
/// # Examples
///
/// ```
/// use speck_core::cv::Blob;
/// use speck_core::io::blobs_to_dataframe;
///
/// let blobs = vec![Blob { count: 4, ..Blob::default() }; 3];
/// let df = blobs_to_dataframe(&blobs).unwrap();
///
/// assert_eq!(df.shape(), (3, 11));
/// ```
pub fn blobs_to_dataframe(blobs: &[Blob]) -> Result<DataFrame, SpeckError> {
    let u32_column = |f: fn(&Blob) -> u32| blobs.iter().map(f).collect::<Vec<u32>>();
    let f64_column = |f: fn(&Blob) -> f64| blobs.iter().map(f).collect::<Vec<f64>>();

    let [id, start_x, start_y, xmin, ymin, xmax, ymax, area, centroid_x, centroid_y, mean] =
        BLOB_TABLE_COLUMNS;

    let columns = vec![
        Column::new(id.into(), (0..blobs.len() as u32).collect::<Vec<u32>>()),
        Column::new(start_x.into(), u32_column(|b| b.start_x)),
        Column::new(start_y.into(), u32_column(|b| b.start_y)),
        Column::new(xmin.into(), u32_column(|b| b.xmin)),
        Column::new(ymin.into(), u32_column(|b| b.ymin)),
        Column::new(xmax.into(), u32_column(|b| b.xmax)),
        Column::new(ymax.into(), u32_column(|b| b.ymax)),
        Column::new(area.into(), u32_column(|b| b.count)),
        Column::new(centroid_x.into(), f64_column(|b| b.centroid().0)),
        Column::new(centroid_y.into(), f64_column(|b| b.centroid().1)),
        Column::new(mean.into(), f64_column(|b| b.mean_intensity())),
    ];

    DataFrame::new(columns).map_err(|err| SpeckError::TableWriteError(err.to_string()))
}

/// Write a table to a CSV file
///
/// # Arguments
///
/// * `df` - A DataFrame
/// * `path` - Output file
/// * `header` - Whether the output file should contain a header
///
/// # Examples
///
/// ```no_run
/// use polars::prelude::*;
/// use speck_core::io::write_table_csv;
///
/// let column = vec![Column::new("area".into(), [2u32, 3, 4])];
/// let mut df: DataFrame = DataFrame::new(column).unwrap();
///
/// write_table_csv(&mut df, "output.csv", true).unwrap()
/// ```
pub fn write_table_csv<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    header: bool,
) -> Result<(), SpeckError> {
    write_table_delimited(df, path, header, b',')
}

/// Write a table to a TSV file
///
/// # Arguments
///
/// * `df` - A DataFrame
/// * `path` - Output file
/// * `header` - Whether the output file should contain a header
pub fn write_table_tsv<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    header: bool,
) -> Result<(), SpeckError> {
    write_table_delimited(df, path, header, b'\t')
}

fn write_table_delimited<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    header: bool,
    separator: u8,
) -> Result<(), SpeckError> {
    let mut output: File = File::create(&path).map_err(|_| {
        SpeckError::TableWriteError(format!(
            "Failed to create file: {}",
            path.as_ref().display()
        ))
    })?;

    CsvWriter::new(&mut output)
        .include_header(header)
        .with_separator(separator)
        .finish(df)
        .map_err(|err| SpeckError::TableWriteError(err.to_string()))
}

/// Write a table to a parquet file
///
/// # Arguments
///
/// * `df` - A DataFrame
/// * `path` - Output file
pub fn write_table_pq<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), SpeckError> {
    let mut output: File = File::create(&path).map_err(|_| {
        SpeckError::TableWriteError(format!(
            "Failed to create parquet file: {}",
            path.as_ref().display()
        ))
    })?;

    ParquetWriter::new(&mut output)
        .finish(df)
        .map(|_| ())
        .map_err(|err| SpeckError::TableWriteError(err.to_string()))
}

/// Write a DataFrame to disk, choosing the format from the file extension
///
/// # Arguments
///
/// * `df` - A DataFrame
/// * `path` - Output file ending in csv, tsv, txt, parquet, or pq
pub fn write_table<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), SpeckError> {
    match extension(&path).as_deref() {
        Some("csv") => write_table_csv(df, path, true),
        Some("tsv") | Some("txt") => write_table_tsv(df, path, true),
        Some("parquet") | Some("pq") => write_table_pq(df, path),
        _ => Err(SpeckError::TableWriteError(
            "Provided table path has an invalid extension. Must be one of: csv, tsv, txt, parquet, or pq.".to_string(),
        )),
    }
}

/// Write blobs to disk as json or as a table, depending on the file extension
///
/// The scan status is only recorded in json output.
///
/// # Examples
///
/// ```no_run
/// use speck_core::cv::{ScanStatus, extract_blobs};
/// use speck_core::im::SpeckBuffer;
/// use speck_core::io::write_blobs;
///
/// let raster = SpeckBuffer::new(2, 1, vec![1u8, 0]).unwrap();
/// let (blobs, status) = extract_blobs(&raster, 1);
///
/// write_blobs("blobs.csv", &blobs, status).unwrap();
/// write_blobs("blobs.json", &blobs, status).unwrap();
/// ```
pub fn write_blobs<P: AsRef<Path>>(
    path: P,
    blobs: &[Blob],
    status: ScanStatus,
) -> Result<(), SpeckError> {
    if extension(&path).as_deref() == Some("json") {
        return write_blobs_json(path, blobs, status);
    }

    let mut df = blobs_to_dataframe(blobs)?;
    write_table(&mut df, path)
}

fn extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}
