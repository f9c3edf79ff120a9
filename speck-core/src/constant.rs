// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// Default number of blobs that may be open (not yet provably complete) at once
pub const DEFAULT_MAX_OPEN_BLOBS: usize = 64;

// Default number of foreground runs a single row may hold
pub const DEFAULT_MAX_RUNS_PER_ROW: usize = 64;

// Default number of blobs a single scan may emit
pub const DEFAULT_MAX_OUTPUT_BLOBS: usize = 4096;

// All currently supported image formats
pub const SUPPORTED_IMAGE_FORMATS: [&str; 18] = [
    "avif", "bmp", "dds", "hdr", "ico", "jpeg", "jpg", "exr", "png", "pbm", "pgm", "ppm", "qoi",
    "tga", "tif", "tiff", "webp", "npy",
];

// The currently supported common image formats
pub const IMAGE_DYNAMIC_FORMATS: [&str; 17] = [
    "avif", "bmp", "dds", "hdr", "ico", "jpeg", "jpg", "exr", "png", "pbm", "pgm", "ppm", "qoi",
    "tga", "tif", "tiff", "webp",
];

// Formats blob tables can be written to
pub const SUPPORTED_TABLE_FORMATS: [&str; 6] = ["csv", "tsv", "txt", "parquet", "pq", "json"];

// Column names for blob tables
pub const BLOB_TABLE_COLUMNS: [&str; 11] = [
    "id",
    "start_x",
    "start_y",
    "xmin",
    "ymin",
    "xmax",
    "ymax",
    "area",
    "centroid_x",
    "centroid_y",
    "mean_intensity",
];
