// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use speck_core::constant;
use speck_core::cv::{Blob, BlobExtractor, ScanStatus, Threshold};
use speck_core::error::SpeckError;
use speck_core::im::SpeckImage;
use speck_core::io;
use speck_core::ut;

#[derive(Debug, Args)]
#[command(about = "Extract connected blobs from binarized images in a single pass.")]
pub struct ExtractArgs {
    #[arg(short = 'i', long, help = "Image or image directory.", required = true)]
    pub image: Option<String>,

    #[arg(
        short = 'o',
        long,
        help = "Output file (.csv, .tsv, .txt, .parquet, .pq, .json) or output directory.",
        required = true
    )]
    pub output: Option<String>,

    #[arg(
        long,
        help = "Output format when writing to a directory.",
        default_value = "csv"
    )]
    pub format: String,

    #[arg(
        long,
        help = "Pixels strictly above this value are foreground.",
        default_value_t = 0.0
    )]
    pub threshold: f64,

    #[arg(long, help = "Pixels at or below the threshold are foreground instead.")]
    pub invert: bool,

    #[arg(long, help = "Blobs with fewer pixels are dropped.", default_value_t = 1)]
    pub min_size: u32,

    #[arg(
        long,
        help = "Maximum number of blobs open at once.",
        default_value_t = constant::DEFAULT_MAX_OPEN_BLOBS
    )]
    pub max_open: usize,

    #[arg(
        long,
        help = "Maximum number of foreground runs in a single row.",
        default_value_t = constant::DEFAULT_MAX_RUNS_PER_ROW
    )]
    pub max_runs: usize,

    #[arg(
        long,
        help = "Maximum number of blobs reported per image.",
        default_value_t = constant::DEFAULT_MAX_OUTPUT_BLOBS
    )]
    pub max_blobs: usize,

    #[arg(long, help = "Substring specifying images (e.g. _mask).")]
    pub image_substring: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

/// Shared settings for every image in a run
struct Settings {
    extractor: BlobExtractor,
    threshold: Threshold,
    min_size: u32,
    max_blobs: usize,
}

pub fn extract(args: &ExtractArgs) {
    if let Some(threads) = args.threads {
        if threads < 1 {
            eprintln!(
                "[speck::extract] ERROR: Threads must be set to a positive integer if provided."
            );
            std::process::exit(1);
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap_or_else(|err| {
                eprintln!("[speck::extract] ERROR: {}", err);
                std::process::exit(1);
            });
    }

    if args.max_blobs < 1 {
        eprintln!("[speck::extract] ERROR: Max blobs must be set to a positive integer.");
        std::process::exit(1);
    }

    let extractor = BlobExtractor::new(args.max_open, args.max_runs).unwrap_or_else(|err| {
        eprintln!("[speck::extract] ERROR: {}", err);
        std::process::exit(1);
    });

    let settings = Settings {
        extractor,
        threshold: Threshold::new(args.threshold, args.invert),
        min_size: args.min_size,
        max_blobs: args.max_blobs,
    };

    let image_path = args.image.to_owned().unwrap_or_default();
    let output = PathBuf::from(args.output.to_owned().unwrap_or_default());

    let image_extension = lowercase_extension(Path::new(&image_path));
    let output_extension = lowercase_extension(&output);

    let is_image_dir = match image_extension {
        Some(ext) => {
            if !constant::SUPPORTED_IMAGE_FORMATS.contains(&ext.as_str()) {
                eprintln!(
                    "[speck::extract] ERROR: Invalid image extension {}. Must be one of: {:?}.",
                    ext,
                    constant::SUPPORTED_IMAGE_FORMATS
                );
                std::process::exit(1);
            }
            false
        }
        None => true,
    };

    match output_extension {
        Some(ext) => {
            if is_image_dir {
                eprintln!(
                    "[speck::extract] ERROR: If image input is a directory then output must be a directory."
                );
                std::process::exit(1);
            }

            check_table_format(&ext);

            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    eprintln!(
                        "[speck::extract] ERROR: Invalid file path. Parent directory of output file path does not exist."
                    );
                    std::process::exit(1);
                }
            }

            extract_file(Path::new(&image_path), &output, &settings, args.verbose);
        }
        None => {
            if !is_image_dir {
                eprintln!(
                    "[speck::extract] ERROR: If output is a directory then image input must be a directory."
                );
                std::process::exit(1);
            }

            let format = args.format.to_lowercase();
            check_table_format(&format);

            extract_directory(
                Path::new(&image_path),
                &output,
                &format,
                args.image_substring.as_deref(),
                &settings,
                args.verbose,
            );
        }
    }
}

fn extract_file(image_path: &Path, output_path: &Path, settings: &Settings, verbose: bool) {
    let mut extractor = settings.extractor.clone();
    let mut output = vec![Blob::default(); settings.max_blobs];

    let status = extract_image(
        image_path,
        output_path,
        &mut extractor,
        &mut output,
        settings,
    )
    .unwrap_or_else(|err| {
        eprintln!("[speck::extract] ERROR: {}", err);
        std::process::exit(1);
    });

    if !status.is_complete() {
        ut::track::warning_log(&format!(
            "Scan of {} stopped early ({}). Output only holds blobs completed before the overflow.",
            image_path.display(),
            status
        ));
    }

    ut::track::progress_log(
        &format!("Complete. Blobs written to {}.", output_path.display()),
        verbose,
    );
}

fn extract_directory(
    image_dir: &Path,
    output_dir: &Path,
    format: &str,
    substring: Option<&str>,
    settings: &Settings,
    verbose: bool,
) {
    let image_files = ut::path::collect_file_paths(
        image_dir,
        constant::SUPPORTED_IMAGE_FORMATS.as_slice(),
        substring,
    )
    .unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    if image_files.is_empty() {
        eprintln!(
            "[speck::extract] ERROR: No image files were detected. Please check your path and/or substring identifier."
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Detected {} images.",
            ut::track::thousands_format(image_files.len())
        ),
        verbose,
    );

    let output_dir = ut::path::create_directory(output_dir).unwrap_or_else(|err| {
        eprintln!("[speck::extract] ERROR: Could not create directory. {}", err);
        std::process::exit(1);
    });

    let pb = ut::track::progress_bar(image_files.len(), "Extracting blobs", verbose);

    let error: Mutex<Vec<usize>> = Mutex::new(Vec::new());
    let incomplete: Mutex<Vec<(usize, ScanStatus)>> = Mutex::new(Vec::new());

    (0..image_files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .map_init(
            || {
                (
                    settings.extractor.clone(),
                    vec![Blob::default(); settings.max_blobs],
                )
            },
            |(extractor, output), idx| {
                let result = ut::path::output_path(&image_files[idx], &output_dir, format)
                    .and_then(|path| {
                        extract_image(&image_files[idx], &path, extractor, output, settings)
                    });
                (idx, result)
            },
        )
        .for_each(|(idx, result)| match result {
            Ok(ScanStatus::Complete) => {}
            Ok(status) => incomplete
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((idx, status)),
            Err(_) => error
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(idx),
        });

    let error = error
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut incomplete = incomplete
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if verbose {
        println!()
    }

    incomplete.sort_by_key(|(idx, _)| *idx);
    for (idx, status) in incomplete.iter() {
        ut::track::warning_log(&format!(
            "Scan of {} stopped early ({}).",
            image_files[*idx].display(),
            status
        ));
    }

    let message = if !error.is_empty() {
        format!(
            "Complete. Blobs extracted from {} images. {} images failed.",
            ut::track::thousands_format(image_files.len() - error.len()),
            ut::track::thousands_format(error.len())
        )
    } else {
        format!(
            "Complete. Blobs extracted from {} images.",
            ut::track::thousands_format(image_files.len()),
        )
    };

    ut::track::progress_log(&message, verbose);

    if !error.is_empty() {
        std::process::exit(1);
    }
}

/// Open, scan, and write blobs for a single image
fn extract_image(
    image_path: &Path,
    output_path: &Path,
    extractor: &mut BlobExtractor,
    output: &mut [Blob],
    settings: &Settings,
) -> Result<ScanStatus, SpeckError> {
    let image = SpeckImage::open(image_path)?;
    let report = image.extract(extractor, &settings.threshold, settings.min_size, output);

    io::write_blobs(output_path, &output[..report.count], report.status)?;

    Ok(report.status)
}

fn check_table_format(ext: &str) {
    if !constant::SUPPORTED_TABLE_FORMATS.contains(&ext) {
        eprintln!(
            "[speck::extract] ERROR: Invalid output format {}. Must be one of: {:?}.",
            ext,
            constant::SUPPORTED_TABLE_FORMATS
        );
        std::process::exit(1);
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}
