// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use crate::error::SpeckError;

/// Create a new directory, appending an incrementing suffix if it exists
///
/// # Arguments
///
/// * `directory` - Path to new directory - no overwrites allowed
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use speck_core::ut::path::create_directory;
///
/// let base = Path::new("TEST_SPECK_CREATE_DIRECTORY");
/// std::fs::create_dir(base).unwrap();
///
/// let created = create_directory(base).unwrap();
/// assert_eq!(created, Path::new("TEST_SPECK_CREATE_DIRECTORY_0"));
///
/// std::fs::remove_dir(base).unwrap();
/// std::fs::remove_dir(created).unwrap();
/// ```
pub fn create_directory<P: AsRef<Path>>(directory: P) -> Result<PathBuf, SpeckError> {
    let directory = directory.as_ref();

    if !directory.exists() {
        std::fs::create_dir_all(directory).map_err(|err| SpeckError::DirError(err.to_string()))?;
        return Ok(directory.to_path_buf());
    }

    let parent = directory.parent().unwrap_or_else(|| Path::new("."));
    let base_name = directory
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SpeckError::DirError("Invalid directory name".to_string()))?;

    for index in 0..30 {
        let new_dir = parent.join(format!("{}_{}", base_name, index));

        if !new_dir.exists() {
            std::fs::create_dir(&new_dir).map_err(|err| SpeckError::DirError(err.to_string()))?;
            return Ok(new_dir);
        }
    }

    Err(SpeckError::DirError(format!(
        "Could not create a directory in alotted increments. Check the directory path: {}",
        directory.display()
    )))
}

/// Collect file paths with a valid extension, optionally filtered by substring
///
/// Paths are returned sorted so batch outputs are reproducible.
///
/// # Arguments
///
/// * `directory` - Path to directory containing files
/// * `valid_ext` - Lowercase extensions to keep
/// * `substring` - Only include files whose name contains this substring
///
/// # Examples
///
/// ```no_run
/// use speck_core::ut::path::collect_file_paths;
/// use speck_core::constant::SUPPORTED_IMAGE_FORMATS;
/// let files = collect_file_paths("directory/", SUPPORTED_IMAGE_FORMATS.as_slice(), None);
/// ```
pub fn collect_file_paths<P: AsRef<Path>>(
    directory: P,
    valid_ext: &[&str],
    substring: Option<&str>,
) -> Result<Vec<PathBuf>, SpeckError> {
    let directory = directory.as_ref();

    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)
        .map_err(|_| SpeckError::DirError(directory.display().to_string()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| valid_ext.contains(&ext.to_lowercase().as_str()))
        })
        .filter(|path| match substring {
            Some(substring) => path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(substring)),
            None => true,
        })
        .collect();

    files.sort();

    Ok(files)
}

/// Output path for one input file: `<directory>/<stem>.<extension>`
pub fn output_path<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    directory: Q,
    extension: &str,
) -> Result<PathBuf, SpeckError> {
    let stem = input
        .as_ref()
        .file_stem()
        .ok_or_else(|| SpeckError::NoFileError(input.as_ref().display().to_string()))?;

    Ok(directory
        .as_ref()
        .join(format!("{}.{}", stem.to_string_lossy(), extension)))
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_collect_file_paths_filters() {
        const TEST_DIR: &str = "TEST_SPECK_COLLECT_FILE_PATHS";

        std::fs::create_dir_all(TEST_DIR).unwrap();
        for name in ["b_image.png", "a_image.PNG", "a_mask.png", "notes.txt"] {
            std::fs::write(Path::new(TEST_DIR).join(name), b"").unwrap();
        }

        let all = collect_file_paths(TEST_DIR, &["png"], None).unwrap();
        let images = collect_file_paths(TEST_DIR, &["png"], Some("image")).unwrap();
        let missing = collect_file_paths("TEST_SPECK_MISSING_DIR", &["png"], None);

        std::fs::remove_dir_all(TEST_DIR).unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(images.len(), 2);
        assert!(images[0].ends_with("a_image.PNG"));
        assert!(missing.is_err());
    }

    #[test]
    fn test_output_path() {
        let path = output_path("data/cells/img_01.tif", "out", "csv").unwrap();
        assert_eq!(path, PathBuf::from("out/img_01.csv"));

        let path = output_path("plate.a1.png", "out", "json").unwrap();
        assert_eq!(path, PathBuf::from("out/plate.a1.json"));
    }
}
