// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fmt;

use num::{ToPrimitive, Zero};
use serde::Serialize;

use crate::constant;
use crate::cv::{Blob, SlotPool, is_nonzero};
use crate::error::SpeckError;
use crate::im::Raster;

/// Terminal state of a scan
///
/// Every overflow stops the scan immediately. Blobs emitted before the
/// overflow stay valid, but the result set is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScanStatus {
    /// The whole image was scanned and every eligible blob was emitted
    Complete,
    /// A row needed more runs than the per-row capacity
    TooManyRunsInRow,
    /// A new blob was needed while every pool slot was open
    TooManyOpenBlobs,
    /// The output buffer was full when another blob completed
    TooManyBlobsEmitted,
}

impl ScanStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, ScanStatus::Complete)
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ScanStatus::Complete => "complete",
            ScanStatus::TooManyRunsInRow => "too many runs in row",
            ScanStatus::TooManyOpenBlobs => "too many open blobs",
            ScanStatus::TooManyBlobsEmitted => "too many blobs emitted",
        };

        write!(f, "{}", name)
    }
}

/// Number of blobs written to the output buffer and how the scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub count: usize,
    pub status: ScanStatus,
}

impl ScanReport {
    /// Treat an incomplete scan as an error
    pub fn into_result(self) -> Result<usize, SpeckError> {
        match self.status {
            ScanStatus::Complete => Ok(self.count),
            status => Err(SpeckError::ScanIncomplete(status)),
        }
    }
}

/// One maximal horizontal foreground span, bridged across single-pixel gaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    x_start: u32,
    x_end: u32, // last foreground column
    slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Background,
    OnRun,
    SingleGap,
}

/// Single-pass, bounded-memory connected blob extractor
///
/// The extractor visits every pixel exactly once, top-to-bottom and
/// left-to-right. Foreground runs of the current row are connected to runs
/// of the previous row with 8-connectivity; one isolated background pixel
/// inside a run does not end it. Blobs are streamed to the caller at the
/// first row boundary where nothing extended them, so memory is bounded by
/// the pool and run capacities rather than the image size.
///
/// All state lives in the extractor and is reset at the start of every
/// scan, so one value can be reused across images (one per thread).
///
/// # Examples
///
/// ```
/// use speck_core::cv::{Blob, BlobExtractor, ScanStatus};
/// use speck_core::im::SpeckBuffer;
///
/// let pixels: Vec<u8> = vec![
///     9, 9, 0, 0,
///     9, 9, 0, 0,
///     0, 0, 0, 7,
/// ];
/// let raster = SpeckBuffer::new(4, 3, pixels).unwrap();
///
/// let mut extractor = BlobExtractor::new(8, 8).unwrap();
/// let mut output = [Blob::default(); 4];
/// let report = extractor.scan(&raster, |p| p > 5, 1, &mut output);
///
/// assert_eq!(report.status, ScanStatus::Complete);
/// assert_eq!(report.count, 2);
/// assert_eq!(output[0].as_xyxy(), [0, 0, 1, 1]);
/// assert_eq!(output[1].count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct BlobExtractor {
    pool: SlotPool,
    rows: [Vec<Run>; 2],
    previous: usize, // index of the row just finished
    max_runs_per_row: usize,
}

impl Default for BlobExtractor {
    fn default() -> Self {
        Self::with_capacity(
            constant::DEFAULT_MAX_OPEN_BLOBS,
            constant::DEFAULT_MAX_RUNS_PER_ROW,
        )
    }
}

impl BlobExtractor {
    /// Initialize an extractor with fixed capacities
    ///
    /// # Arguments
    ///
    /// * `max_open_blobs` - Number of blobs that may be open at once
    /// * `max_runs_per_row` - Number of foreground runs a single row may hold
    pub fn new(max_open_blobs: usize, max_runs_per_row: usize) -> Result<Self, SpeckError> {
        if max_open_blobs == 0 {
            return Err(SpeckError::CapacityError(
                "At least one open blob slot is required.",
            ));
        }

        if max_runs_per_row == 0 {
            return Err(SpeckError::CapacityError(
                "At least one run per row is required.",
            ));
        }

        Ok(Self::with_capacity(max_open_blobs, max_runs_per_row))
    }

    fn with_capacity(max_open_blobs: usize, max_runs_per_row: usize) -> Self {
        BlobExtractor {
            pool: SlotPool::new(max_open_blobs),
            rows: [
                Vec::with_capacity(max_runs_per_row),
                Vec::with_capacity(max_runs_per_row),
            ],
            previous: 0,
            max_runs_per_row,
        }
    }

    pub fn max_open_blobs(&self) -> usize {
        self.pool.capacity()
    }

    pub fn max_runs_per_row(&self) -> usize {
        self.max_runs_per_row
    }

    /// The slot pool as left by the last scan
    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    /// Forget everything from a previous scan
    pub fn reset(&mut self) {
        self.pool.reset();
        self.rows.iter_mut().for_each(|row| row.clear());
        self.previous = 0;
    }

    /// Scan a raster and write completed blobs into `output`
    ///
    /// # Arguments
    ///
    /// * `raster` - Image to scan
    /// * `is_foreground` - Binarization predicate applied to each pixel
    /// * `min_size` - Blobs with fewer pixels are dropped and take no output slot
    /// * `output` - Caller-owned buffer; its length is the maximum number of blobs
    pub fn scan<R, F>(
        &mut self,
        raster: &R,
        is_foreground: F,
        min_size: u32,
        output: &mut [Blob],
    ) -> ScanReport
    where
        R: Raster,
        F: Fn(R::Pixel) -> bool,
    {
        self.reset();

        let mut count = 0usize;
        let mut emit = |blob: &Blob| -> Result<(), ScanStatus> {
            if blob.count < min_size {
                return Ok(());
            }

            let slot = output
                .get_mut(count)
                .ok_or(ScanStatus::TooManyBlobsEmitted)?;
            *slot = *blob;
            count += 1;

            Ok(())
        };

        let status = match self.scan_rows(raster, &is_foreground, &mut emit) {
            Ok(()) => ScanStatus::Complete,
            Err(status) => status,
        };

        ScanReport { count, status }
    }

    /// Scan a raster and collect at most `max_blobs` blobs into a vector
    pub fn extract<R, F>(
        &mut self,
        raster: &R,
        is_foreground: F,
        min_size: u32,
        max_blobs: usize,
    ) -> (Vec<Blob>, ScanStatus)
    where
        R: Raster,
        F: Fn(R::Pixel) -> bool,
    {
        let mut output = vec![Blob::default(); max_blobs];
        let report = self.scan(raster, is_foreground, min_size, &mut output);
        output.truncate(report.count);

        (output, report.status)
    }

    fn scan_rows<R, F, E>(
        &mut self,
        raster: &R,
        is_foreground: &F,
        emit: &mut E,
    ) -> Result<(), ScanStatus>
    where
        R: Raster,
        F: Fn(R::Pixel) -> bool,
        E: FnMut(&Blob) -> Result<(), ScanStatus>,
    {
        let height = raster.height();

        for y in 0..height {
            self.scan_row(raster.row(y), y, is_foreground)?;
            self.previous = 1 - self.previous;

            // Rows only connect to the row directly above, so anything
            // untouched now can never grow again.
            if y + 1 < height {
                self.pool.flush(false, &mut *emit)?;
            }
        }

        self.pool.flush(true, emit)
    }

    fn scan_row<P, F>(&mut self, row: &[P], y: u32, is_foreground: &F) -> Result<(), ScanStatus>
    where
        P: Copy + ToPrimitive,
        F: Fn(P) -> bool,
    {
        let BlobExtractor {
            pool,
            rows,
            previous,
            max_runs_per_row,
        } = self;

        let [first, second] = rows;
        let (above, runs) = if *previous == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        };
        runs.clear();

        let mut cursor = Cursor::Background;
        let mut current = 0usize;
        let mut run_start = 0u32;
        let mut last = 0u32;
        let mut k = 0usize;

        for (x, &pixel) in row.iter().enumerate() {
            let x = x as u32;

            if !is_foreground(pixel) {
                cursor = match cursor {
                    Cursor::OnRun => Cursor::SingleGap,
                    Cursor::SingleGap => {
                        runs.push(Run {
                            x_start: run_start,
                            x_end: last,
                            slot: current,
                        });
                        Cursor::Background
                    }
                    Cursor::Background => Cursor::Background,
                };
                continue;
            }

            let intensity = pixel.to_f64().unwrap_or(0.0);

            // Runs above are at least two columns apart, so at most one of
            // them can reach columns x - 1 ..= x + 1.
            while k < above.len() && above[k].x_end + 1 < x {
                k += 1;
            }
            let linked = above
                .get(k)
                .filter(|run| run.x_start <= x + 1)
                .map(|run| run.slot);

            if cursor == Cursor::Background {
                if runs.len() >= *max_runs_per_row {
                    return Err(ScanStatus::TooManyRunsInRow);
                }

                current = match linked {
                    Some(slot) => {
                        let root = pool.root_of(slot);
                        pool.touch(slot);
                        pool.add_pixel(root, x, y, intensity);
                        root
                    }
                    None => pool.allocate(x, y, intensity)?,
                };
                run_start = x;
            } else {
                if let Some(slot) = linked {
                    let root = pool.root_of(slot);
                    pool.touch(slot);
                    pool.merge_into(current, root);
                }
                pool.add_pixel(current, x, y, intensity);
            }

            cursor = Cursor::OnRun;
            last = x;
        }

        if cursor != Cursor::Background {
            runs.push(Run {
                x_start: run_start,
                x_end: last,
                slot: current,
            });
        }

        Ok(())
    }
}

/// Extract blobs of nonzero pixels with default capacities
///
/// # Examples
///
/// ```
/// use image::{GrayImage, Luma};
/// use speck_core::cv::{ScanStatus, extract_blobs};
///
/// let mut image = GrayImage::new(8, 8);
/// image.put_pixel(6, 6, Luma([1u8]));
///
/// let (blobs, status) = extract_blobs(&image, 1);
/// assert_eq!(status, ScanStatus::Complete);
/// assert_eq!(blobs[0].as_xyxy(), [6, 6, 6, 6]);
/// ```
pub fn extract_blobs<R>(raster: &R, min_size: u32) -> (Vec<Blob>, ScanStatus)
where
    R: Raster,
    R::Pixel: Zero,
{
    BlobExtractor::default().extract(
        raster,
        is_nonzero,
        min_size,
        constant::DEFAULT_MAX_OUTPUT_BLOBS,
    )
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::im::SpeckBuffer;

    /// Build a binary raster from rows of '#' (foreground) and '.' (background)
    fn raster(rows: &[&str]) -> SpeckBuffer<u8, Vec<u8>> {
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let data: Vec<u8> = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| if c == '#' { 1u8 } else { 0u8 }))
            .collect();

        SpeckBuffer::new(width, rows.len() as u32, data).unwrap()
    }

    fn run(rows: &[&str], min_size: u32) -> (Vec<Blob>, ScanStatus) {
        BlobExtractor::new(64, 64)
            .unwrap()
            .extract(&raster(rows), is_nonzero, min_size, 64)
    }

    fn sorted_boxes(blobs: &[Blob]) -> Vec<([u32; 4], u32)> {
        let mut boxes: Vec<([u32; 4], u32)> =
            blobs.iter().map(|b| (b.as_xyxy(), b.count)).collect();
        boxes.sort();
        boxes
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        assert!(BlobExtractor::new(0, 4).is_err());
        assert!(BlobExtractor::new(4, 0).is_err());
        assert!(BlobExtractor::new(1, 1).is_ok());
    }

    #[test]
    fn test_empty_image() {
        let (blobs, status) = run(&["....", "...."], 1);
        assert_eq!(status, ScanStatus::Complete);
        assert!(blobs.is_empty());

        let empty = SpeckBuffer::<u8, Vec<u8>>::new(0, 0, vec![]).unwrap();
        let (blobs, status) = extract_blobs(&empty, 1);
        assert_eq!(status, ScanStatus::Complete);
        assert!(blobs.is_empty());
    }

    #[test]
    fn test_single_rectangle() {
        let (blobs, status) = run(
            &[
                ".......", //
                "..####.", //
                "..####.", //
                "..####.", //
                ".......", //
            ],
            1,
        );

        assert_eq!(status, ScanStatus::Complete);
        assert_eq!(blobs.len(), 1);

        let blob = blobs[0];
        assert_eq!(blob.as_xyxy(), [2, 1, 5, 3]);
        assert_eq!(blob.count, 12);
        assert_eq!(blob.centroid(), (3.5, 2.0));
        assert_eq!((blob.start_x, blob.start_y), (2, 1));
    }

    #[test]
    fn test_full_image_rectangle() {
        let (blobs, _) = run(&["###", "###"], 1);
        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 2, 1], 6)]);
    }

    #[test]
    fn test_separated_rectangles() {
        let (blobs, status) = run(
            &[
                "##...##", //
                "##...##", //
                ".......", //
                ".......", //
                "###....", //
            ],
            1,
        );

        assert_eq!(status, ScanStatus::Complete);
        assert_eq!(
            sorted_boxes(&blobs),
            vec![([0, 0, 1, 1], 4), ([0, 4, 2, 4], 3), ([5, 0, 6, 1], 4)]
        );
    }

    #[test]
    fn test_diagonal_corner_merges() {
        let (blobs, _) = run(
            &[
                "##...", //
                "##...", //
                "..##.", //
                "..##.", //
            ],
            1,
        );
        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 3, 3], 8)]);

        // Anti-diagonal
        let (blobs, _) = run(&["...#", "..#.", ".#..", "#..."], 1);
        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 3, 3], 4)]);
    }

    #[test]
    fn test_single_gap_does_not_split() {
        let (blobs, _) = run(&["##.##"], 1);
        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 4, 0], 4)]);
    }

    #[test]
    fn test_double_gap_splits() {
        let (blobs, _) = run(&["##..##"], 1);
        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 1, 0], 2), ([4, 0, 5, 0], 2)]);
    }

    #[test]
    fn test_trailing_gap_at_row_end() {
        let (blobs, _) = run(&["..#.", "...#"], 1);
        assert_eq!(sorted_boxes(&blobs), vec![([2, 0, 3, 1], 2)]);
    }

    #[test]
    fn test_closed_run_ends_at_last_foreground_pixel() {
        // The run above closes at column 0; column 2 below is not adjacent
        let (blobs, _) = run(&["#....", "..#.."], 1);
        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 0, 0], 1), ([2, 1, 2, 1], 1)]);
    }

    #[test]
    fn test_u_shape_merges_late() {
        let (blobs, status) = run(
            &[
                "#...#", //
                "#...#", //
                "#...#", //
                "#####", //
                ".....", //
            ],
            1,
        );

        assert_eq!(status, ScanStatus::Complete);
        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 4, 3], 11)]);
        assert_eq!((blobs[0].start_x, blobs[0].start_y), (0, 0));
    }

    #[test]
    fn test_comb_merges_many_roots() {
        let (blobs, _) = run(
            &[
                "#..#..#..#", //
                "#..#..#..#", //
                "##########", //
            ],
            1,
        );

        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 9, 2], 18)]);
    }

    #[test]
    fn test_concrete_scenario() {
        let rows = [
            "........", //
            "........", //
            "..###...", //
            "..###...", //
            "..###...", //
            "........", //
            "......#.", //
            "........", //
        ];

        let (blobs, status) = run(&rows, 1);
        assert_eq!(status, ScanStatus::Complete);
        assert_eq!(blobs.len(), 2);
        assert_eq!(blobs[0].as_xyxy(), [2, 2, 4, 4]);
        assert_eq!(blobs[0].count, 9);
        assert_eq!(blobs[1].as_xyxy(), [6, 6, 6, 6]);
        assert_eq!(blobs[1].count, 1);

        let (blobs, status) = run(&rows, 2);
        assert_eq!(status, ScanStatus::Complete);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].as_xyxy(), [2, 2, 4, 4]);
    }

    #[test]
    fn test_blobs_stream_in_completion_order() {
        let (blobs, _) = run(
            &[
                "#.....", //
                "#...#.", //
                "#.....", //
                "#.....", //
            ],
            1,
        );

        // The small blob finishes first even though it starts later
        assert_eq!(blobs[0].as_xyxy(), [4, 1, 4, 1]);
        assert_eq!(blobs[1].as_xyxy(), [0, 0, 0, 3]);
    }

    #[test]
    fn test_too_many_open_blobs_keeps_finished() {
        let image = raster(&[
            "#......", //
            ".......", //
            "#..#..#", //
        ]);

        let mut extractor = BlobExtractor::new(2, 8).unwrap();
        let (blobs, status) = extractor.extract(&image, is_nonzero, 1, 8);

        assert_eq!(status, ScanStatus::TooManyOpenBlobs);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].as_xyxy(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_too_many_runs_in_row() {
        let image = raster(&[
            "##.....", //
            ".......", //
            "#..#..#", //
        ]);

        let mut extractor = BlobExtractor::new(8, 2).unwrap();
        let (blobs, status) = extractor.extract(&image, is_nonzero, 1, 8);

        assert_eq!(status, ScanStatus::TooManyRunsInRow);
        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 1, 0], 2)]);
    }

    #[test]
    fn test_too_many_blobs_emitted() {
        let image = raster(&["#.....", "......", "...#..", "......", "#....#"]);
        let mut extractor = BlobExtractor::default();

        let mut output = [Blob::default(); 1];
        let report = extractor.scan(&image, is_nonzero, 1, &mut output);
        assert_eq!(report.status, ScanStatus::TooManyBlobsEmitted);
        assert_eq!(report.count, 1);
        assert_eq!(output[0].as_xyxy(), [0, 0, 0, 0]);
        assert!(report.into_result().is_err());

        // An exactly sized buffer is not an overflow
        let mut output = [Blob::default(); 4];
        let report = extractor.scan(&image, is_nonzero, 1, &mut output);
        assert_eq!(report.status, ScanStatus::Complete);
        assert_eq!(report.into_result().unwrap(), 4);
    }

    #[test]
    fn test_min_size_does_not_consume_output() {
        let image = raster(&[
            "#.....", //
            "......", //
            "...##.", //
            "...##.", //
        ]);

        let mut extractor = BlobExtractor::default();
        let mut output = [Blob::default(); 1];
        let report = extractor.scan(&image, is_nonzero, 2, &mut output);

        assert_eq!(report.status, ScanStatus::Complete);
        assert_eq!(report.count, 1);
        assert_eq!(output[0].count, 4);
    }

    #[test]
    fn test_custom_predicate_and_intensity() {
        let data: Vec<u16> = vec![
            10, 200, 200, 10, //
            10, 200, 100, 10, //
        ];
        let image = SpeckBuffer::new(4, 2, data).unwrap();

        let mut extractor = BlobExtractor::default();
        let (blobs, _) = extractor.extract(&image, |p| p > 50, 1, 4);

        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].count, 4);
        assert_eq!(blobs[0].sum_intensity, 700.0);
        assert_eq!(blobs[0].mean_intensity(), 175.0);
    }

    #[test]
    fn test_strided_raster() {
        let data: Vec<u8> = vec![
            1, 1, 0, 9, 9, //
            0, 0, 0, 9, 9, //
            0, 1, 0, 9, //
        ];
        let image = SpeckBuffer::with_stride(3, 3, 5, data).unwrap();

        let (blobs, status) = extract_blobs(&image, 1);
        assert_eq!(status, ScanStatus::Complete);
        assert_eq!(sorted_boxes(&blobs), vec![([0, 0, 1, 0], 2), ([1, 2, 1, 2], 1)]);
    }

    #[test]
    fn test_extractor_is_reusable() {
        let first = raster(&["##..", "....", "..##"]);
        let second = raster(&["#", "#", "#"]);

        let mut extractor = BlobExtractor::new(4, 4).unwrap();

        let (a, _) = extractor.extract(&first, is_nonzero, 1, 8);
        let (b, _) = extractor.extract(&second, is_nonzero, 1, 8);
        let (c, _) = extractor.extract(&first, is_nonzero, 1, 8);

        assert_eq!(a.len(), 2);
        assert_eq!(sorted_boxes(&b), vec![([0, 0, 0, 2], 3)]);
        assert_eq!(a, c);
        assert_eq!(extractor.pool().open(), 0);
    }

    #[test]
    fn test_pool_bounded_by_open_blobs_not_image_height() {
        // Many blobs over many rows, but never more than two open at once
        let rows: Vec<&str> = (0..200)
            .map(|i| if i % 3 == 2 { "......" } else { "#..#.." })
            .collect();

        let mut extractor = BlobExtractor::new(4, 4).unwrap();
        let (blobs, status) = extractor.extract(&raster(&rows), is_nonzero, 1, 1000);

        assert_eq!(status, ScanStatus::Complete);
        assert_eq!(blobs.len(), 134);
        assert!(blobs.iter().all(|b| b.count == 2));
    }

    /// Flood-fill labeling with 8-connectivity plus bridging of single
    /// background pixels between two foreground pixels in the same row.
    fn reference(width: usize, height: usize, data: &[u8]) -> Vec<Blob> {
        let fg = |x: usize, y: usize| data[y * width + x] != 0;
        let mut seen = vec![false; data.len()];
        let mut blobs = vec![];

        for y0 in 0..height {
            for x0 in 0..width {
                if !fg(x0, y0) || seen[y0 * width + x0] {
                    continue;
                }

                let mut blob = Blob {
                    xmin: u32::MAX,
                    ymin: u32::MAX,
                    start_x: x0 as u32,
                    start_y: y0 as u32,
                    ..Blob::default()
                };

                let mut stack = vec![(x0, y0)];
                seen[y0 * width + x0] = true;

                while let Some((x, y)) = stack.pop() {
                    blob.push(x as u32, y as u32, 1.0);

                    let mut neighbours = vec![];
                    for dy in -1i64..=1 {
                        for dx in -1i64..=1 {
                            neighbours.push((x as i64 + dx, y as i64 + dy));
                        }
                    }
                    if x >= 2 && !fg(x - 1, y) {
                        neighbours.push((x as i64 - 2, y as i64));
                    }
                    if x + 2 < width && !fg(x + 1, y) {
                        neighbours.push((x as i64 + 2, y as i64));
                    }

                    for (nx, ny) in neighbours {
                        if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                            continue;
                        }
                        let (nx, ny) = (nx as usize, ny as usize);
                        if fg(nx, ny) && !seen[ny * width + nx] {
                            seen[ny * width + nx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }

                blobs.push(blob);
            }
        }

        blobs
    }

    fn signature(blobs: &[Blob]) -> Vec<(u32, u32, u32, u64, u64, [u32; 4])> {
        let mut s: Vec<_> = blobs
            .iter()
            .map(|b| (b.start_y, b.start_x, b.count, b.sum_x, b.sum_y, b.as_xyxy()))
            .collect();
        s.sort();
        s
    }

    #[test]
    fn test_matches_reference_on_random_images() {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        let mut extractor = BlobExtractor::new(1024, 64).unwrap();

        for trial in 0..200 {
            let width = 1 + (next() % 40) as usize;
            let height = 1 + (next() % 30) as usize;
            let density = [20, 35, 50, 65][trial % 4];

            let data: Vec<u8> = (0..width * height)
                .map(|_| ((next() % 100) < density) as u8)
                .collect();

            let image = SpeckBuffer::new(width as u32, height as u32, data.clone()).unwrap();
            let (blobs, status) = extractor.extract(&image, is_nonzero, 1, 4096);

            assert_eq!(status, ScanStatus::Complete, "trial {}", trial);
            assert_eq!(
                signature(&blobs),
                signature(&reference(width, height, &data)),
                "trial {} ({}x{})",
                trial,
                width,
                height
            );
        }
    }
}
