/// LAS/LAZ-backed dataset source: classification codes become class codes.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use constants::class::{SENTINEL_CLASS_CODE, class_display_name};
use constants::render_settings::STREAM_CHUNK_SIZE;
use indicatif::{ProgressBar, ProgressStyle};
use las::Reader;
use point_cloud_sampling::{
    CancelToken, KnownClass, PointChunk, PointDataset, Position, SamplingError,
};
use rayon::prelude::*;

/// Create LAS file reader for point cloud access.
/// Handles both .las and .laz compressed formats.
fn create_reader(file_path: &Path) -> Result<Reader, Box<dyn std::error::Error>> {
    let file = File::open(file_path)?;
    let buf_reader = BufReader::new(file);
    Ok(Reader::new(buf_reader)?)
}

/// One LAS/LAZ file exposed through the dataset contract. Raw classification
/// codes are remapped to dense codes in class order; code 255 stays the
/// sentinel for unassigned points.
pub struct LasDataset {
    path: PathBuf,
    total_count: u64,
    known: Vec<KnownClass>,
    dense_codes: [u8; 256],
}

impl LasDataset {
    /// Opens the file and runs the counting pre-pass that supplies the
    /// authoritative per-class totals.
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut reader = create_reader(path)?;
        let total_count = reader.header().number_of_points();

        let pb = ProgressBar::new(total_count);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} points ({percent}%) {msg}")
                .unwrap()
                .progress_chars("▉▊▋▌▍▎▏ "),
        );
        pb.set_message("Counting classes");

        let mut codes = Vec::with_capacity(total_count as usize);
        for (index, point) in reader.points().enumerate() {
            codes.push(u8::from(point?.classification));
            if index % 50_000 == 0 {
                pb.set_position(index as u64);
            }
        }
        pb.finish_with_message("Classes counted");

        // Histogram the code buffer in parallel chunks.
        let histogram = codes
            .par_chunks(25_000)
            .map(|chunk| {
                let mut local = [0u64; 256];
                for code in chunk {
                    local[*code as usize] += 1;
                }
                local
            })
            .reduce(
                || [0u64; 256],
                |mut merged, local| {
                    for (total, count) in merged.iter_mut().zip(local.iter()) {
                        *total += count;
                    }
                    merged
                },
            );

        let mut known = Vec::new();
        let mut dense_codes = [SENTINEL_CLASS_CODE; 256];
        for (code, count) in histogram.iter().enumerate() {
            if *count == 0 || code == SENTINEL_CLASS_CODE as usize {
                continue;
            }
            dense_codes[code] = known.len() as u8;
            known.push(KnownClass {
                name: class_display_name(code as u8),
                count: *count,
            });
        }

        tracing::info!(
            path = %path.display(),
            points = total_count,
            classes = known.len(),
            "dataset opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            total_count,
            known,
            dense_codes,
        })
    }
}

impl PointDataset for LasDataset {
    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn known_classes(&self) -> Vec<KnownClass> {
        self.known.clone()
    }

    fn ensure_available(&mut self, cancel: &CancelToken) -> Result<bool, SamplingError> {
        if cancel.is_cancelled() {
            return Ok(false);
        }
        match create_reader(&self.path) {
            Ok(_) => Ok(true),
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "dataset not readable");
                Ok(false)
            }
        }
    }

    fn chunks(&mut self) -> Box<dyn Iterator<Item = Result<PointChunk, SamplingError>> + '_> {
        let reader = match create_reader(&self.path) {
            Ok(reader) => reader,
            Err(error) => {
                let message = error.to_string();
                return Box::new(std::iter::once(Err(SamplingError::DatasetRead(message))));
            }
        };

        let pb = ProgressBar::new(self.total_count);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.green/blue}] {pos}/{len} points ({percent}%) {msg}")
                .unwrap()
                .progress_chars("▉▊▋▌▍▎▏ "),
        );
        pb.set_message("Partitioning points");

        Box::new(LasChunks {
            reader,
            remaining: self.total_count,
            dense_codes: self.dense_codes,
            progress: pb,
        })
    }
}

struct LasChunks {
    reader: Reader,
    remaining: u64,
    dense_codes: [u8; 256],
    progress: ProgressBar,
}

impl Iterator for LasChunks {
    type Item = Result<PointChunk, SamplingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            self.progress.finish_with_message("Points partitioned");
            return None;
        }
        let take = STREAM_CHUNK_SIZE.min(self.remaining as usize);
        let mut positions = Vec::with_capacity(take);
        let mut class_codes = Vec::with_capacity(take);
        for point in self.reader.points().take(take) {
            match point {
                Ok(point) => {
                    positions.push(Position::new(point.x as f32, point.y as f32, point.z as f32));
                    let raw = u8::from(point.classification);
                    class_codes.push(self.dense_codes[raw as usize]);
                }
                Err(error) => {
                    return Some(Err(SamplingError::DatasetRead(error.to_string())));
                }
            }
        }
        if positions.is_empty() {
            // Header promised more points than the file holds; end cleanly.
            self.remaining = 0;
            self.progress.finish_with_message("Points partitioned");
            return None;
        }
        self.remaining -= positions.len() as u64;
        self.progress.inc(positions.len() as u64);
        Some(Ok(PointChunk {
            positions,
            class_codes,
        }))
    }
}
