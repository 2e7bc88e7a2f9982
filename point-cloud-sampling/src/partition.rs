/// Single-pass redistribution of the flat position stream into per-class
/// buffers.
use std::collections::HashMap;

use crate::dataset::{CancelToken, PointChunk, Position};
use crate::error::SamplingError;
use crate::manifest::ClassManifest;

/// Routes every streamed position into its class's buffer, the catch-all
/// receiving sentinel and out-of-range codes.
///
/// Buffers are allocated up front from the manifest's authoritative counts,
/// so a matching stream fills them exactly with no regrowth. Cancellation is
/// checked between chunks; an aborted pass yields no partial result.
pub fn partition_by_class<I>(
    manifest: &ClassManifest,
    chunks: I,
    cancel: &CancelToken,
) -> Result<HashMap<String, Vec<Position>>, SamplingError>
where
    I: IntoIterator<Item = Result<PointChunk, SamplingError>>,
{
    let entries = manifest.entries();
    let known = entries.len() - 1;

    let mut buffers: Vec<Vec<Position>> = entries
        .iter()
        .map(|entry| Vec::with_capacity(entry.count as usize))
        .collect();

    for chunk in chunks {
        if cancel.is_cancelled() {
            return Err(SamplingError::Cancelled);
        }
        let chunk = chunk?;
        if chunk.positions.len() != chunk.class_codes.len() {
            return Err(SamplingError::DatasetRead(format!(
                "chunk section mismatch: {} positions, {} class codes",
                chunk.positions.len(),
                chunk.class_codes.len()
            )));
        }
        for (position, code) in chunk.positions.iter().zip(chunk.class_codes.iter()) {
            let index = if (*code as usize) < known {
                *code as usize
            } else {
                known
            };
            buffers[index].push(*position);
        }
    }

    Ok(entries
        .iter()
        .zip(buffers)
        .map(|(entry, buffer)| (entry.name.clone(), buffer))
        .collect())
}
