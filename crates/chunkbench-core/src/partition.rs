use std::ops::Range;

use crate::image_buf::ImageBuffer;

/// Number of chunks a `height`-row image is split into.
///
/// `requested` is clamped to `[1, height / min_rows_per_chunk]` (at least 1),
/// so no chunk is ever shorter than `min_rows_per_chunk` rows, except when the
/// whole image is.
pub fn effective_workers(height: u32, requested: usize, min_rows_per_chunk: u32) -> usize {
    let max_chunks = (height / min_rows_per_chunk.max(1)).max(1) as usize;
    requested.clamp(1, max_chunks)
}

/// Split `height` rows into contiguous, non-overlapping row ranges.
///
/// Every chunk gets `height / n` rows except the last, which absorbs the
/// remainder. An empty image has no chunks.
pub fn partition(height: u32, requested_workers: usize) -> Vec<Range<u32>> {
    partition_with(height, requested_workers, 1)
}

pub fn partition_with(
    height: u32,
    requested_workers: usize,
    min_rows_per_chunk: u32,
) -> Vec<Range<u32>> {
    if height == 0 {
        return Vec::new();
    }
    let n = effective_workers(height, requested_workers, min_rows_per_chunk) as u32;
    let base = height / n;
    (0..n)
        .map(|i| {
            let start = i * base;
            let end = if i == n - 1 { height } else { start + base };
            start..end
        })
        .collect()
}

/// One unit of parallel work: a private copy of a row range plus the halo
/// rows the kernel needs to filter it as if it were still part of the image.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub index: usize,
    /// Rows of the source image this chunk produces.
    pub rows: Range<u32>,
    /// Context rows above `rows` included at the top of `data`.
    pub halo_top: u32,
    pub data: ImageBuffer,
}

impl Chunk {
    pub fn extract(source: &ImageBuffer, index: usize, rows: Range<u32>, halo: u32) -> Self {
        let top = rows.start.saturating_sub(halo);
        let bottom = rows.end.saturating_add(halo).min(source.height);
        Self {
            index,
            halo_top: rows.start - top,
            data: source.copy_rows(top..bottom),
            rows,
        }
    }

    /// `rows`, in the coordinates of `data`.
    pub fn local_rows(&self) -> Range<u32> {
        let len = self.rows.end - self.rows.start;
        self.halo_top..self.halo_top + len
    }
}
