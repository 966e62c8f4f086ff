use std::ops::Range;
use std::sync::LazyLock;

use crate::image_buf::{CHANNELS, ImageBuffer};
use crate::kernel::{Kernel, truncate_u8};

pub const SIGMA: f32 = 2.0;
/// Taps on each side of the center: round(4 * sigma).
pub const RADIUS: usize = 8;
const TAPS: usize = 2 * RADIUS + 1;

static WEIGHTS: LazyLock<[f32; TAPS]> = LazyLock::new(|| {
    let mut weights = [0.0f32; TAPS];
    let denom = 2.0 * SIGMA * SIGMA;
    for (i, w) in weights.iter_mut().enumerate() {
        let d = i as f32 - RADIUS as f32;
        *w = (-(d * d) / denom).exp();
    }
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
});

/// Separable Gaussian blur, sigma = 2, zero padding outside the image.
///
/// Vertical pass into an f32 scratch buffer, then horizontal pass, then
/// truncation. Each output sample sums its taps in a fixed order, so a
/// chunk with a complete halo reproduces the whole-image result bit for bit.
pub struct GaussianBlur;

impl Kernel for GaussianBlur {
    fn name(&self) -> &str {
        "gaussian_blur"
    }

    fn halo_rows(&self) -> u32 {
        RADIUS as u32
    }

    fn apply_rows(&self, input: &ImageBuffer, rows: Range<u32>) -> ImageBuffer {
        let weights = &*WEIGHTS;
        let width = input.width as usize;
        let height = input.height as i64;
        let row_len = input.row_len();
        let out_rows = (rows.end - rows.start) as usize;

        let mut vertical = vec![0.0f32; out_rows * row_len];
        for (out_y, y) in rows.clone().enumerate() {
            let acc = &mut vertical[out_y * row_len..(out_y + 1) * row_len];
            for (tap, &w) in weights.iter().enumerate() {
                let sy = y as i64 + tap as i64 - RADIUS as i64;
                if sy < 0 || sy >= height {
                    continue;
                }
                let src = input.row(sy as u32);
                for (a, &s) in acc.iter_mut().zip(src) {
                    *a += w * s as f32;
                }
            }
        }

        let mut data = Vec::with_capacity(out_rows * row_len);
        for scratch in vertical.chunks_exact(row_len) {
            for x in 0..width {
                for c in 0..CHANNELS {
                    let mut sum = 0.0f32;
                    for (tap, &w) in weights.iter().enumerate() {
                        let sx = x as i64 + tap as i64 - RADIUS as i64;
                        if sx < 0 || sx >= width as i64 {
                            continue;
                        }
                        sum += w * scratch[sx as usize * CHANNELS + c];
                    }
                    data.push(truncate_u8(sum));
                }
            }
        }

        ImageBuffer {
            width: input.width,
            height: rows.end - rows.start,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{FilterKind, apply};

    #[test]
    fn weights_are_normalized_and_symmetric() {
        let sum: f32 = WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        for i in 0..RADIUS {
            assert_eq!(WEIGHTS[i], WEIGHTS[TAPS - 1 - i]);
        }
        assert!(WEIGHTS[RADIUS] > WEIGHTS[RADIUS + 1]);
    }

    #[test]
    fn black_stays_black() {
        let buf = ImageBuffer::new(12, 12);
        assert_eq!(apply(&buf, FilterKind::Blur), buf);
    }

    #[test]
    fn interior_of_flat_image_is_nearly_unchanged() {
        let buf = ImageBuffer::from_data(40, 40, vec![100; 40 * 40 * 3]).unwrap();
        let out = apply(&buf, FilterKind::Blur);
        // Truncation can only lose a fraction of a level.
        let center = out.row(20)[20 * 3];
        assert!((99..=100).contains(&center), "center = {center}");
    }

    #[test]
    fn edges_darken_with_zero_padding() {
        let buf = ImageBuffer::from_data(40, 40, vec![100; 40 * 40 * 3]).unwrap();
        let out = apply(&buf, FilterKind::Blur);
        let corner = out.row(0)[0];
        let center = out.row(20)[20 * 3];
        assert!(corner < center, "corner {corner} should be darker than {center}");
        // Roughly a quarter of the kernel mass falls inside at a corner.
        assert!((25..=40).contains(&corner), "corner = {corner}");
    }

    #[test]
    fn impulse_spreads_symmetrically() {
        let mut buf = ImageBuffer::new(21, 21);
        let idx = (10 * 21 + 10) * 3;
        buf.data[idx] = 255;
        let out = apply(&buf, FilterKind::Blur);

        let at = |x: usize, y: usize| out.data[(y * 21 + x) * 3];
        assert!(at(10, 10) > at(11, 10));
        assert_eq!(at(9, 10), at(11, 10));
        assert_eq!(at(10, 9), at(10, 11));
        // Channels blur independently.
        assert!(out.data.iter().skip(1).step_by(3).all(|&g| g == 0));
    }

    #[test]
    fn halo_rows_reproduce_whole_image() {
        let data: Vec<u8> = (0..10 * 30 * 3).map(|v| (v * 13 % 251) as u8).collect();
        let buf = ImageBuffer::from_data(10, 30, data).unwrap();
        let whole = apply(&buf, FilterKind::Blur);

        // rows 12..18 with 8 rows of context on each side: local rows 8..14
        let padded = buf.copy_rows(4..26);
        let part = GaussianBlur.apply_rows(&padded, 8..14);
        assert_eq!(part.data, whole.copy_rows(12..18).data);
    }
}
