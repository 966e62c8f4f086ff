use std::ops::Range;

use crate::image_buf::{CHANNELS, ImageBuffer};
use crate::kernel::{Kernel, truncate_u8};

const SMOOTH: [i32; 3] = [1, 2, 1];

/// Per-channel Sobel gradient magnitude with zero padding.
///
/// `sx` differentiates along the vertical axis and smooths horizontally;
/// `sy` is its transpose. Gradients are exact integers, the magnitude is
/// clamped to 255 and truncated.
pub struct Sobel;

impl Kernel for Sobel {
    fn name(&self) -> &str {
        "sobel"
    }

    fn halo_rows(&self) -> u32 {
        1
    }

    fn apply_rows(&self, input: &ImageBuffer, rows: Range<u32>) -> ImageBuffer {
        let width = input.width as i64;
        let height = input.height as i64;
        let sample = |x: i64, y: i64, c: usize| -> i32 {
            if x < 0 || y < 0 || x >= width || y >= height {
                return 0;
            }
            input.data[(y as usize * width as usize + x as usize) * CHANNELS + c] as i32
        };

        let mut data = Vec::with_capacity((rows.end - rows.start) as usize * input.row_len());
        for y in rows.clone() {
            let y = y as i64;
            for x in 0..width {
                for c in 0..CHANNELS {
                    let mut sx = 0i32;
                    let mut sy = 0i32;
                    for (k, &s) in SMOOTH.iter().enumerate() {
                        let d = k as i64 - 1;
                        sx += s * (sample(x + d, y + 1, c) - sample(x + d, y - 1, c));
                        sy += s * (sample(x + 1, y + d, c) - sample(x - 1, y + d, c));
                    }
                    let magnitude = ((sx * sx + sy * sy) as f32).sqrt();
                    data.push(truncate_u8(magnitude));
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

    fn gray(width: u32, height: u32, values: &[u8]) -> ImageBuffer {
        let data = values.iter().flat_map(|&v| [v, v, v]).collect();
        ImageBuffer::from_data(width, height, data).unwrap()
    }

    #[test]
    fn flat_interior_has_no_edges() {
        let buf = gray(5, 5, &[50; 25]);
        let out = apply(&buf, FilterKind::EdgeDetection);
        assert_eq!(out.row(2)[2 * 3], 0);
    }

    #[test]
    fn image_border_is_an_edge_under_zero_padding() {
        let buf = gray(5, 5, &[50; 25]);
        let out = apply(&buf, FilterKind::EdgeDetection);
        // Top-left: sx = sy = 2*50 + 50 = 150, magnitude 212.
        assert_eq!(out.row(0)[0], 212);
        // Top edge, middle: sx = 4*50 = 200, sy = 0.
        assert_eq!(out.row(0)[2 * 3], 200);
    }

    #[test]
    fn vertical_step_responds() {
        #[rustfmt::skip]
        let buf = gray(4, 3, &[
            0, 0, 10, 10,
            0, 0, 10, 10,
            0, 0, 10, 10,
        ]);
        let out = apply(&buf, FilterKind::EdgeDetection);
        // Middle row, x=1: sy = 4 * 10 = 40, sx = 0.
        assert_eq!(out.row(1)[3], 40);
    }

    #[test]
    fn strong_edges_saturate() {
        #[rustfmt::skip]
        let buf = gray(3, 3, &[
            0, 0, 0,
            0, 255, 0,
            0, 0, 0,
        ]);
        let out = apply(&buf, FilterKind::EdgeDetection);
        // Directly above the impulse: sx = 2*255 = 510 -> clamped.
        assert_eq!(out.row(0)[3], 255);
        // The impulse itself is a local extremum: no gradient.
        assert_eq!(out.row(1)[3], 0);
    }

    #[test]
    fn channels_are_independent() {
        let mut buf = ImageBuffer::new(3, 3);
        buf.data[(3 + 1) * 3 + 2] = 100;
        let out = apply(&buf, FilterKind::EdgeDetection);
        for pixel in out.data.chunks_exact(3) {
            assert_eq!(pixel[0], 0);
            assert_eq!(pixel[1], 0);
        }
        assert!(out.data.iter().skip(2).step_by(3).any(|&b| b > 0));
    }

    #[test]
    fn one_halo_row_is_enough() {
        let data: Vec<u8> = (0..6 * 9 * 3).map(|v| (v * 29 % 256) as u8).collect();
        let buf = ImageBuffer::from_data(6, 9, data).unwrap();
        let whole = apply(&buf, FilterKind::EdgeDetection);

        let padded = buf.copy_rows(2..7);
        let part = Sobel.apply_rows(&padded, 1..4);
        assert_eq!(part.data, whole.copy_rows(3..6).data);
    }
}
