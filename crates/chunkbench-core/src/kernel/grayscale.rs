use std::ops::Range;

use crate::image_buf::{CHANNELS, ImageBuffer};
use crate::kernel::Kernel;

const LUMA_R: f32 = 0.2989;
const LUMA_G: f32 = 0.5870;
const LUMA_B: f32 = 0.1140;

/// Luminance replicated into all three channels.
///
/// Strictly pointwise, so it needs no halo. Rounds to nearest: the weights
/// sum to 0.9999, so truncation would darken an already-gray image by one
/// level per application.
pub struct Grayscale;

impl Kernel for Grayscale {
    fn name(&self) -> &str {
        "grayscale"
    }

    fn halo_rows(&self) -> u32 {
        0
    }

    fn apply_rows(&self, input: &ImageBuffer, rows: Range<u32>) -> ImageBuffer {
        let row_len = input.row_len();
        let src = &input.data[rows.start as usize * row_len..rows.end as usize * row_len];

        let mut data = Vec::with_capacity(src.len());
        for pixel in src.chunks_exact(CHANNELS) {
            let y = luminance(pixel[0], pixel[1], pixel[2]);
            data.extend_from_slice(&[y, y, y]);
        }

        ImageBuffer {
            width: input.width,
            height: rows.end - rows.start,
            data,
        }
    }
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{FilterKind, apply};

    #[test]
    fn weighted_luminance() {
        let buf = ImageBuffer::from_data(1, 1, vec![200, 100, 50]).unwrap();
        let out = apply(&buf, FilterKind::Grayscale);
        // 0.2989*200 + 0.5870*100 + 0.1140*50 = 124.18
        assert_eq!(out.data, vec![124, 124, 124]);
    }

    #[test]
    fn pure_channels() {
        let buf =
            ImageBuffer::from_data(3, 1, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]).unwrap();
        let out = apply(&buf, FilterKind::Grayscale);
        assert_eq!(out.data, vec![76, 76, 76, 150, 150, 150, 29, 29, 29]);
    }

    #[test]
    fn black_and_white_are_fixed_points() {
        let buf = ImageBuffer::from_data(2, 1, vec![0, 0, 0, 255, 255, 255]).unwrap();
        let out = apply(&buf, FilterKind::Grayscale);
        assert_eq!(out.data, buf.data);
    }

    #[test]
    fn idempotent() {
        let data: Vec<u8> = (0..16 * 16 * 3).map(|v| (v * 37 % 256) as u8).collect();
        let buf = ImageBuffer::from_data(16, 16, data).unwrap();
        let once = apply(&buf, FilterKind::Grayscale);
        let twice = apply(&once, FilterKind::Grayscale);
        assert_eq!(once, twice);
    }

    #[test]
    fn every_gray_level_is_stable() {
        let data: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v]).collect();
        let buf = ImageBuffer::from_data(256, 1, data).unwrap();
        assert_eq!(apply(&buf, FilterKind::Grayscale), buf);
    }

    #[test]
    fn sub_range_only_emits_requested_rows() {
        let buf = ImageBuffer::from_data(1, 3, vec![10, 10, 10, 20, 20, 20, 30, 30, 30])
            .unwrap();
        let out = Grayscale.apply_rows(&buf, 1..2);
        assert_eq!(out.height, 1);
        assert_eq!(out.data, vec![20, 20, 20]);
    }
}
