use anyhow::{anyhow, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};

use crate::config::ExtractorConfig;

/// Runs the full preprocessing chain on a downloaded chart:
/// right-strip crop → grayscale → upscale → median filter → binarize.
pub fn preprocess_chart(img: &DynamicImage, config: &ExtractorConfig) -> Result<GrayImage> {
    let strip = crop_right_strip(img, config.crop_width);
    let gray = to_grayscale(&strip);
    let upscaled = upscale(&gray, config.upscale_factor)?;
    let smoothed = median_filter(&upscaled, config.median_radius);
    Ok(binarize(&smoothed, config.binarize_threshold))
}

/// Crops the rightmost `strip_width` pixels at full height, where the chart
/// legend prints its price labels.
///
/// Images narrower than the strip are returned whole.
pub fn crop_right_strip(img: &DynamicImage, strip_width: u32) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    let left = w.saturating_sub(strip_width);
    img.crop_imm(left, 0, w - left, h)
}

/// Converts to 8-bit luminance with ITU-R 601-2 weights
/// (L = 0.299 R + 0.587 G + 0.114 B, rounded). Alpha is ignored.
///
/// `DynamicImage::to_luma8` uses Rec. 709 weights, which shifts saturated
/// colours across the binarize threshold.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000;
        Luma([luma as u8])
    })
}

/// Enlarges the image by an integer factor with Lanczos resampling.
pub fn upscale(img: &GrayImage, factor: u32) -> Result<GrayImage> {
    let factor = factor.max(1);
    if factor == 1 {
        return Ok(img.clone());
    }
    let (w, h) = img.dimensions();
    let (new_w, new_h) = w
        .checked_mul(factor)
        .zip(h.checked_mul(factor))
        .ok_or_else(|| anyhow!("Upscale factor {} too large for {}x{} image", factor, w, h))?;
    Ok(imageops::resize(img, new_w, new_h, FilterType::Lanczos3))
}

/// Replaces each pixel with the median of its (2r+1)x(2r+1) neighbourhood.
///
/// Out-of-range window positions repeat the nearest edge pixel, so every
/// window holds the full (2r+1)^2 samples.
pub fn median_filter(img: &GrayImage, radius: u32) -> GrayImage {
    if radius == 0 {
        return img.clone();
    }

    let (width, height) = img.dimensions();
    let (max_x, max_y) = (width as i64 - 1, height as i64 - 1);
    let r = radius as i64;
    let mut output = GrayImage::new(width, height);
    let mut window: Vec<u8> = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            window.clear();
            for ny in (y - r)..=(y + r) {
                for nx in (x - r)..=(x + r) {
                    let (px, py) = (nx.clamp(0, max_x), ny.clamp(0, max_y));
                    window.push(img.get_pixel(px as u32, py as u32)[0]);
                }
            }
            window.sort_unstable();
            let median = window[window.len() / 2];
            output.put_pixel(x as u32, y as u32, Luma([median]));
        }
    }

    output
}

/// Converts a grayscale image to pure black and white.
///
/// Pixels darker than `threshold` become black (text), everything else white.
pub fn binarize(img: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let value = if pixel[0] < threshold { 0u8 } else { 255u8 };
        output.put_pixel(x, y, Luma([value]));
    }

    output
}
