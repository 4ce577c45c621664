//! Pixel normalization
//!
//! Decoded images carry integer intensities in [0, 255]; the model consumes
//! floats in [0.0, 1.0]. The rescale is applied once per item, as items are
//! pulled through the dataset.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::IMAGE_SIZE;

/// Rescale a single pixel intensity from [0, 255] to [0.0, 1.0]
#[inline]
pub fn rescale(value: u8) -> f32 {
    f32::from(value) / 255.0
}

/// Resize a decoded image to the model resolution and convert it to a flat
/// CHW float buffer with values in [0.0, 1.0]
pub fn to_chw_floats(image: &DynamicImage) -> Vec<f32> {
    let rgb = image
        .resize_exact(IMAGE_SIZE as u32, IMAGE_SIZE as u32, FilterType::Triangle)
        .to_rgb8();

    let (width, height) = (IMAGE_SIZE, IMAGE_SIZE);
    let mut pixels = vec![0.0f32; 3 * height * width];

    for y in 0..height {
        for x in 0..width {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            pixels[y * width + x] = rescale(pixel[0]);
            pixels[height * width + y * width + x] = rescale(pixel[1]);
            pixels[2 * height * width + y * width + x] = rescale(pixel[2]);
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_endpoints() {
        assert_eq!(rescale(0), 0.0);
        assert_eq!(rescale(255), 1.0);
    }

    #[test]
    fn test_rescale_bounded() {
        for value in 0..=255u8 {
            let out = rescale(value);
            assert!((0.0..=1.0).contains(&out));
        }
    }

    #[test]
    fn test_to_chw_floats_shape_and_range() {
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            10,
            6,
            image::Rgb([255, 0, 128]),
        ));

        let pixels = to_chw_floats(&image);
        assert_eq!(pixels.len(), 3 * IMAGE_SIZE * IMAGE_SIZE);
        assert!(pixels.iter().all(|p| (0.0..=1.0).contains(p)));

        let plane = IMAGE_SIZE * IMAGE_SIZE;
        assert_eq!(pixels[0], 1.0);
        assert_eq!(pixels[plane], 0.0);
        assert!((pixels[2 * plane] - 128.0 / 255.0).abs() < 1e-6);
    }
}
