//! Prediction Grid
//!
//! Renders a grid of sample images from one held batch, each cell titled
//! with the class name the model predicted for it. Thumbnails are embedded
//! into the SVG as base64 PNG data URIs.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbImage};

use crate::dataset::folder::ImageItem;
use crate::inference::Prediction;
use crate::report::charts::escape_xml;
use crate::utils::error::{ClassifierError, Result};
use crate::IMAGE_SIZE;

/// Grid layout constants
const GRID_ROWS: usize = 6;
const GRID_COLS: usize = 5;
const CELL_SIZE: f64 = 150.0;
const CELL_PADDING: f64 = 12.0;
const TITLE_HEIGHT: f64 = 22.0;
const HEADER_HEIGHT: f64 = 48.0;

const COLOR_TEXT: &str = "#2c3e50";

/// Render up to 30 images annotated with their predicted class names
pub fn render_prediction_grid(
    items: &[ImageItem],
    predictions: &[Prediction],
    output_path: &Path,
) -> Result<()> {
    let count = items
        .len()
        .min(predictions.len())
        .min(GRID_ROWS * GRID_COLS);

    let width = GRID_COLS as f64 * (CELL_SIZE + CELL_PADDING) + CELL_PADDING;
    let height = HEADER_HEIGHT + GRID_ROWS as f64 * (CELL_SIZE + TITLE_HEIGHT + CELL_PADDING);

    let mut svg = String::new();

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
        width, height, width, height
    ));

    svg.push_str(&format!(
        r#"<rect width="{}" height="{}" fill="white"/>"#,
        width, height
    ));

    svg.push_str(&format!(
        r#"<text x="{}" y="32" text-anchor="middle" font-family="Arial, sans-serif" font-size="20" font-weight="bold" fill="{}">Model predictions</text>"#,
        width / 2.0,
        COLOR_TEXT
    ));

    for n in 0..count {
        let row = n / GRID_COLS;
        let col = n % GRID_COLS;

        let x = CELL_PADDING + col as f64 * (CELL_SIZE + CELL_PADDING);
        let y = HEADER_HEIGHT + row as f64 * (CELL_SIZE + TITLE_HEIGHT + CELL_PADDING);

        svg.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="Arial, sans-serif" font-size="13" fill="{}">{}</text>"#,
            x + CELL_SIZE / 2.0,
            y + TITLE_HEIGHT - 7.0,
            COLOR_TEXT,
            escape_xml(&title_case(&predictions[n].class_name))
        ));

        let thumbnail = encode_thumbnail(&items[n])?;
        svg.push_str(&format!(
            r#"<image x="{}" y="{}" width="{}" height="{}" href="data:image/png;base64,{}"/>"#,
            x,
            y + TITLE_HEIGHT,
            CELL_SIZE,
            CELL_SIZE,
            thumbnail
        ));
    }

    svg.push_str("</svg>");

    fs::write(output_path, svg)?;
    Ok(())
}

/// Encode an item's CHW [0, 1] pixel buffer back into a PNG
fn encode_thumbnail(item: &ImageItem) -> Result<String> {
    let plane = IMAGE_SIZE * IMAGE_SIZE;
    if item.pixels.len() != 3 * plane {
        return Err(ClassifierError::Render(format!(
            "unexpected pixel buffer length {} for '{}'",
            item.pixels.len(),
            item.path
        )));
    }

    let side = IMAGE_SIZE as u32;
    let rgb = RgbImage::from_fn(side, side, |x, y| {
        let offset = y as usize * IMAGE_SIZE + x as usize;
        let channel = |c: usize| {
            (item.pixels[c * plane + offset] * 255.0)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        image::Rgb([channel(0), channel(1), channel(2)])
    });

    let mut bytes: Vec<u8> = Vec::new();
    image::DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ClassifierError::Render(format!("failed to encode thumbnail: {e}")))?;

    Ok(STANDARD.encode(bytes))
}

/// Upper-case the first letter of each word for cell titles
fn title_case(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: usize) -> ImageItem {
        ImageItem::from_data(
            vec![0.5f32; 3 * IMAGE_SIZE * IMAGE_SIZE],
            label,
            format!("img{label}.jpg"),
        )
    }

    fn prediction(name: &str) -> Prediction {
        Prediction {
            class_index: 0,
            class_name: name.to_string(),
        }
    }

    #[test]
    fn test_grid_generation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.svg");

        let items: Vec<ImageItem> = (0..3).map(item).collect();
        let predictions = vec![prediction("cat"), prediction("dog"), prediction("cat")];

        render_prediction_grid(&items, &predictions, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());
        assert!(content.contains("Model predictions"));
        assert!(content.contains("data:image/png;base64,"));
        assert_eq!(content.matches("<image").count(), 3);
    }

    #[test]
    fn test_grid_caps_at_thirty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.svg");

        let items: Vec<ImageItem> = (0..32).map(item).collect();
        let predictions: Vec<Prediction> = (0..32).map(|_| prediction("cat")).collect();

        render_prediction_grid(&items, &predictions, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("<image").count(), 30);
    }

    #[test]
    fn test_bad_pixel_buffer_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.svg");

        let bad = ImageItem::from_data(vec![0.5f32; 10], 0, "bad.jpg".to_string());
        let result = render_prediction_grid(&[bad], &[prediction("cat")], &path);
        assert!(result.is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("cat"), "Cat");
        assert_eq!(title_case("maine_coon"), "Maine Coon");
        assert_eq!(title_case("late blight"), "Late Blight");
    }
}
