//! SVG Chart Generator
//!
//! Generates clean SVG line charts for the per-batch training series. The
//! y-axis range is fixed by the caller so runs stay visually comparable.

use std::fs;
use std::path::Path;

/// Chart styling constants
const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 500.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 80.0;
const MARGIN_LEFT: f64 = 80.0;

const COLOR_LOSS: &str = "#e74c3c";
const COLOR_ACCURACY: &str = "#3498db";
const COLOR_GRID: &str = "#ecf0f1";
const COLOR_AXIS: &str = "#2c3e50";
const COLOR_TEXT: &str = "#2c3e50";

/// Render the loss series with a fixed y-axis of [0, 2]
pub fn render_loss_chart(losses: &[f64], output_path: &Path) -> std::io::Result<()> {
    generate_step_chart(
        "Training Loss",
        "Training Steps",
        "Loss",
        losses,
        (0.0, 2.0),
        COLOR_LOSS,
        output_path,
    )
}

/// Render the accuracy series with a fixed y-axis of [0, 1]
pub fn render_accuracy_chart(accuracies: &[f64], output_path: &Path) -> std::io::Result<()> {
    generate_step_chart(
        "Training Accuracy",
        "Training Steps",
        "Accuracy",
        accuracies,
        (0.0, 1.0),
        COLOR_ACCURACY,
        output_path,
    )
}

/// Generate a line chart of a per-step series as SVG
fn generate_step_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    values: &[f64],
    y_range: (f64, f64),
    color: &str,
    output_path: &Path,
) -> std::io::Result<()> {
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let (y_min, y_max) = y_range;
    let x_max = (values.len().saturating_sub(1)).max(1) as f64;

    let mut svg = String::new();

    // SVG header
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));

    // Background
    svg.push_str(&format!(
        r#"<rect width="{}" height="{}" fill="white"/>"#,
        CHART_WIDTH, CHART_HEIGHT
    ));

    // Title
    svg.push_str(&format!(
        r#"<text x="{}" y="35" text-anchor="middle" font-family="Arial, sans-serif" font-size="18" font-weight="bold" fill="{}">{}</text>"#,
        CHART_WIDTH / 2.0,
        COLOR_TEXT,
        escape_xml(title)
    ));

    // Horizontal grid lines with y-axis labels
    for i in 0..=5 {
        let y = MARGIN_TOP + plot_height - (i as f64 / 5.0) * plot_height;
        let value = y_min + (i as f64 / 5.0) * (y_max - y_min);

        svg.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + plot_width,
            y,
            COLOR_GRID
        ));

        svg.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="end" font-family="Arial, sans-serif" font-size="12" fill="{}">{:.1}</text>"#,
            MARGIN_LEFT - 10.0,
            y + 4.0,
            COLOR_TEXT,
            value
        ));
    }

    // Axes
    svg.push_str(&format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
        MARGIN_LEFT,
        MARGIN_TOP + plot_height,
        MARGIN_LEFT + plot_width,
        MARGIN_TOP + plot_height,
        COLOR_AXIS
    ));
    svg.push_str(&format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        MARGIN_TOP + plot_height,
        COLOR_AXIS
    ));

    // Axis labels
    svg.push_str(&format!(
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="Arial, sans-serif" font-size="14" fill="{}">{}</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        CHART_HEIGHT - 20.0,
        COLOR_TEXT,
        escape_xml(x_label)
    ));
    svg.push_str(&format!(
        r#"<text x="20" y="{}" text-anchor="middle" font-family="Arial, sans-serif" font-size="14" fill="{}" transform="rotate(-90 20 {})">{}</text>"#,
        CHART_HEIGHT / 2.0,
        COLOR_TEXT,
        CHART_HEIGHT / 2.0,
        escape_xml(y_label)
    ));

    // X-axis tick labels at six evenly spaced steps
    for i in 0..=5 {
        let step = (i as f64 / 5.0) * x_max;
        let x = MARGIN_LEFT + (step / x_max) * plot_width;
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="Arial, sans-serif" font-size="11" fill="{}">{:.0}</text>"#,
            x,
            MARGIN_TOP + plot_height + 20.0,
            COLOR_TEXT,
            step
        ));
    }

    // Series polyline; values are clamped into the fixed range
    if !values.is_empty() {
        let mut path = String::new();
        for (i, value) in values.iter().enumerate() {
            let clamped = value.clamp(y_min, y_max);
            let x = MARGIN_LEFT + (i as f64 / x_max) * plot_width;
            let y = MARGIN_TOP + plot_height - ((clamped - y_min) / (y_max - y_min)) * plot_height;

            if i == 0 {
                path.push_str(&format!("M {} {}", x, y));
            } else {
                path.push_str(&format!(" L {} {}", x, y));
            }
        }

        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            path, color
        ));
    }

    svg.push_str("</svg>");

    fs::write(output_path, svg)
}

/// Escape a string for inclusion in SVG text
pub(super) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_chart_generation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loss.svg");

        let losses: Vec<f64> = (0..50).map(|i| 2.0 - i as f64 * 0.03).collect();
        render_loss_chart(&losses, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());
        assert!(content.starts_with("<svg"));
        assert!(content.contains("Training Loss"));
    }

    #[test]
    fn test_accuracy_chart_generation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accuracy.svg");

        render_accuracy_chart(&[0.1, 0.4, 0.9], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Training Accuracy"));
    }

    #[test]
    fn test_empty_series_still_renders_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");

        render_loss_chart(&[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
