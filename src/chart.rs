//! Bar charts for experiment results.
//!
//! A `Figure` lays out its charts side by side. It can be written to a
//! terminal or rendered into an image.

use std::io::Write;

use image::Rgb;
use image::RgbImage;
use owo_colors::OwoColorize;
use thiserror::Error;

/// Width in characters of the longest bar on text charts.
const TEXT_BAR_WIDTH: usize = 40;

const PANEL_WIDTH: u32 = 360;
const PANEL_HEIGHT: u32 = 270;
const PANEL_MARGIN: u32 = 30;
/// Fraction of its slot a bar takes.
const BAR_FILL: f64 = 0.6;

const WHITE: Rgb<u8> = Rgb([u8::MAX, u8::MAX, u8::MAX]);
const BLACK: Rgb<u8> = Rgb([u8::MIN, u8::MIN, u8::MIN]);
const PALETTE: [Rgb<u8>; 3] = [
    Rgb([0x1f, 0x77, 0xb4]),
    Rgb([0xff, 0x7f, 0x0e]),
    Rgb([0x2c, 0xa0, 0x2c]),
];

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Nothing to draw")]
    EmptyFigure,
    #[error("Chart '{title}' has no bars")]
    EmptyChart { title: String },
    #[error("Image error when saving '{p}': {e}")]
    ImageError {
        p: std::path::PathBuf,
        e: image::ImageError,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    /// `None` marks missing data, drawn as an empty slot.
    pub value: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn new(title: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_label: y_label.into(),
            bars: vec![],
        }
    }

    #[must_use]
    pub fn bar(mut self, label: impl Into<String>, value: Option<f64>) -> Self {
        self.bars.push(Bar {
            label: label.into(),
            value: value.filter(|v| v.is_finite()),
        });
        self
    }

    pub fn max_value(&self) -> Option<f64> {
        self.bars
            .iter()
            .filter_map(|b| b.value)
            .reduce(f64::max)
    }

    /// Fraction of the tallest bar `value` represents, in [0, 1].
    fn scale(&self, value: f64) -> f64 {
        match self.max_value() {
            Some(max) if max > 0.0 => (value / max).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let label_width = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0);

        writeln!(out, "{} [{}]", self.title.bold(), self.y_label)?;
        for (i, bar) in self.bars.iter().enumerate() {
            write!(out, "  {:<label_width$} │", bar.label)?;
            match bar.value {
                Some(value) => {
                    let len = (self.scale(value) * TEXT_BAR_WIDTH as f64).round() as usize;
                    let body = "█".repeat(len);
                    match i % PALETTE.len() {
                        0 => write!(out, "{}", body.blue())?,
                        1 => write!(out, "{}", body.yellow())?,
                        _ => write!(out, "{}", body.green())?,
                    }
                    writeln!(out, " {value:.4}")?;
                }
                None => writeln!(out, " {}", "n/a".dimmed())?,
            }
        }
        Ok(())
    }

    /// Draws the chart in the `PANEL_WIDTH`x`PANEL_HEIGHT` panel at `x0`.
    fn draw(&self, img: &mut RgbImage, x0: u32) {
        let left = x0 + PANEL_MARGIN;
        let right = x0 + PANEL_WIDTH - PANEL_MARGIN;
        let top = PANEL_MARGIN;
        let bottom = PANEL_HEIGHT - PANEL_MARGIN;

        // Axes
        for y in top..=bottom {
            img.put_pixel(left, y, BLACK);
        }
        for x in left..=right {
            img.put_pixel(x, bottom, BLACK);
        }

        let n = self.bars.len() as u32;
        let slot = (right - left) / n.max(1);
        let bar_width = ((slot as f64) * BAR_FILL) as u32;
        let plot_height = (bottom - top) as f64;
        for (i, bar) in self.bars.iter().enumerate() {
            let Some(value) = bar.value else {
                continue;
            };
            let height = (self.scale(value) * plot_height).round() as u32;
            let bar_left = left + slot * i as u32 + (slot - bar_width) / 2;
            let colour = PALETTE[i % PALETTE.len()];
            for x in bar_left..bar_left + bar_width {
                for y in bottom - height..bottom {
                    img.put_pixel(x, y, colour);
                }
            }
        }
    }
}

/// Charts drawn side by side.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub charts: Vec<BarChart>,
}

impl Figure {
    pub fn new(charts: Vec<BarChart>) -> Self {
        Self { charts }
    }

    pub fn write_text<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for (i, chart) in self.charts.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            chart.write_text(&mut out)?;
        }
        Ok(())
    }

    pub fn render(&self) -> Result<RgbImage, ChartError> {
        if self.charts.is_empty() {
            return Err(ChartError::EmptyFigure);
        }
        if let Some(chart) = self.charts.iter().find(|c| c.bars.is_empty()) {
            return Err(ChartError::EmptyChart {
                title: chart.title.clone(),
            });
        }

        let width = PANEL_WIDTH * self.charts.len() as u32;
        let mut img = RgbImage::from_pixel(width, PANEL_HEIGHT, WHITE);
        for (i, chart) in self.charts.iter().enumerate() {
            chart.draw(&mut img, PANEL_WIDTH * i as u32);
        }
        Ok(img)
    }

    /// Renders the figure into an image file, its format picked from the
    /// extension.
    pub fn save(&self, p: &std::path::Path) -> Result<(), ChartError> {
        self.render()?
            .save(p)
            .map_err(|e| ChartError::ImageError {
                p: p.to_path_buf(),
                e,
            })
    }
}
