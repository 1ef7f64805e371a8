//! Contour detection on raster pages via `imageproc`.
//!
//! Runs Canny edge detection and traces every border of the edge map,
//! outer and hole alike. A stroked box yields one contour on each side of
//! its stroke; the box filter's dedup step merges them when they snap to the
//! same bounds.

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::edges::canny;

use super::contours::{Contour, ContourBoxSource, ContourDetector};
use super::BoxSource;
use crate::config::{ContourConfig, LocatorConfig};
use crate::geometry::{Point, Rect};

/// Canny + border-following contour detector.
#[derive(Debug, Clone, Copy)]
pub struct CannyContourDetector {
    low_threshold: f32,
    high_threshold: f32,
}

impl CannyContourDetector {
    /// Create a detector with explicit hysteresis thresholds.
    pub fn new(low_threshold: f32, high_threshold: f32) -> Self {
        Self {
            low_threshold,
            high_threshold,
        }
    }

    /// Create a detector from contour settings.
    pub fn from_config(config: &ContourConfig) -> Self {
        Self::new(config.canny_low, config.canny_high)
    }
}

impl Default for CannyContourDetector {
    fn default() -> Self {
        Self::from_config(&ContourConfig::default())
    }
}

impl ContourDetector for CannyContourDetector {
    type Image = GrayImage;

    fn detect(&self, image: &GrayImage) -> Vec<Contour> {
        let edges = canny(image, self.low_threshold, self.high_threshold);
        let contours: Vec<Contour> = find_contours::<u32>(&edges)
            .into_iter()
            .map(|c| {
                Contour::new(
                    c.points
                        .into_iter()
                        .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                        .collect(),
                )
            })
            .collect();
        log::debug!(
            "traced {} contours on {}x{} image",
            contours.len(),
            image.width(),
            image.height()
        );
        contours
    }
}

/// Detect symbol rectangles on a grayscale page image.
pub fn detect_rectangles(image: &GrayImage, config: &LocatorConfig) -> Vec<Rect> {
    let contours = CannyContourDetector::from_config(&config.contours).detect(image);
    ContourBoxSource::new(&contours).rectangles(config)
}
