//! Unified configuration for the symbol locator.
//!
//! Every threshold the detectors use is a named field here. Drawings differ
//! in units (pixels for rasterised scans, points for vector PDFs) and in
//! drafting conventions, so the two presets [`LocatorConfig::raster`] and
//! [`LocatorConfig::vector`] are starting points rather than canonical values.
//!
//! All sections deserialize with `#[serde(default)]`, so a JSON file only
//! needs the fields it overrides:
//!
//! ```
//! use weldmark::config::LocatorConfig;
//!
//! let config = LocatorConfig::from_json(r#"{ "angle": { "window_dx": 25.0 } }"#).unwrap();
//! assert_eq!(config.angle.window_dx, 25.0);
//! assert_eq!(config.angle.window_dy, 20.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Rect;

/// Line classification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Maximum deviation from an axis, in degrees (exclusive)
    pub angle_tolerance_deg: f64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            angle_tolerance_deg: 10.0,
        }
    }
}

/// Box reconstruction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Largest coordinate span expected on a page, in page units
    ///
    /// Together with `extension_factor` this sets how far lines are
    /// extended before intersecting. Extension only moves endpoints along
    /// the line's own direction and intersections are taken between the
    /// infinite lines, so neither value changes which corners are found.
    /// Both are kept so a configuration states its extension explicitly.
    pub page_extent: f64,
    /// Lines are extended by `extension_factor × page_extent` in both
    /// directions; see `page_extent`
    pub extension_factor: f64,
    /// Lines whose angle has a sine below this are treated as parallel
    pub determinant_epsilon: f64,
    /// Quadrilaterals enclosing less area are dropped
    pub min_area: f64,
    /// Precompute the horizontal × vertical intersection table and skip
    /// quadruples early when a corner is missing (same output, less work)
    pub prune: bool,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            page_extent: 10_000.0,
            extension_factor: 2.0,
            determinant_epsilon: 1e-6,
            min_area: 500.0,
            prune: true,
        }
    }
}

impl ReconstructionConfig {
    /// Distance each line is pushed out past its endpoints.
    pub fn reach(&self) -> f64 {
        self.page_extent * self.extension_factor
    }
}

/// Accepted width/height range for one symbol class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeEnvelope {
    /// Minimum width (inclusive)
    pub min_width: f64,
    /// Maximum width (inclusive)
    pub max_width: f64,
    /// Minimum height (inclusive)
    pub min_height: f64,
    /// Maximum height (inclusive)
    pub max_height: f64,
}

impl SizeEnvelope {
    /// Proportions of a weld callout box on a vector drawing.
    pub fn weld_box() -> Self {
        Self {
            min_width: 50.0,
            max_width: 500.0,
            min_height: 10.0,
            max_height: 150.0,
        }
    }

    /// Whether a rectangle's size falls inside the envelope.
    pub fn contains(&self, rect: &Rect) -> bool {
        (self.min_width..=self.max_width).contains(&rect.width)
            && (self.min_height..=self.max_height).contains(&rect.height)
    }
}

/// How near-identical boxes are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Keep every box, duplicates included
    Keep,
    /// Boxes whose bounds snap to the same multiples of `grid` are one box;
    /// the first occurrence wins
    RoundedBounds {
        /// Snapping step in page units
        grid: f64,
    },
}

impl Default for DedupPolicy {
    fn default() -> Self {
        DedupPolicy::RoundedBounds { grid: 1.0 }
    }
}

/// Box filter settings, shared by both box sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxFilterConfig {
    /// Boxes enclosing less area are dropped
    pub min_area: f64,
    /// Optional width/height envelope
    pub envelope: Option<SizeEnvelope>,
    /// Duplicate handling
    pub dedup: DedupPolicy,
}

impl Default for BoxFilterConfig {
    fn default() -> Self {
        Self {
            min_area: 500.0,
            envelope: None,
            dedup: DedupPolicy::default(),
        }
    }
}

/// Contour approximation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter
    pub epsilon_fraction: f64,
    /// Canny low hysteresis threshold (raster feature)
    pub canny_low: f32,
    /// Canny high hysteresis threshold (raster feature)
    pub canny_high: f32,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            epsilon_fraction: 0.02,
            canny_low: 50.0,
            canny_high: 150.0,
        }
    }
}

/// Which records survive when one span falls inside several boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep one record per containing box
    #[default]
    KeepAll,
    /// Keep only the record of the smallest containing box
    SmallestRect,
}

/// Weld identifier classification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeldClassifierConfig {
    /// Ordered regex patterns; the first match wins. Patterns are anchored
    /// to the whole normalized text.
    pub patterns: Vec<String>,
    /// Upper-case text before matching
    pub case_insensitive: bool,
    /// Non-matching text is `Rejected` instead of `Plain`
    pub strict: bool,
    /// In strict mode, keep rejected records in the page output
    pub keep_rejected: bool,
    /// Resolution of spans inside several boxes
    pub tie_break: TieBreak,
}

impl Default for WeldClassifierConfig {
    fn default() -> Self {
        Self {
            patterns: default_weld_patterns(),
            case_insensitive: true,
            strict: false,
            keep_rejected: false,
            tie_break: TieBreak::KeepAll,
        }
    }
}

/// Default weld identifier grammar, highest priority first.
pub fn default_weld_patterns() -> Vec<String> {
    vec![
        r"W\d+[A-Z0-9]*".to_string(),
        r"\d+".to_string(),
        r"[A-Z]+\d+".to_string(),
    ]
}

/// Degree-sign grouping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleConfig {
    /// Smallest circle side accepted as a degree sign
    pub min_circle_size: f64,
    /// Largest circle side accepted as a degree sign
    pub max_circle_size: f64,
    /// Horizontal search half-width around the circle center
    pub window_dx: f64,
    /// Vertical search half-height around the circle center
    pub window_dy: f64,
    /// Accept '.' inside a numeral ("12.5°")
    pub allow_decimal_point: bool,
}

impl Default for AngleConfig {
    fn default() -> Self {
        Self {
            min_circle_size: 0.5,
            max_circle_size: 8.0,
            window_dx: 40.0,
            window_dy: 20.0,
            allow_decimal_point: false,
        }
    }
}

/// Complete locator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Line classification
    pub lines: LineConfig,
    /// Box reconstruction from lines
    pub reconstruction: ReconstructionConfig,
    /// Box filtering
    pub filter: BoxFilterConfig,
    /// Contour approximation
    pub contours: ContourConfig,
    /// Weld identifiers
    pub weld: WeldClassifierConfig,
    /// Degree-sign grouping
    pub angle: AngleConfig,
}

impl LocatorConfig {
    /// Tuning for rasterised scans in pixel space.
    ///
    /// Keeps every reconstructed box (no dedup, no envelope) with a 500 px²
    /// area floor, which suits Hough output at 150–300 dpi.
    pub fn raster() -> Self {
        Self {
            filter: BoxFilterConfig {
                min_area: 500.0,
                envelope: None,
                dedup: DedupPolicy::Keep,
            },
            ..Default::default()
        }
    }

    /// Tuning for vector PDFs in point space.
    ///
    /// Smaller area floor, weld box proportions, and snapping to whole points
    /// when deduplicating.
    pub fn vector() -> Self {
        Self {
            reconstruction: ReconstructionConfig {
                page_extent: 5_000.0,
                min_area: 200.0,
                ..Default::default()
            },
            filter: BoxFilterConfig {
                min_area: 200.0,
                envelope: Some(SizeEnvelope::weld_box()),
                dedup: DedupPolicy::RoundedBounds { grid: 1.0 },
            },
            weld: WeldClassifierConfig {
                tie_break: TieBreak::SmallestRect,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LocatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every tunable is usable.
    pub fn validate(&self) -> Result<()> {
        fn non_negative(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )))
            }
        }
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "{} must be a finite positive number, got {}",
                    name, value
                )))
            }
        }

        let tol = self.lines.angle_tolerance_deg;
        if !(tol > 0.0 && tol < 45.0) {
            return Err(Error::InvalidConfig(format!(
                "lines.angle_tolerance_deg must lie in (0, 45), got {}",
                tol
            )));
        }

        let rc = &self.reconstruction;
        positive("reconstruction.page_extent", rc.page_extent)?;
        positive("reconstruction.extension_factor", rc.extension_factor)?;
        non_negative("reconstruction.determinant_epsilon", rc.determinant_epsilon)?;
        non_negative("reconstruction.min_area", rc.min_area)?;

        non_negative("filter.min_area", self.filter.min_area)?;
        if let Some(env) = &self.filter.envelope {
            non_negative("filter.envelope.min_width", env.min_width)?;
            non_negative("filter.envelope.min_height", env.min_height)?;
            if env.max_width < env.min_width || env.max_height < env.min_height {
                return Err(Error::InvalidConfig(
                    "filter.envelope maximums must not be below minimums".to_string(),
                ));
            }
        }
        if let DedupPolicy::RoundedBounds { grid } = self.filter.dedup {
            positive("filter.dedup.grid", grid)?;
        }

        let eps = self.contours.epsilon_fraction;
        if !(eps > 0.0 && eps < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "contours.epsilon_fraction must lie in (0, 1), got {}",
                eps
            )));
        }

        if self.weld.patterns.is_empty() {
            return Err(Error::InvalidConfig(
                "weld.patterns must contain at least one pattern".to_string(),
            ));
        }

        let angle = &self.angle;
        non_negative("angle.min_circle_size", angle.min_circle_size)?;
        positive("angle.max_circle_size", angle.max_circle_size)?;
        if angle.max_circle_size < angle.min_circle_size {
            return Err(Error::InvalidConfig(
                "angle.max_circle_size must not be below angle.min_circle_size".to_string(),
            ));
        }
        non_negative("angle.window_dx", angle.window_dx)?;
        non_negative("angle.window_dy", angle.window_dy)?;

        Ok(())
    }
}
