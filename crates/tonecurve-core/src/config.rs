//! Editor configuration: density and the dp-sized metrics derived from it.

use serde::{Deserialize, Serialize};

use crate::error::ToneCurveError;
use crate::geometry::{PlotBounds, dp_to_px};

/// Default display density when none is configured.
const DEFAULT_DENSITY: f32 = 1.0;
/// Default inset around the drawable region.
const DEFAULT_INSET_DP: f32 = 20.0;
/// Default hit radius, also the minimum gap between neighbouring points.
const DEFAULT_HIT_RADIUS_DP: f32 = 10.0;

/// Tunable presentation metrics for a [`ToneCurveEditor`](crate::ToneCurveEditor).
///
/// Distances are in density-independent units and converted with
/// [`dp_to_px`]. The editing contract constants (point cap, drag slop,
/// sampling density) are not part of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Display density (pixels per dp).
    pub density: f32,
    /// Symmetric inset of the drawable region.
    pub inset_dp: f32,
    /// Pointer hit radius and minimum inter-point gap.
    pub hit_radius_dp: f32,
    /// Stroke width of curve polylines.
    pub curve_width_dp: f32,
    /// Stroke width of grid lines.
    pub grid_width_dp: f32,
    /// Ring width around the selected point.
    pub select_stroke_dp: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            density: std::env::var("TONECURVE_DENSITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|d: &f32| *d > 0.0)
                .unwrap_or(DEFAULT_DENSITY),
            inset_dp: DEFAULT_INSET_DP,
            hit_radius_dp: DEFAULT_HIT_RADIUS_DP,
            curve_width_dp: 2.0,
            grid_width_dp: 1.0,
            select_stroke_dp: 2.4,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ToneCurveError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ToneCurveError> {
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(ToneCurveError::InvalidConfig("density must be positive"));
        }
        let distances = [
            self.inset_dp,
            self.hit_radius_dp,
            self.curve_width_dp,
            self.grid_width_dp,
            self.select_stroke_dp,
        ];
        if distances.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(ToneCurveError::InvalidConfig(
                "distances must be finite and non-negative",
            ));
        }
        Ok(())
    }

    pub fn hit_radius_px(&self) -> f32 {
        dp_to_px(self.hit_radius_dp, self.density)
    }

    pub fn inset_px(&self) -> f32 {
        dp_to_px(self.inset_dp, self.density)
    }

    pub fn curve_width_px(&self) -> f32 {
        dp_to_px(self.curve_width_dp, self.density)
    }

    pub fn grid_width_px(&self) -> f32 {
        dp_to_px(self.grid_width_dp, self.density)
    }

    pub fn select_stroke_px(&self) -> f32 {
        dp_to_px(self.select_stroke_dp, self.density)
    }

    /// Plot bounds for a widget of the given pixel size.
    pub fn bounds(&self, width: f32, height: f32) -> PlotBounds {
        PlotBounds::new(width, height, self.inset_px())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EditorConfig::from_json(r#"{ "density": 2.0 }"#).unwrap();
        assert!((config.density - 2.0).abs() < EPSILON);
        assert!((config.hit_radius_dp - DEFAULT_HIT_RADIUS_DP).abs() < EPSILON);
        assert!((config.hit_radius_px() - 20.5).abs() < EPSILON);
        assert!((config.inset_px() - 40.5).abs() < EPSILON);
    }

    #[test]
    fn test_rejects_non_positive_density() {
        let err = EditorConfig::from_json(r#"{ "density": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ToneCurveError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_negative_distance() {
        let err = EditorConfig::from_json(r#"{ "density": 1.0, "hit_radius_dp": -1.0 }"#)
            .unwrap_err();
        assert!(matches!(err, ToneCurveError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json_is_a_config_error() {
        let err = EditorConfig::from_json("{ density: ").unwrap_err();
        assert!(matches!(err, ToneCurveError::Config(_)));
    }

    #[test]
    fn test_bounds_use_inset() {
        let config = EditorConfig {
            density: 1.0,
            ..EditorConfig::default()
        };
        let bounds = config.bounds(300.0, 300.0);
        assert!((bounds.left() - 20.5).abs() < EPSILON);
        assert!((bounds.bottom() - 279.5).abs() < EPSILON);
    }
}
