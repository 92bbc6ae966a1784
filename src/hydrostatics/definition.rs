use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::curve::{CurveOptions, Parametrization};
use crate::geometry::Curve;
use crate::math::spline::EndCondition;
use crate::math::Point3;

fn default_name() -> String {
    "KAYAK HULL".to_string()
}

fn default_target_weight() -> f64 {
    100.0
}

fn default_target_payload() -> f64 {
    100.0
}

/// One named hull curve as handed over by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveDefinition {
    pub name: String,
    /// Set on curves that are already mirror images; they are never
    /// mirrored again.
    #[serde(default)]
    pub mirrored: bool,
    #[serde(default)]
    pub parametrization: Parametrization,
    #[serde(default)]
    pub end_condition: EndCondition,
    /// Control points as `[x, y, z]` in meters.
    pub points: Vec<[f64; 3]>,
}

impl CurveDefinition {
    /// An unmirrored curve with automatic parametrization.
    #[must_use]
    pub fn new(name: impl Into<String>, points: Vec<[f64; 3]>) -> Self {
        Self {
            name: name.into(),
            mirrored: false,
            parametrization: Parametrization::Auto,
            end_condition: EndCondition::Natural,
            points,
        }
    }

    /// Fits the curve.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed control points, see
    /// [`Curve::with_options`].
    pub fn to_curve(&self) -> Result<Curve> {
        let points = self
            .points
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect();
        let options = CurveOptions::default()
            .with_parametrization(self.parametrization)
            .with_end_condition(self.end_condition)
            .with_mirrored(self.mirrored);
        Curve::with_options(self.name.clone(), points, options)
    }
}

/// A complete hull description: curves plus weight targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullDefinition {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Initial waterline guess in meters above the lowest point.
    #[serde(default)]
    pub target_waterline: Option<f64>,
    /// Hull mass in kg.
    #[serde(default = "default_target_weight")]
    pub target_weight: f64,
    /// Payload (paddler and gear) mass in kg.
    #[serde(default = "default_target_payload")]
    pub target_payload: f64,
    pub curves: Vec<CurveDefinition>,
}

impl HullDefinition {
    /// A definition with default name and targets.
    #[must_use]
    pub fn new(curves: Vec<CurveDefinition>) -> Self {
        Self {
            name: default_name(),
            description: String::new(),
            target_waterline: None,
            target_weight: default_target_weight(),
            target_payload: default_target_payload(),
            curves,
        }
    }

    /// Sets the hull name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the initial waterline guess.
    #[must_use]
    pub fn with_target_waterline(mut self, waterline: f64) -> Self {
        self.target_waterline = Some(waterline);
        self
    }

    /// Sets the hull and payload masses in kg.
    #[must_use]
    pub fn with_targets(mut self, weight: f64, payload: f64) -> Self {
        self.target_weight = weight;
        self.target_payload = payload;
        self
    }

    /// Mass the upright waterline is solved for.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.target_weight + self.target_payload
    }
}
