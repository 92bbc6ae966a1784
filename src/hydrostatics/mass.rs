//! Point masses and the loaded center of gravity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, ValidationError};
use crate::math::{Point3, Vector3, GRAVITY};

/// A point mass carried by the hull: the structure itself, a paddler, gear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassComponent {
    pub name: String,
    /// Mass in kg.
    pub mass: f64,
    /// Position in the hull frame (+y to starboard, +z up).
    pub position: Point3,
    #[serde(default)]
    pub description: String,
}

impl MassComponent {
    /// Creates a validated component.
    ///
    /// # Errors
    ///
    /// See [`MassComponent::validate`].
    pub fn new(name: impl Into<String>, mass: f64, position: Point3) -> Result<Self> {
        let component = Self {
            name: name.into(),
            mass,
            position,
            description: String::new(),
        };
        component.validate()?;
        Ok(component)
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Checks that the mass is finite and non-negative and the position is
    /// finite.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] naming the component.
    pub fn validate(&self) -> Result<()> {
        if !(self.mass.is_finite() && self.mass >= 0.0) {
            return Err(ValidationError::InvalidParameter(format!(
                "mass of '{}' must be finite and non-negative, got {} kg",
                self.name, self.mass
            ))
            .into());
        }
        let p = &self.position;
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return Err(ValidationError::InvalidParameter(format!(
                "position of '{}' must be finite, got ({}, {}, {})",
                self.name, p.x, p.y, p.z
            ))
            .into());
        }
        Ok(())
    }
}

/// Mass-weighted center of a set of components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CenterOfGravity {
    pub position: Point3,
    /// Total mass in kg.
    pub total_mass: f64,
    /// Number of components aggregated.
    pub components: usize,
}

impl CenterOfGravity {
    /// Aggregates `components` by moments: `CG = Σ mᵢ·pᵢ / Σ mᵢ`.
    ///
    /// Zero-mass components are counted but do not move the CG.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] for an empty list, an
    /// invalid component, or a zero total mass.
    pub fn from_components(components: &[MassComponent]) -> Result<Self> {
        if components.is_empty() {
            return Err(ValidationError::InvalidParameter(
                "at least one mass component is required".into(),
            )
            .into());
        }
        let mut total_mass = 0.0;
        let mut moment = Vector3::zeros();
        for component in components {
            component.validate()?;
            total_mass += component.mass;
            moment += component.position.coords * component.mass;
        }
        if total_mass <= 0.0 {
            return Err(ValidationError::InvalidParameter(format!(
                "total mass must be positive, got {total_mass} kg"
            ))
            .into());
        }
        Ok(Self {
            position: Point3::from(moment / total_mass),
            total_mass,
            components: components.len(),
        })
    }

    /// The CG after adding `additional` to this loading condition.
    ///
    /// # Errors
    ///
    /// See [`CenterOfGravity::from_components`].
    pub fn with_added(&self, additional: &[MassComponent]) -> Result<Self> {
        let base = MassComponent {
            name: "Base".into(),
            mass: self.total_mass,
            position: self.position,
            description: String::new(),
        };
        let all: Vec<MassComponent> = std::iter::once(base)
            .chain(additional.iter().cloned())
            .collect();
        let mut cg = Self::from_components(&all)?;
        cg.components = self.components + additional.len();
        Ok(cg)
    }

    /// Weight force in N.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.total_mass * GRAVITY
    }

    /// Plausibility findings against `limits`; empty when none apply.
    #[must_use]
    pub fn check(&self, limits: &LoadingLimits) -> Vec<LoadingIssue> {
        let mut issues = Vec::new();
        let p = &self.position;
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            issues.push(LoadingIssue::NonFinite);
        }
        if self.total_mass < limits.min_mass {
            issues.push(LoadingIssue::MassTooLow {
                mass: self.total_mass,
                min: limits.min_mass,
            });
        }
        if self.total_mass > limits.max_mass {
            issues.push(LoadingIssue::MassTooHigh {
                mass: self.total_mass,
                max: limits.max_mass,
            });
        }
        if p.y.abs() > limits.max_tcg_offset {
            issues.push(LoadingIssue::OffCenter {
                tcg: p.y,
                max: limits.max_tcg_offset,
            });
        }
        issues
    }
}

/// Bounds for a plausible kayak loading condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingLimits {
    /// Smallest plausible total mass in kg.
    pub min_mass: f64,
    /// Largest plausible total mass in kg.
    pub max_mass: f64,
    /// Largest transverse CG offset from the centerline in m.
    pub max_tcg_offset: f64,
}

impl Default for LoadingLimits {
    fn default() -> Self {
        Self {
            min_mass: 1.0,
            max_mass: 500.0,
            max_tcg_offset: 0.1,
        }
    }
}

/// A loading condition outside [`LoadingLimits`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Error)]
pub enum LoadingIssue {
    #[error("center of gravity is not finite")]
    NonFinite,

    #[error("total mass {mass:.2} kg is below the expected minimum of {min:.0} kg")]
    MassTooLow { mass: f64, min: f64 },

    #[error("total mass {mass:.2} kg is above the expected maximum of {max:.0} kg")]
    MassTooHigh { mass: f64, max: f64 },

    #[error("transverse CG {tcg:.3} m is more than {max:.2} m off the centerline")]
    OffCenter { tcg: f64, max: f64 },
}

/// One component's share of the total mass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassShare {
    pub name: String,
    pub mass: f64,
    /// Percentage of the total, zero when the total is zero.
    pub percentage: f64,
}

/// Breakdown of a component list, heaviest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassSummary {
    pub total_mass: f64,
    pub average_mass: f64,
    pub distribution: Vec<MassShare>,
}

impl MassSummary {
    /// Summarizes `components`. An empty list gives zero totals.
    #[must_use]
    pub fn of(components: &[MassComponent]) -> Self {
        let total_mass: f64 = components.iter().map(|c| c.mass).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_mass = if components.is_empty() {
            0.0
        } else {
            total_mass / components.len() as f64
        };
        let mut distribution: Vec<MassShare> = components
            .iter()
            .map(|c| MassShare {
                name: c.name.clone(),
                mass: c.mass,
                percentage: if total_mass > 0.0 {
                    c.mass / total_mass * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        distribution.sort_by(|a, b| b.mass.total_cmp(&a.mass));
        Self {
            total_mass,
            average_mass,
            distribution,
        }
    }

    /// Number of components.
    #[must_use]
    pub fn count(&self) -> usize {
        self.distribution.len()
    }

    /// Heaviest component.
    #[must_use]
    pub fn heaviest(&self) -> Option<&MassShare> {
        self.distribution.first()
    }

    /// Lightest component.
    #[must_use]
    pub fn lightest(&self) -> Option<&MassShare> {
        self.distribution.last()
    }
}
