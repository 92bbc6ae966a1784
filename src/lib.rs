//! Hydrostatics and transverse stability of small watercraft hulls built
//! from longitudinal curves.

pub mod error;
pub mod geometry;
pub mod hydrostatics;
pub mod math;
pub mod stability;

pub use error::{HullformError, Result};
pub use hydrostatics::{
    CenterOfGravity, CurveDefinition, FormParameters, HeelConvention, Hull, HullDefinition,
    HullSummary, HydroConfig, HydrostaticPoint, MassComponent, WaterlineSolution,
};
pub use stability::{StabilityConfig, StabilityCurve, StabilityPoint, StabilitySweep};
