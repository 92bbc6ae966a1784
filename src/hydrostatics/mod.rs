//! Hull construction, section integration and the floating equilibrium.

pub mod config;
pub mod curves;
pub mod definition;
pub mod form;
pub mod hull;
pub mod mass;
pub mod profile_set;
pub mod waterline;

pub use config::{HeelConvention, HydroConfig};
pub use curves::HydrostaticPoint;
pub use definition::{CurveDefinition, HullDefinition};
pub use form::FormParameters;
pub use hull::{Hull, HullSummary, ProfileSummary};
pub use mass::{
    CenterOfGravity, LoadingIssue, LoadingLimits, MassComponent, MassShare, MassSummary,
};
pub use profile_set::{ProfileSet, StationGap, VolumeProperties};
pub use waterline::{WaterlineSolution, WaterlineSolver};
