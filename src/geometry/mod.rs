pub mod curve;
pub mod profile;

pub use curve::{Curve, CurveDomain, CurveOptions, Parametrization, StationPoint};
pub use profile::{Profile, SectionProperties};
