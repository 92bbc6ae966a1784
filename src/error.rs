use thiserror::Error;

/// Top-level error type for the hullform engine.
#[derive(Debug, Error)]
pub enum HullformError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Equilibrium(#[from] EquilibriumError),
}

/// Malformed input, raised when a curve or parameter set is constructed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("curve '{curve}' has {count} control points, at least 2 are required")]
    TooFewPoints { curve: String, count: usize },

    #[error("curve '{curve}' has a non-finite coordinate at point {index}")]
    NonFinite { curve: String, index: usize },

    #[error("curve '{curve}' repeats control point {index}")]
    RepeatedPoint { curve: String, index: usize },

    #[error("curve '{curve}' is not strictly monotonic in x at point {index}")]
    NonMonotonicStation { curve: String, index: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Degenerate geometry found while evaluating or integrating the hull.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter t = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange { value: f64, min: f64, max: f64 },

    #[error("x = {x} is outside the range [{min}, {max}] of curve '{curve}'")]
    StationOutOfRange {
        curve: String,
        x: f64,
        min: f64,
        max: f64,
    },

    #[error("root search for x = {x} on curve '{curve}' did not converge")]
    RootNotFound { curve: String, x: f64 },

    #[error("profile at station {station} has {distinct} distinct points, at least 3 are required")]
    DegenerateProfile { station: f64, distinct: usize },

    #[error("no valid cross-section at interior station {station} ({distinct} distinct points)")]
    CoverageGap { station: f64, distinct: usize },

    #[error("hull encloses no volume")]
    ZeroVolume,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Failures of the waterline equilibrium search.
#[derive(Debug, Error)]
pub enum EquilibriumError {
    #[error("target weight {target:.2} kg exceeds the {capacity:.2} kg capacity at full immersion")]
    CapacityExceeded { target: f64, capacity: f64 },

    #[error("insufficient volume: the hull displaces nothing, cannot carry {target:.2} kg")]
    InsufficientVolume { target: f64 },

    #[error(
        "waterline did not converge after {iterations} iterations \
         (waterline {waterline:.4} m, residual {residual:.3} kg)"
    )]
    NotConverged {
        iterations: usize,
        waterline: f64,
        residual: f64,
    },
}

/// Convenience type alias for results using [`HullformError`].
pub type Result<T> = std::result::Result<T, HullformError>;
