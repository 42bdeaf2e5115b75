// Our Real scalar type:
pub type Real = f64;

/// Tolerance used for every coplanarity, distance and degeneracy decision in the crate.
///
/// Classification, splitting and plane construction must all agree on this value.
pub const EPSILON: Real = 1e-5;

// Pi
/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

// Frac Pi 2
/// π/2
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

// Tau
/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;
