//! Scalar activations used to store splat attributes.
//!
//! Opacity is stored as a logit and colour as a spherical-harmonics DC
//! coefficient. Both conversions are evaluated in double precision and
//! narrowed on return so the clamped extremes land on the exact logit.

/// Spherical-harmonics band 0 normalization constant (Y₀₀).
pub const SH_C0: f32 = 0.282095;

/// Lower/upper bound applied to an opacity before taking its logit.
const OPACITY_EPSILON: f64 = 1e-6;

/// Sigmoid activation function: σ(x) = 1 / (1 + e^(-x))
///
/// Maps R → (0, 1)
pub fn sigmoid(x: f32) -> f32 {
    (1.0 / (1.0 + (-(x as f64)).exp())) as f32
}

/// Inverse sigmoid (logit): logit(p) = ln(p / (1 - p))
///
/// The input is clamped to `[1e-6, 1 - 1e-6]` first, so 0 and 1 map to
/// finite values (about ∓13.8155).
pub fn inverse_sigmoid(p: f32) -> f32 {
    let p = (p as f64).clamp(OPACITY_EPSILON, 1.0 - OPACITY_EPSILON);
    (p / (1.0 - p)).ln() as f32
}
