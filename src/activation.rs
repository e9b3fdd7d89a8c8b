//! Activation functions.
//!
//! Every neuron in a cascade computes a scaled net input `net = NET_SCALE * (w . x)`
//! and then applies an activation element-wise: `y = activation(net)`.
//!
//! The forward pass caches the *post-activation* value `y` in the activation buffer.
//! During the backward pass the derivative is recovered from `y` alone, so no separate
//! pre-activation buffer is needed.
//!
//! The rectifier kernels are branchless: they read the IEEE-754 sign bit instead of
//! comparing against zero.

use crate::{Error, Result};

/// Euler's constant as used by [`normalized_exponential`].
pub const EULER_F32: f32 = 2.718_281_746;

/// Negative-side slope of [`leaky_rectifier`].
pub const LEAKY_RECTIFIER_ALPHA: f32 = 0.01;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Neuron nonlinearity.
pub enum Activation {
    /// Plain rectifier, `max(net, 0)`.
    #[default]
    Rectifier,
    /// Rectifier with slope `alpha` on the negative side.
    LeakyRectifier { alpha: f32 },
    /// Elliott sigmoid, `net / (1 + |net|)`.
    ElliotSig,
}

impl Activation {
    /// Validate activation parameters.
    pub fn validate(self) -> Result<()> {
        match self {
            Activation::LeakyRectifier { alpha } => {
                if !(alpha.is_finite() && alpha >= 0.0) {
                    return Err(Error::InvalidConfig(format!(
                        "leaky rectifier alpha must be finite and >= 0, got {alpha}"
                    )));
                }
            }
            Activation::Rectifier | Activation::ElliotSig => {}
        }

        Ok(())
    }

    #[inline]
    pub fn forward(self, net: f32) -> f32 {
        match self {
            Activation::Rectifier => rectifier(net),
            Activation::LeakyRectifier { alpha } => parametric_rectifier(net, alpha),
            Activation::ElliotSig => elliotsig(net),
        }
    }

    /// Derivative of the activation with respect to its input, expressed in terms
    /// of the cached post-activation output `y`.
    #[inline]
    pub fn derivative(self, y: f32) -> f32 {
        match self {
            Activation::Rectifier => derivative_rectifier(y),
            Activation::LeakyRectifier { alpha } => {
                let negative = sign_bit(y);
                (1.0 - negative) + alpha * negative
            }
            Activation::ElliotSig => derivative_elliotsig(y),
        }
    }
}

/// `1.0` when the sign bit of `x` is set, `0.0` otherwise.
#[inline]
fn sign_bit(x: f32) -> f32 {
    (x.to_bits() >> 31) as f32
}

/// Rectifier with a configurable negative slope.
///
/// Behaves like `if net >= 0.0 { net } else { rectifier_alpha * net }`, decided on the
/// sign bit so `-0.0` takes the negative branch.
#[inline]
pub fn parametric_rectifier(net: f32, rectifier_alpha: f32) -> f32 {
    let negative = sign_bit(net);
    net * ((1.0 - negative) + rectifier_alpha * negative)
}

#[inline]
pub fn rectifier(net: f32) -> f32 {
    parametric_rectifier(net, 0.0)
}

#[inline]
pub fn leaky_rectifier(net: f32) -> f32 {
    parametric_rectifier(net, LEAKY_RECTIFIER_ALPHA)
}

/// `1.0` if the sign bit of `y` is clear, `0.0` otherwise.
///
/// This is the plain rectifier derivative; it ignores any leaky slope.
#[inline]
pub fn derivative_rectifier(y: f32) -> f32 {
    ((y.to_bits() >> 31) ^ 1) as f32
}

#[inline]
pub fn elliotsig(net: f32) -> f32 {
    net / (1.0 + fabs_branchless(net))
}

/// Derivative of [`elliotsig`] given its output `y`: `1 / (1 + |x|)^2 = (1 - |y|)^2`.
#[inline]
pub fn derivative_elliotsig(y: f32) -> f32 {
    let d = 1.0 - fabs_branchless(y);
    d * d
}

/// `e^x`, used by the softmax-style output normalization.
#[inline]
pub fn normalized_exponential(x: f32) -> f32 {
    EULER_F32.powf(x)
}

/// Output error term for the normalized-exponential output layer.
///
/// With softmax outputs and a cross-entropy objective the gradient with respect to the
/// pre-normalization value collapses to `actual - desired`, which is what callers pass in.
#[inline]
pub fn normalized_exponential_delta(error: f32) -> f32 {
    error
}

/// Absolute value by clearing the IEEE-754 sign bit.
#[inline]
pub fn fabs_branchless(x: f32) -> f32 {
    f32::from_bits(x.to_bits() & !(1 << 31))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaky_alpha_must_be_finite_and_non_negative() {
        assert!(
            Activation::LeakyRectifier { alpha: f32::NAN }
                .validate()
                .is_err()
        );
        assert!(
            Activation::LeakyRectifier { alpha: -0.1 }
                .validate()
                .is_err()
        );
        assert!(
            Activation::LeakyRectifier { alpha: 0.1 }
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn rectifier_passes_non_negative_values_through() {
        for x in [0.0_f32, 1e-30, 0.25, 3.0, 1e20] {
            assert_eq!(rectifier(x), x);
            assert_eq!(leaky_rectifier(x), x);
        }
    }

    #[test]
    fn rectifier_zeroes_negative_values() {
        for x in [-1e-30_f32, -0.25, -3.0, -1e20] {
            assert_eq!(rectifier(x), 0.0);
        }
    }

    #[test]
    fn leaky_rectifier_scales_negative_values() {
        for x in [-1e-3_f32, -0.25, -3.0, -1e20] {
            assert_eq!(leaky_rectifier(x), 0.01 * x);
        }
        assert_eq!(parametric_rectifier(-2.0, 0.5), -1.0);
    }

    #[test]
    fn rectifier_derivative_follows_sign_bit() {
        assert_eq!(derivative_rectifier(0.0), 1.0);
        assert_eq!(derivative_rectifier(2.5), 1.0);
        assert_eq!(derivative_rectifier(-0.0), 0.0);
        assert_eq!(derivative_rectifier(-2.5), 0.0);

        // A rectified negative net input is -0.0, so its derivative is 0.
        assert_eq!(derivative_rectifier(rectifier(-4.0)), 0.0);
    }

    #[test]
    fn leaky_derivative_uses_slope_on_negative_side() {
        let act = Activation::LeakyRectifier { alpha: 0.1 };
        let y = act.forward(-2.0);
        assert!((y - (-0.2)).abs() < 1e-7);
        assert_eq!(act.derivative(y), 0.1);
        assert_eq!(act.derivative(act.forward(3.0)), 1.0);
    }

    #[test]
    fn elliotsig_is_bounded_and_derivative_matches_numeric() {
        assert_eq!(elliotsig(0.0), 0.0);
        assert!(elliotsig(1e6) < 1.0);
        assert!(elliotsig(-1e6) > -1.0);

        let eps = 1e-3_f32;
        for x in [-2.0_f32, -0.3, 0.4, 1.7] {
            let numeric = (elliotsig(x + eps) - elliotsig(x - eps)) / (2.0 * eps);
            let analytic = derivative_elliotsig(elliotsig(x));
            assert!(
                (numeric - analytic).abs() < 1e-3,
                "x={x} numeric={numeric} analytic={analytic}"
            );
        }
    }

    #[test]
    fn normalized_exponential_matches_exp() {
        for x in [-3.0_f32, -0.5, 0.0, 0.5, 3.0] {
            let y = normalized_exponential(x);
            assert!((y - x.exp()).abs() <= 1e-5 * x.exp().max(1.0));
        }
        assert_eq!(normalized_exponential(0.0), 1.0);
    }

    #[test]
    fn normalized_exponential_delta_vanishes_at_zero_error() {
        assert_eq!(normalized_exponential_delta(0.0), 0.0);
        let mut last = 0.0_f32;
        for e in [0.1_f32, 0.5, 1.0, 4.0] {
            let m = fabs_branchless(normalized_exponential_delta(-e));
            assert!(m > last);
            assert_eq!(m, fabs_branchless(normalized_exponential_delta(e)));
            last = m;
        }
    }

    #[test]
    fn fabs_branchless_clears_sign_bit() {
        assert_eq!(fabs_branchless(-3.5), 3.5);
        assert_eq!(fabs_branchless(3.5), 3.5);
        assert_eq!(fabs_branchless(-0.0).to_bits(), 0.0_f32.to_bits());
        assert_eq!(fabs_branchless(f32::NEG_INFINITY), f32::INFINITY);
    }
}
