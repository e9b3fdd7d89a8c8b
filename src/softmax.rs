//! Softmax-style output normalization.
//!
//! Both variants work in place on the output zone and never allocate.

use crate::activation::normalized_exponential;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How [`CascadeNetwork::normalize_outputs`](crate::CascadeNetwork::normalize_outputs)
/// transforms the output zone.
pub enum Normalization {
    /// `e^o / sum + max`: exponentiate, divide by the sum, then add back the largest raw
    /// output (tracked from `0.0`). The result is a shifted distribution, not a
    /// probability vector.
    #[default]
    AddBackMax,
    /// Conventional softmax, `e^(o - max) / sum`.
    Stable,
}

impl Normalization {
    #[inline]
    pub fn apply(self, out: &mut [f32]) {
        match self {
            Normalization::AddBackMax => add_back_max(out),
            Normalization::Stable => softmax_stable(out),
        }
    }
}

/// Exponentiate in place, divide by the sum and add back the largest raw value.
#[inline]
pub fn add_back_max(out: &mut [f32]) {
    let mut max = 0.0_f32;
    let mut sum = 0.0_f32;
    for o in out.iter_mut() {
        if *o > max {
            max = *o;
        }
        *o = normalized_exponential(*o);
        sum += *o;
    }
    for o in out.iter_mut() {
        *o = *o / sum + max;
    }
}

/// Max-subtracted softmax in place.
#[inline]
pub fn softmax_stable(out: &mut [f32]) {
    let Some(max) = out.iter().copied().reduce(f32::max) else {
        return;
    };
    let mut sum = 0.0_f32;
    for o in out.iter_mut() {
        *o = normalized_exponential(*o - max);
        sum += *o;
    }
    let inv_sum = 1.0 / sum;
    for o in out.iter_mut() {
        *o *= inv_sum;
    }
}
