//! Runtime policy for a cascade network.
//!
//! The shape is fixed by const generics; everything that can vary per instance lives
//! in [`CascadeConfig`].

use crate::{Activation, Normalization, Result};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// What the backward pass does with a buffer slot.
pub enum GradientPolicy {
    /// Add the error term onto whatever the slot holds (the activation, or an earlier
    /// contribution when several passes are summed).
    #[default]
    Accumulate,
    /// Replace the slot with the error term.
    Overwrite,
}

impl GradientPolicy {
    #[inline]
    pub fn apply(self, slot: &mut f32, delta: f32) {
        match self {
            GradientPolicy::Accumulate => *slot += delta,
            GradientPolicy::Overwrite => *slot = delta,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CascadeConfig {
    pub activation: Activation,
    pub normalization: Normalization,
    pub gradient: GradientPolicy,
}

impl CascadeConfig {
    pub fn validate(&self) -> Result<()> {
        self.activation.validate()
    }
}
