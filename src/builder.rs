//! Network builder.
//!
//! `CascadeBuilder` collects a [`CascadeConfig`] and then draws the initial weights.
//! The network shape is not part of the builder; it is chosen by the const parameters
//! of the `build_*` call (or inferred from the binding's type).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Activation, CascadeConfig, CascadeNetwork, GradientPolicy, Normalization, Result};

#[derive(Debug, Clone, Default)]
/// Builder for a `CascadeNetwork`.
///
/// Example:
///
/// ```rust
/// use cascade_net::{Activation, CascadeBuilder, CascadeNetwork, Normalization};
///
/// # fn main() -> cascade_net::Result<()> {
/// let net: CascadeNetwork<2, 1, 3, 5> = CascadeBuilder::new()
///     .activation(Activation::LeakyRectifier { alpha: 0.01 })?
///     .normalization(Normalization::Stable)
///     .build_with_seed(0)?;
/// # let _ = net;
/// # Ok(())
/// # }
/// ```
pub struct CascadeBuilder {
    config: CascadeConfig,
}

impl CascadeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: CascadeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Set the neuron activation.
    pub fn activation(mut self, activation: Activation) -> Result<Self> {
        activation.validate()?;
        self.config.activation = activation;
        Ok(self)
    }

    pub fn normalization(mut self, normalization: Normalization) -> Self {
        self.config.normalization = normalization;
        self
    }

    pub fn gradient_policy(mut self, gradient: GradientPolicy) -> Self {
        self.config.gradient = gradient;
        self
    }

    /// Build using a deterministic seed.
    pub fn build_with_seed<
        const NUM_INPUT: usize,
        const NUM_ONES: usize,
        const NUM_OUTPUT: usize,
        const NUM_NEURONS: usize,
    >(
        self,
        seed: u64,
    ) -> Result<CascadeNetwork<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.build_with_rng(&mut rng)
    }

    /// Build using the provided RNG.
    pub fn build_with_rng<
        const NUM_INPUT: usize,
        const NUM_ONES: usize,
        const NUM_OUTPUT: usize,
        const NUM_NEURONS: usize,
        R: Rng + ?Sized,
    >(
        self,
        rng: &mut R,
    ) -> Result<CascadeNetwork<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>> {
        self.config.validate()?;
        Ok(CascadeNetwork::with_config_and_rng(self.config, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_config() {
        let net: CascadeNetwork<2, 1, 1, 3> = CascadeBuilder::new()
            .activation(Activation::ElliotSig)
            .unwrap()
            .normalization(Normalization::Stable)
            .gradient_policy(GradientPolicy::Overwrite)
            .build_with_seed(0)
            .unwrap();

        let cfg = net.config();
        assert_eq!(cfg.activation, Activation::ElliotSig);
        assert_eq!(cfg.normalization, Normalization::Stable);
        assert_eq!(cfg.gradient, GradientPolicy::Overwrite);
    }

    #[test]
    fn builder_rejects_invalid_activation() {
        assert!(
            CascadeBuilder::new()
                .activation(Activation::LeakyRectifier { alpha: f32::NAN })
                .is_err()
        );
        assert!(
            CascadeBuilder::from_config(CascadeConfig {
                activation: Activation::LeakyRectifier { alpha: -0.5 },
                ..CascadeConfig::default()
            })
            .is_err()
        );
    }

    #[test]
    fn builder_seed_matches_direct_constructor() {
        let built: CascadeNetwork<3, 1, 2, 4> = CascadeBuilder::new().build_with_seed(42).unwrap();
        let direct = CascadeNetwork::<3, 1, 2, 4>::new_with_seed(42);
        assert_eq!(built.weights(), direct.weights());
    }
}
