//! The cascade network.
//!
//! In a cascade every upstream neuron feeds every downstream neuron. Neuron `n` receives
//! all raw inputs, all bias units and the activations of neurons `0..n`; each neuron is,
//! in effect, a single-unit layer of its own. The last `NUM_OUTPUT` neurons are the
//! outputs.
//!
//! Weights are packed neuron by neuron into one flat vector (see [`Window`]). The hot
//! path (`forward`, `normalize_outputs`, `backward`) works entirely inside a caller-owned
//! [`ActivationBuffer`] and never allocates.

use std::fmt;
use std::ops::{Index, IndexMut};

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activation::{fabs_branchless, normalized_exponential_delta};
use crate::kernel::dot_f32;
use crate::shape::{Shape, Window};
use crate::{ActivationBuffer, CascadeConfig, Error, Result};

/// Fixed scale applied to every neuron's net input before activation.
pub const NET_SCALE: f32 = 0.25;

/// Packed weights and runtime policy of one cascade; evaluation state lives in an [`ActivationBuffer`].
#[derive(Debug, Clone)]
pub struct CascadeNetwork<
    const NUM_INPUT: usize,
    const NUM_ONES: usize,
    const NUM_OUTPUT: usize,
    const NUM_NEURONS: usize,
> {
    weights: Vec<f32>,
    windows: [Window; NUM_NEURONS],
    config: CascadeConfig,
}

impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    CascadeNetwork<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>
{
    pub const WEIGHT_COUNT: usize = Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::WEIGHT_COUNT;
    pub const TOTAL_ACTIVATIONS: usize =
        Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::TOTAL_ACTIVATIONS;

    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(&mut rng)
    }

    /// Draw every weight independently from `[-1 + eps, 1 - eps]`, strictly inside `(-1, 1)`.
    pub fn new_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_config_and_rng(CascadeConfig::default(), rng)
    }

    /// `config` must already be validated.
    pub(crate) fn with_config_and_rng<R: Rng + ?Sized>(config: CascadeConfig, rng: &mut R) -> Self {
        let () = Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::VALID;

        let dist = Uniform::new_inclusive(-1.0 + f32::EPSILON, 1.0 - f32::EPSILON);
        let weights = (0..Self::WEIGHT_COUNT).map(|_| dist.sample(rng)).collect();

        log::debug!(
            "initialized cascade network: inputs={NUM_INPUT} ones={NUM_ONES} outputs={NUM_OUTPUT} neurons={NUM_NEURONS} weights={}",
            Self::WEIGHT_COUNT
        );

        Self {
            weights,
            windows: Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::windows(),
            config,
        }
    }

    /// Rebuild a network from a persisted weight vector.
    ///
    /// The vector must hold exactly `WEIGHT_COUNT` finite values in neuron order.
    pub fn from_weights(config: CascadeConfig, weights: Vec<f32>) -> Result<Self> {
        let () = Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::VALID;

        config.validate()?;
        if weights.len() != Self::WEIGHT_COUNT {
            log::warn!(
                "rejected weight vector of length {} (expected {})",
                weights.len(),
                Self::WEIGHT_COUNT
            );
            return Err(Error::InvalidShape(format!(
                "weights length {} does not match network weight count {}",
                weights.len(),
                Self::WEIGHT_COUNT
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            log::warn!("rejected weight vector containing non-finite values");
            return Err(Error::InvalidData(
                "weights must contain only finite values".to_owned(),
            ));
        }

        log::debug!(
            "restored cascade network: neurons={NUM_NEURONS} weights={}",
            Self::WEIGHT_COUNT
        );

        Ok(Self {
            weights,
            windows: Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::windows(),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[inline]
    pub fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weights
    }

    /// Connectivity table, one entry per neuron.
    #[inline]
    pub fn windows(&self) -> &[Window; NUM_NEURONS] {
        &self.windows
    }

    /// Weights of neuron `n`, ordered like the first `INPUT_ZONE_END + n` activations.
    #[inline]
    pub fn neuron_weights(&self, n: usize) -> &[f32] {
        &self.weights[self.windows[n].range()]
    }

    /// Allocate a fresh activation buffer for this shape.
    pub fn scratch(&self) -> ActivationBuffer<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS> {
        ActivationBuffer::new()
    }

    /// Forward pass.
    ///
    /// Reads the input and bias zones of `buffer`, fills the hidden and output zones in
    /// neuron order and returns the output zone. Each neuron takes the dot product of its
    /// weight window with every activation before it, scales it by [`NET_SCALE`] and
    /// applies the configured activation.
    pub fn forward<'a>(
        &self,
        buffer: &'a mut ActivationBuffer<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>,
    ) -> &'a [f32] {
        debug_assert_eq!(self.weights.len(), Self::WEIGHT_COUNT);

        let activation = self.config.activation;
        let all = buffer.all_mut();
        for window in &self.windows {
            let (history, rest) = all.split_at_mut(window.len);
            let net = dot_f32(history, &self.weights[window.range()]) * NET_SCALE;
            rest[0] = activation.forward(net);
        }
        buffer.output()
    }

    /// Normalize the output zone in place with the configured [`Normalization`](crate::Normalization).
    #[inline]
    pub fn normalize_outputs(
        &self,
        buffer: &mut ActivationBuffer<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>,
    ) {
        self.config.normalization.apply(buffer.output_mut());
    }

    /// Backward pass; returns the summed absolute output error.
    ///
    /// Walks the output zone in reverse against `desired`, writing
    /// `normalized_exponential_delta(actual - desired)` into each slot, then walks the
    /// hidden zone in reverse writing the activation derivative of each cached hidden
    /// activation. Slots are accumulated into or overwritten per the configured
    /// [`GradientPolicy`](crate::GradientPolicy). No weights are touched.
    ///
    /// Call after `forward` (and optionally `normalize_outputs`) on the same buffer.
    pub fn backward(
        &self,
        buffer: &mut ActivationBuffer<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>,
        desired: &[f32; NUM_OUTPUT],
    ) -> f32 {
        let policy = self.config.gradient;
        let activation = self.config.activation;

        let mut error = 0.0_f32;
        for (slot, &target) in buffer.output_mut().iter_mut().rev().zip(desired.iter().rev()) {
            let delta = normalized_exponential_delta(*slot - target);
            policy.apply(slot, delta);
            error += fabs_branchless(delta);
        }

        for slot in buffer.hidden_mut().iter_mut().rev() {
            let delta = activation.derivative(*slot);
            policy.apply(slot, delta);
        }

        error
    }
}

impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    Index<usize> for CascadeNetwork<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>
{
    type Output = f32;

    #[inline]
    fn index(&self, idx: usize) -> &f32 {
        &self.weights[idx]
    }
}

impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    IndexMut<usize> for CascadeNetwork<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>
{
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut f32 {
        &mut self.weights[idx]
    }
}

/// Whitespace-separated weights, newline terminated. Diagnostic only.
impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    fmt::Display for CascadeNetwork<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for w in &self.weights {
            write!(f, "{w} ")?;
        }
        writeln!(f)
    }
}
