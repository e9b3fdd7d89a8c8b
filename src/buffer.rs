//! Zoned activation buffer.
//!
//! One `ActivationBuffer` holds the live activations of one network evaluation:
//! raw inputs, the constant bias units, every hidden neuron and every output neuron,
//! stored back to back so that a neuron's whole input history is a prefix of [`all`].
//!
//! Storage is a heap block of 32-byte aligned lanes. A leading pad (never exposed)
//! shifts the zones so the output zone starts on a lane boundary, and the output zone
//! is padded up to a whole lane.
//!
//! Buffers are plain values: keep one per thread (or per task) and pass it to
//! [`CascadeNetwork::forward`](crate::CascadeNetwork::forward) explicitly. Several
//! buffers may evaluate the same network concurrently.
//!
//! [`all`]: ActivationBuffer::all

use std::fmt;

use crate::shape::{LANE, Shape};
use crate::{Error, Result};

#[repr(C, align(32))]
#[derive(Debug, Clone, Copy, Default)]
struct Lane([f32; LANE]);

/// Reusable scratch space for one network shape.
#[derive(Debug, Clone)]
pub struct ActivationBuffer<
    const NUM_INPUT: usize,
    const NUM_ONES: usize,
    const NUM_OUTPUT: usize,
    const NUM_NEURONS: usize,
> {
    lanes: Box<[Lane]>,
}

impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    ActivationBuffer<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>
{
    const PAD: usize = Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::LEADING_PADDING;
    const BIAS_START: usize = Self::PAD + NUM_INPUT;
    const HIDDEN_START: usize =
        Self::PAD + Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::INPUT_ZONE_END;
    const OUTPUT_START: usize =
        Self::PAD + Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::HIDDEN_ZONE_END;
    const END: usize =
        Self::PAD + Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::TOTAL_ACTIVATIONS;

    /// Allocate a buffer with the input zone zeroed and the bias zone set to `1.0`.
    pub fn new() -> Self {
        let () = Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::VALID;

        let physical = Shape::<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>::PHYSICAL_LEN;
        let mut buffer = Self {
            lanes: vec![Lane::default(); physical / LANE].into_boxed_slice(),
        };
        buffer.reset();
        buffer
    }

    /// Zero the input zone and refill the bias zone with `1.0`.
    ///
    /// Hidden and output zones are left untouched; the forward pass overwrites them.
    #[inline]
    pub fn reset(&mut self) {
        let raw = self.raw_mut();
        raw[Self::PAD..Self::BIAS_START].fill(0.0);
        raw[Self::BIAS_START..Self::HIDDEN_START].fill(1.0);
    }

    /// Copy `input` into the input zone and restore the bias zone.
    pub fn load_input(&mut self, input: &[f32]) -> Result<()> {
        if input.len() != NUM_INPUT {
            return Err(Error::InvalidShape(format!(
                "input len {} does not match network input count {NUM_INPUT}",
                input.len()
            )));
        }
        self.input_mut().copy_from_slice(input);
        self.raw_mut()[Self::BIAS_START..Self::HIDDEN_START].fill(1.0);
        Ok(())
    }

    /// Raw inputs, excluding bias.
    #[inline]
    pub fn input(&self) -> &[f32] {
        &self.raw()[Self::PAD..Self::BIAS_START]
    }

    #[inline]
    pub fn input_mut(&mut self) -> &mut [f32] {
        &mut self.raw_mut()[Self::PAD..Self::BIAS_START]
    }

    #[inline]
    pub fn bias(&self) -> &[f32] {
        &self.raw()[Self::BIAS_START..Self::HIDDEN_START]
    }

    /// Raw inputs followed by the bias units.
    #[inline]
    pub fn input_with_bias(&self) -> &[f32] {
        &self.raw()[Self::PAD..Self::HIDDEN_START]
    }

    #[inline]
    pub fn hidden(&self) -> &[f32] {
        &self.raw()[Self::HIDDEN_START..Self::OUTPUT_START]
    }

    #[inline]
    pub fn hidden_mut(&mut self) -> &mut [f32] {
        &mut self.raw_mut()[Self::HIDDEN_START..Self::OUTPUT_START]
    }

    /// Output activations (logical length `NUM_OUTPUT`).
    #[inline]
    pub fn output(&self) -> &[f32] {
        &self.raw()[Self::OUTPUT_START..Self::END]
    }

    #[inline]
    pub fn output_mut(&mut self) -> &mut [f32] {
        &mut self.raw_mut()[Self::OUTPUT_START..Self::END]
    }

    /// Output zone including its lane padding; starts 32-byte aligned.
    #[inline]
    pub fn output_padded(&self) -> &[f32] {
        &self.raw()[Self::OUTPUT_START..]
    }

    /// Hidden followed by output activations, in neuron order.
    #[inline]
    pub fn neurons(&self) -> &[f32] {
        &self.raw()[Self::HIDDEN_START..Self::END]
    }

    #[inline]
    pub fn neurons_mut(&mut self) -> &mut [f32] {
        &mut self.raw_mut()[Self::HIDDEN_START..Self::END]
    }

    /// Every activation from the first raw input to the last output neuron.
    #[inline]
    pub fn all(&self) -> &[f32] {
        &self.raw()[Self::PAD..Self::END]
    }

    #[inline]
    pub fn all_mut(&mut self) -> &mut [f32] {
        &mut self.raw_mut()[Self::PAD..Self::END]
    }

    #[inline]
    fn raw(&self) -> &[f32] {
        // SAFETY: `Lane` is `repr(C)` over `[f32; LANE]` and has no padding, so the
        // lane slice is exactly `lanes.len() * LANE` contiguous, initialized `f32`s.
        unsafe { std::slice::from_raw_parts(self.lanes.as_ptr().cast::<f32>(), self.lanes.len() * LANE) }
    }

    #[inline]
    fn raw_mut(&mut self) -> &mut [f32] {
        // SAFETY: see `raw`; the unique borrow of `self` guarantees exclusive access.
        unsafe {
            std::slice::from_raw_parts_mut(
                self.lanes.as_mut_ptr().cast::<f32>(),
                self.lanes.len() * LANE,
            )
        }
    }
}

impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    Default for ActivationBuffer<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>
{
    fn default() -> Self {
        Self::new()
    }
}

/// Whitespace-separated activations, newline terminated. Diagnostic only.
impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    fmt::Display for ActivationBuffer<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in self.all() {
            write!(f, "{v} ")?;
        }
        writeln!(f)
    }
}
