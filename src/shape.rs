//! Compile-time shape arithmetic.
//!
//! A cascade is described by four const parameters:
//!
//! - `NUM_INPUT`: raw inputs written by the caller
//! - `NUM_ONES`: constant bias units (typically 1)
//! - `NUM_OUTPUT`: trailing neurons whose activations form the output
//! - `NUM_NEURONS`: all neurons, output neurons included
//!
//! Activations are laid out as `[padding | input | bias | hidden | output (padded)]`.
//! Neuron `n` reads the first `INPUT_ZONE_END + n` activations, so each neuron owns a
//! weight window one longer than its predecessor.

/// Floats per vector register (256-bit).
pub const LANE: usize = 8;

#[inline]
pub const fn roundup_multiple(i: usize, m: usize) -> usize {
    i.div_ceil(m) * m
}

/// Weight sub-range owned by one neuron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    /// Index of the neuron's first weight in the packed weight vector.
    pub weight_offset: usize,
    /// Number of activations (and weights) the neuron consumes.
    pub len: usize,
}

impl Window {
    #[inline]
    pub fn range(self) -> std::ops::Range<usize> {
        self.weight_offset..self.weight_offset + self.len
    }
}

/// Zero-sized carrier of the derived extents for one network shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shape<
    const NUM_INPUT: usize,
    const NUM_ONES: usize,
    const NUM_OUTPUT: usize,
    const NUM_NEURONS: usize,
>;

impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    Shape<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>
{
    /// Evaluated by every constructor; an invalid shape fails to build.
    ///
    /// ```
    /// use cascade_net::{ActivationBuffer, CascadeNetwork};
    ///
    /// // As many neurons as outputs: no hidden neurons, still valid.
    /// let net = CascadeNetwork::<1, 1, 3, 3>::new_with_seed(0);
    /// let _buf: ActivationBuffer<1, 1, 3, 3> = net.scratch();
    /// ```
    ///
    /// Fewer neurons than outputs is rejected for buffers:
    ///
    /// ```compile_fail
    /// let _ = cascade_net::ActivationBuffer::<1, 1, 3, 2>::new();
    /// ```
    ///
    /// and for networks:
    ///
    /// ```compile_fail
    /// let _ = cascade_net::CascadeNetwork::<1, 1, 3, 2>::new_with_seed(0);
    /// ```
    pub const VALID: () = assert!(
        NUM_NEURONS >= NUM_OUTPUT,
        "number of neurons needs to be equal or larger than the number of required outputs"
    );

    pub const INPUT_ZONE_END: usize = NUM_INPUT + NUM_ONES;
    pub const HIDDEN_ZONE_END: usize = Self::INPUT_ZONE_END + NUM_NEURONS - NUM_OUTPUT;
    pub const TOTAL_ACTIVATIONS: usize = Self::INPUT_ZONE_END + NUM_NEURONS;

    /// Exact triangular sum of all window lengths.
    pub const WEIGHT_COUNT: usize =
        NUM_NEURONS * Self::INPUT_ZONE_END + NUM_NEURONS * NUM_NEURONS.saturating_sub(1) / 2;

    /// Padding in front of the input zone so the output zone starts on a lane boundary.
    pub const LEADING_PADDING: usize =
        roundup_multiple(Self::HIDDEN_ZONE_END, LANE) - Self::HIDDEN_ZONE_END;
    pub const OUTPUT_PADDED: usize = roundup_multiple(NUM_OUTPUT, LANE);
    pub const PHYSICAL_LEN: usize =
        Self::LEADING_PADDING + Self::HIDDEN_ZONE_END + Self::OUTPUT_PADDED;

    /// Weight window of neuron `n`.
    #[inline]
    pub const fn window(n: usize) -> Window {
        Window {
            weight_offset: n * Self::INPUT_ZONE_END + n * n.saturating_sub(1) / 2,
            len: Self::INPUT_ZONE_END + n,
        }
    }

    /// Connectivity table: one window per neuron, in evaluation order.
    pub fn windows() -> [Window; NUM_NEURONS] {
        std::array::from_fn(Self::window)
    }
}
