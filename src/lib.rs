//! Cascade network kernels.
//!
//! `cascade-net` computes forward and backward passes for a single *cascade* topology:
//! every neuron receives all raw inputs, a set of constant bias units and the outputs of
//! every neuron evaluated before it. The last `NUM_OUTPUT` neurons are the outputs.
//!
//! # Design goals
//!
//! - Compile-time shapes: the four shape parameters are const generics, and an invalid
//!   shape (`NUM_NEURONS < NUM_OUTPUT`) fails to build.
//! - Compact storage: weights are packed per neuron with a window that grows by one for
//!   each neuron, sized by the exact triangular sum.
//! - Allocation-free hot path: `forward`, `normalize_outputs` and `backward` work in a
//!   reusable [`ActivationBuffer`] owned by the caller.
//!
//! # Panics vs `Result`
//!
//! - Low-level hot path (infallible): [`CascadeNetwork::forward`],
//!   [`CascadeNetwork::normalize_outputs`], [`CascadeNetwork::backward`]. Every offset is
//!   fixed by the shape, so these never fail; floating-point overflow and NaN propagate.
//! - Boundary APIs return [`Result`]: [`ActivationBuffer::load_input`],
//!   [`CascadeNetwork::from_weights`], [`CascadeBuilder`] and serialization.
//!
//! # Memory layout
//!
//! - Scalars are `f32`.
//! - The activation buffer is `[input | bias | hidden | output]`, preceded by padding so
//!   the output zone starts on a 32-byte boundary and followed by padding to a full lane.
//! - Neuron `n` owns weights `[n * E + n * (n - 1) / 2, ..)` of length `E + n`, where
//!   `E = NUM_INPUT + NUM_ONES`; see [`shape::Window`].
//!
//! # Call order
//!
//! construct -> reset / load input -> forward -> (normalize) -> backward.
//! Skipping a step is not detected; it yields stale values.
//!
//! # Quick start
//!
//! ```rust
//! use cascade_net::CascadeNetwork;
//!
//! # fn main() -> cascade_net::Result<()> {
//! let net = CascadeNetwork::<2, 1, 3, 5>::new_with_seed(0);
//! let mut buf = net.scratch();
//!
//! buf.load_input(&[0.5, -0.5])?;
//! let out = net.forward(&mut buf);
//! assert_eq!(out.len(), 3);
//!
//! net.normalize_outputs(&mut buf);
//! let error = net.backward(&mut buf, &[1.0, 0.0, 0.5]);
//! assert!(error.is_finite() && error >= 0.0);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod buffer;
pub mod builder;
pub mod config;
pub mod error;
pub(crate) mod kernel;
pub mod network;
pub mod shape;
pub mod softmax;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use activation::Activation;
pub use buffer::ActivationBuffer;
pub use builder::CascadeBuilder;
pub use config::{CascadeConfig, GradientPolicy};
pub use error::{Error, Result};
pub use network::{CascadeNetwork, NET_SCALE};
pub use shape::{Shape, Window};
pub use softmax::Normalization;

#[cfg(feature = "serde")]
pub use serde_model::SerializedWeights;
