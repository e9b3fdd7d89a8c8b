//! Dot-product kernel used by the forward pass.
//!
//! This module provides a single abstraction over the inner product:
//! - default: a simple, safe fused-multiply-add loop
//! - optional: the `matrixmultiply` backend, driven as a `1 x k` by `k x 1` product

#[cfg(not(feature = "matrixmultiply"))]
#[inline]
pub(crate) fn dot_f32(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut acc = 0.0_f32;
    for (&x, &w) in a.iter().zip(b) {
        acc = x.mul_add(w, acc);
    }
    acc
}

#[cfg(feature = "matrixmultiply")]
#[inline]
pub(crate) fn dot_f32(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let k = a.len();
    if k == 0 {
        return 0.0;
    }

    let mut c = 0.0_f32;
    // SAFETY: `a` is a 1 x k row, `b` a k x 1 column and `c` a single cell;
    // every index sgemm touches stays inside those lengths.
    unsafe {
        matrixmultiply::sgemm(
            1,
            k,
            1,
            1.0,
            a.as_ptr(),
            k as isize,
            1,
            b.as_ptr(),
            1,
            1,
            0.0,
            &mut c,
            1,
            1,
        );
    }
    c
}
