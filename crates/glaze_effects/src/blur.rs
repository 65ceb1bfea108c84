//! Separable Gaussian blur
//!
//! Blur radii are given in pixels and converted to a standard deviation the
//! same way common 2D renderers do (`σ = radius × 0.57735 + 0.5`). A radius of
//! zero is the identity.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::pixmap::{Pixmap, Rgba, TileMode};

const BLUR_SIGMA_SCALE: f32 = 0.577_35;

/// Convert a blur radius in pixels to a Gaussian standard deviation
pub fn radius_to_sigma(radius: f32) -> f32 {
    if radius > 0.0 {
        radius * BLUR_SIGMA_SCALE + 0.5
    } else {
        0.0
    }
}

/// Normalized 1D Gaussian weights for offsets `-radius..=radius`
#[derive(Clone, Debug, PartialEq)]
pub struct BlurKernel {
    radius: usize,
    weights: Vec<f32>,
}

impl BlurKernel {
    pub fn new(sigma: f32) -> Self {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Self {
                radius: 0,
                weights: vec![1.0],
            };
        }
        let radius = (sigma * 3.0).ceil() as usize;
        let denom = 2.0 * sigma * sigma;
        let mut weights: Vec<f32> = (0..=radius * 2)
            .map(|i| {
                let d = i as f32 - radius as f32;
                (-(d * d) / denom).exp()
            })
            .collect();
        let sum: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }
        Self { radius, weights }
    }

    /// Kernel for a blur radius in pixels
    pub fn for_radius(radius: f32) -> Self {
        Self::new(radius_to_sigma(radius))
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn is_identity(&self) -> bool {
        self.radius == 0
    }
}

/// Kernels keyed by the bit pattern of their blur radius
#[derive(Default, Debug)]
pub struct KernelCache {
    kernels: FxHashMap<u32, Arc<BlurKernel>>,
}

impl KernelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, radius: f32) -> Arc<BlurKernel> {
        self.kernels
            .entry(radius.to_bits())
            .or_insert_with(|| Arc::new(BlurKernel::for_radius(radius)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn clear(&mut self) {
        self.kernels.clear();
    }
}

/// Blur `src` with a radius in pixels
pub fn blur(src: &Pixmap, radius: f32, mode: TileMode) -> Pixmap {
    blur_with_kernel(src, &BlurKernel::for_radius(radius), mode)
}

/// Blur `src` with a prepared kernel (horizontal then vertical pass)
pub fn blur_with_kernel(src: &Pixmap, kernel: &BlurKernel, mode: TileMode) -> Pixmap {
    if kernel.is_identity() || src.is_empty() {
        return src.clone();
    }
    let horizontal = pass(src, kernel, mode, true);
    pass(&horizontal, kernel, mode, false)
}

fn pass(src: &Pixmap, kernel: &BlurKernel, mode: TileMode, horizontal: bool) -> Pixmap {
    let r = kernel.radius as i64;
    Pixmap::from_fn(src.width(), src.height(), |x, y| {
        let mut acc = Rgba::TRANSPARENT;
        for (i, w) in kernel.weights.iter().enumerate() {
            let offset = i as i64 - r;
            let p = if horizontal {
                src.pixel(x as i64 + offset, y as i64, mode)
            } else {
                src.pixel(x as i64, y as i64 + offset, mode)
            };
            acc = acc.add(p.scale(*w));
        }
        acc
    })
}
