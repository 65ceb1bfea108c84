//! Per-frame value sources
//!
//! A glass surface does not hold a fixed [`GlassStyle`](crate::GlassStyle);
//! it holds a [`Value`] that is resolved once per frame. This lets a host
//! derive the style from state that only exists at render time, most
//! importantly the luminance most recently published by the surface's own
//! sampler:
//!
//! ```rust
//! use glaze_core::value::{derived_value, ValueContext};
//! use glaze_core::{Color, GlassStyle};
//!
//! let style = derived_value(|ctx: &ValueContext| {
//!     let tint = if ctx.luminance > 0.5 { Color::BLACK } else { Color::WHITE };
//!     GlassStyle::new().tint(tint.with_alpha(0.1))
//! });
//!
//! let dark = style.get(&ValueContext { luminance: 0.2 });
//! assert_eq!(dark.material.tint.r, 1.0);
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

/// Context provided to value resolution at render time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueContext {
    /// Latest published luminance of the surface, in `[0, 1]`
    pub luminance: f32,
}

impl Default for ValueContext {
    fn default() -> Self {
        Self { luminance: 0.5 }
    }
}

/// A value that can be resolved at render time
pub trait Value<T>: Send + Sync {
    /// Resolve the current value
    fn get(&self, ctx: &ValueContext) -> T;

    /// Check if this is a static value (never changes)
    fn is_static(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Static Value
// ─────────────────────────────────────────────────────────────────────────────

/// A static value that never changes
#[derive(Clone)]
pub struct Static<T>(pub T);

impl<T: Clone + Send + Sync> Value<T> for Static<T> {
    fn get(&self, _ctx: &ValueContext) -> T {
        self.0.clone()
    }

    fn is_static(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Derived Value
// ─────────────────────────────────────────────────────────────────────────────

/// A value computed from a function
pub struct Derived<T, F>
where
    F: Fn(&ValueContext) -> T + Send + Sync,
{
    compute: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> Derived<T, F>
where
    F: Fn(&ValueContext) -> T + Send + Sync,
{
    pub fn new(compute: F) -> Self {
        Self {
            compute,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Value<T> for Derived<T, F>
where
    F: Fn(&ValueContext) -> T + Send + Sync,
{
    fn get(&self, ctx: &ValueContext) -> T {
        (self.compute)(ctx)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Boxed Value
// ─────────────────────────────────────────────────────────────────────────────

/// Type-erased value
pub type BoxedValue<T> = Arc<dyn Value<T>>;

/// Helper to create a boxed static value
pub fn static_value<T: Clone + Send + Sync + 'static>(value: T) -> BoxedValue<T> {
    Arc::new(Static(value))
}

/// Helper to create a boxed derived value
pub fn derived_value<T, F>(compute: F) -> BoxedValue<T>
where
    T: 'static,
    F: Fn(&ValueContext) -> T + Send + Sync + 'static,
{
    Arc::new(Derived::new(compute))
}
