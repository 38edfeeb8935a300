//! Scroll-linked visual effects for a portfolio page: particle strips that react to scroll
//! velocity, a section that pins and pans a card track sideways while the page scrolls, a
//! project detail overlay and a trailing cursor.
//!
//! The effect logic lives in plain Rust modules and is driven by timestamps and scroll offsets
//! passed in from outside. The `wasm` module wires it to the DOM.

pub mod aura;
pub mod content;
pub mod cursor;
pub mod error;
pub mod lifecycle;
pub mod modal;
pub mod particle;
pub mod pin;
pub mod settings;
pub mod velocity;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use error::Error;
pub use error::Result;
pub use settings::Settings;

/// Particles per strip in the default settings.
pub const PARTICLES_PER_SIDE: usize = 20;
