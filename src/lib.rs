//! Spinning pyramid rendered with OpenGL through glow.
//!
//! The library holds the GPU side: mesh upload, shader build, animation and
//! the per-frame draw. Window and context creation live in the binary.

pub mod engine;

pub use engine::{DemoConfig, DemoError, GlBackend, RenderContext};
