//! Rendering module
//!
//! Canvas 2D drawing of bubbles, feedback effects and overlays. Label layout
//! is platform independent; the canvas backend is browser only.

pub mod label;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use label::wrap_label;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
