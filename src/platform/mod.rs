//! Browser platform layer
//!
//! - `web`: canvas surface, `requestAnimationFrame` scheduler, window
//!   listeners and the `PixelBackground` class exported to JavaScript
//! - `page`: boot glue for the landing page (intro cues, headline, icons)
//!
//! Both only exist on `wasm32`; everything they drive is platform-free.

#[cfg(target_arch = "wasm32")]
pub mod page;
#[cfg(target_arch = "wasm32")]
pub mod web;
