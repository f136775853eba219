//! # glide-wasm
//!
//! Browser bindings for the glide motion engines, compiled to WebAssembly.
//!
//! Each handle attaches to existing DOM elements, drives its engine from
//! `requestAnimationFrame` and writes only `transform`/`opacity` styles.
//! Layout is read when sizes change or a pointer sample arrives, never in the
//! middle of writing a frame.
//!
//! ## Quick Start (JavaScript)
//!
//! ```javascript
//! import init, { Marquee, TiltCard, VisibilityGate } from 'glide-wasm';
//!
//! await init();
//!
//! const logos = new Marquee(container, strip, sequence, 120, "left", undefined, true);
//! strip.addEventListener("pointerdown", (e) =>
//!     logos.pointerDown(e.clientX, e.clientY, e.timeStamp));
//!
//! const card = new TiltCard(figure, inner, caption);
//! figure.addEventListener("mousemove", (e) => card.mouseMove(e.clientX, e.clientY));
//!
//! const gate = new VisibilityGate((el) => el.classList.add("revealed"));
//! document.querySelectorAll("section").forEach((s) => gate.observe(s));
//! ```
//!
//! ## Available APIs
//!
//! - `Marquee` - looping track with hover speed, drag and momentum
//! - `TiltCard` - spring-damped pointer tilt with touch grace period
//! - `VisibilityGate` - fire-once "became visible" callbacks
//! - `prefersReducedMotion()` - the user's motion preference

#![forbid(unsafe_code)]

// Use wee_alloc for smaller binaries (optional)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

mod marquee;
mod scheduler;
mod tilt_card;
mod visibility;

use wasm_bindgen::prelude::*;

pub use marquee::Marquee;
pub use scheduler::{FrameDriver, RafScheduler, timestamp};
pub use tilt_card::TiltCard;
pub use visibility::VisibilityGate;

/// Installs the panic hook when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Module version information.
#[must_use]
#[wasm_bindgen(js_name = "version")]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Whether the user asked for reduced motion.
#[must_use]
#[wasm_bindgen(js_name = "prefersReducedMotion")]
pub fn prefers_reduced_motion() -> bool {
    web_sys::window().is_some_and(|window| scheduler::prefers_reduced_motion(&window))
}

/// Converts a configuration error into a JS exception value.
pub(crate) fn to_js_error(err: glide::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
