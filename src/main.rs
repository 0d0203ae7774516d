//! Pixel Backdrop entry point
//!
//! On the web this boots the landing page. Natively it runs the field
//! headless against a recording surface and logs what one frame draws.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
    }

    log::info!("Pixel Backdrop starting...");
    if let Err(e) = pixel_backdrop::platform::page::boot() {
        log::error!("Boot aborted: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAMES: usize = 240;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pixel_backdrop::{FieldOptions, ParticleField, RecordingSurface, RippleRequest};

    env_logger::init();
    log::info!("Pixel Backdrop (native) starting...");
    log::info!("Native mode renders headless - build for wasm32 to see it in a browser");

    let options = match std::env::args().nth(1) {
        Some(json) => match FieldOptions::from_json(&json) {
            Ok(options) => options,
            Err(e) => {
                log::error!("Bad options: {}", e);
                std::process::exit(2);
            }
        },
        None => FieldOptions::default(),
    };

    let mut field = ParticleField::new(RecordingSurface::new(800.0, 600.0), &options, 42);
    field.init_grid();
    field.on_pointer_move(400.0, 300.0);
    field.trigger_ripple(RippleRequest::at(400.0, 300.0));

    for frame in 0..HEADLESS_FRAMES {
        field.surface_mut().take_commands();
        field.render_frame();
        if frame % 60 == 0 {
            log::info!(
                "frame {:>3}: {} ripples, {} fills, {} gradients",
                frame,
                field.ripples().len(),
                field.surface().fills().count(),
                field.surface().gradients().count()
            );
        }
    }

    println!(
        "{} particles, {} ripples left after {} frames (t = {:.3})",
        field.particles().len(),
        field.ripples().len(),
        HEADLESS_FRAMES,
        field.time()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
