//! Browser bindings
//!
//! `CanvasSurface` paints through a canvas 2D context, `RafScheduler`
//! drives frames with `requestAnimationFrame`, and `PixelBackground` ties a
//! field to a canvas and the window's pointer and resize events.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::DVec2;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use crate::animator::{Animator, FrameScheduler};
use crate::color::Rgba;
use crate::error::BackdropError;
use crate::field::ParticleField;
use crate::renderer::{LinearGradient, Rect, Surface};
use crate::settings::{ColorOptions, FieldOptions, RippleOptions};
use crate::sim::RippleRequest;

impl From<BackdropError> for JsValue {
    fn from(err: BackdropError) -> Self {
        js_sys::Error::new(&format!("PixelBackground: {}", err)).into()
    }
}

/// A `<canvas>` and its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Fails when the canvas cannot provide a 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, BackdropError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(BackdropError::NoContext2d)?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn viewport(&self) -> DVec2 {
        web_sys::window()
            .and_then(|w| {
                let width = w.inner_width().ok()?.as_f64()?;
                let height = w.inner_height().ok()?.as_f64()?;
                Some(DVec2::new(width, height))
            })
            .unwrap_or_else(|| DVec2::new(self.canvas.width() as f64, self.canvas.height() as f64))
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn fill_gradient_rect(&mut self, rect: Rect, gradient: &LinearGradient) {
        let g = self.ctx.create_linear_gradient(
            gradient.start.x,
            gradient.start.y,
            gradient.end.x,
            gradient.end.y,
        );
        for stop in &gradient.stops {
            // Offsets are constants in [0, 1], so this cannot throw
            let _ = g.add_color_stop(stop.offset as f32, &stop.color.to_css());
        }
        self.ctx.set_fill_style_canvas_gradient(&g);
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }
}

type WebAnimator = Animator<CanvasSurface, RafScheduler>;

/// `requestAnimationFrame` with one long-lived callback
pub struct RafScheduler {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl RafScheduler {
    fn new(window: Window, animator: Weak<RefCell<WebAnimator>>) -> Self {
        let callback = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
            if let Some(animator) = animator.upgrade() {
                animator.borrow_mut().on_frame();
            }
        });
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn schedule(&mut self) -> Option<i32> {
        self.window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map_err(|e| log::error!("requestAnimationFrame failed: {:?}", e))
            .ok()
    }

    fn cancel(&mut self, handle: i32) {
        let _ = self.window.cancel_animation_frame(handle);
    }
}

/// Window listeners, removed again on drop
struct Listeners {
    window: Window,
    pointer_move: Closure<dyn FnMut(MouseEvent)>,
    resize: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listeners {
    fn bind(window: Window, animator: &Rc<RefCell<WebAnimator>>) -> Self {
        let weak = Rc::downgrade(animator);
        let pointer_move = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if let Some(animator) = weak.upgrade() {
                animator
                    .borrow_mut()
                    .field_mut()
                    .on_pointer_move(event.client_x() as f64, event.client_y() as f64);
            }
        });
        let _ = window.add_event_listener_with_callback(
            "mousemove",
            pointer_move.as_ref().unchecked_ref(),
        );

        let weak = Rc::downgrade(animator);
        let resize = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(animator) = weak.upgrade() {
                animator.borrow_mut().field_mut().on_resize();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());

        Self {
            window,
            pointer_move,
            resize,
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        let _ = self.window.remove_event_listener_with_callback(
            "mousemove",
            self.pointer_move.as_ref().unchecked_ref(),
        );
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref());
    }
}

/// Convert a JS value to JSON; `undefined`, `null` and unserializable values become `Null`
fn js_to_json(value: &JsValue) -> Value {
    if value.is_undefined() || value.is_null() {
        return Value::Null;
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}

/// Options group from a JS object, ignoring groups of the wrong shape
fn js_to_partial<T: serde::de::DeserializeOwned + Default>(value: &JsValue) -> T {
    serde_json::from_value(js_to_json(value)).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed options: {}", e);
        T::default()
    })
}

/// Pixel background bound to a canvas. Exported to JavaScript.
#[wasm_bindgen]
pub struct PixelBackground {
    animator: Rc<RefCell<WebAnimator>>,
    _listeners: Listeners,
}

#[wasm_bindgen]
impl PixelBackground {
    /// `new PixelBackground(canvas, options?)`. Throws when the canvas has
    /// no 2D context; option values never throw.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: JsValue) -> Result<PixelBackground, JsValue> {
        let field_options = FieldOptions::from_value(js_to_json(&options));
        Ok(Self::with_options(canvas, field_options)?)
    }
}

impl PixelBackground {
    /// Build from already parsed options; `data-*` attributes on the canvas
    /// fill whatever the options leave unset
    pub fn with_options(
        canvas: HtmlCanvasElement,
        mut field_options: FieldOptions,
    ) -> Result<Self, BackdropError> {
        let window = web_sys::window()
            .ok_or_else(|| BackdropError::MissingElement("window".to_string()))?;

        let dataset = canvas.dataset();
        field_options.fill_from_dataset(|key| dataset.get(key));

        let surface = CanvasSurface::new(canvas)?;
        let seed = js_sys::Date::now() as u64;
        let field = ParticleField::new(surface, &field_options, seed);

        let scheduler_window = window.clone();
        let animator = Rc::new_cyclic(|weak| {
            RefCell::new(Animator::new(field, RafScheduler::new(scheduler_window, weak.clone())))
        });
        let listeners = Listeners::bind(window, &animator);

        log::info!("PixelBackground created (seed {})", seed);
        Ok(Self {
            animator,
            _listeners: listeners,
        })
    }

    /// Rust-side ripple trigger for the page glue
    pub fn ripple(&self, request: RippleRequest) {
        self.animator.borrow_mut().field_mut().trigger_ripple(request);
    }

    /// Current viewport size as seen by the surface
    pub fn viewport(&self) -> DVec2 {
        self.animator.borrow().field().surface().viewport()
    }
}

#[wasm_bindgen]
impl PixelBackground {
    pub fn start(&self) {
        self.animator.borrow_mut().start();
    }

    pub fn stop(&self) {
        self.animator.borrow_mut().stop();
    }

    #[wasm_bindgen(js_name = triggerRipple)]
    pub fn trigger_ripple(&self, opts: JsValue) {
        let request = RippleRequest::from_value(&js_to_json(&opts));
        self.animator.borrow_mut().field_mut().trigger_ripple(request);
    }

    #[wasm_bindgen(js_name = setIntroCenter)]
    pub fn set_intro_center(&self, x: f64, y: f64) {
        self.animator.borrow_mut().field_mut().set_intro_center(x, y);
    }

    #[wasm_bindgen(js_name = setRippleOptions)]
    pub fn set_ripple_options(&self, partial: JsValue) {
        let partial: RippleOptions = js_to_partial(&partial);
        self.animator.borrow_mut().field_mut().set_ripple_options(&partial);
    }

    #[wasm_bindgen(js_name = setColors)]
    pub fn set_colors(&self, partial: JsValue) {
        let partial: ColorOptions = js_to_partial(&partial);
        self.animator.borrow_mut().field_mut().set_colors(&partial);
    }
}

impl Drop for PixelBackground {
    fn drop(&mut self) {
        if let Ok(mut animator) = self.animator.try_borrow_mut() {
            animator.stop();
        }
    }
}
