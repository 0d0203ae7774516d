//! Landing page boot
//!
//! Starts the background on `#bg-layer`, plays the intro cues against the
//! input box and colors the project icons. Missing page elements only skip
//! their feature; a missing canvas aborts boot.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement};

use crate::error::BackdropError;
use crate::intro::{IntroCue, IntroTimeline, Typewriter, target_center};
use crate::projects::{ICON_FONT, ICON_TEXT_COLOR, icon_color, icon_letter};
use crate::settings::FieldOptions;

use super::web::PixelBackground;

const CANVAS_ID: &str = "bg-layer";

thread_local! {
    static BACKGROUND: RefCell<Option<Rc<PixelBackground>>> = const { RefCell::new(None) };
}

/// Boot the page. Keeps the background alive for the page's lifetime.
pub fn boot() -> Result<(), BackdropError> {
    let window = web_sys::window()
        .ok_or_else(|| BackdropError::MissingElement("window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| BackdropError::MissingElement("document".to_string()))?;

    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| BackdropError::MissingElement(format!("#{}", CANVAS_ID)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| BackdropError::NotACanvas(format!("#{}", CANVAS_ID)))?;

    let background = Rc::new(PixelBackground::with_options(canvas, FieldOptions::default())?);
    background.start();
    BACKGROUND.with(|slot| *slot.borrow_mut() = Some(background.clone()));

    let input_rect = document
        .query_selector(".workspace-input-wrap")
        .ok()
        .flatten()
        .map(|el| {
            let r = el.get_bounding_client_rect();
            (r.left(), r.top(), r.width(), r.height())
        });
    let target = target_center(input_rect, background.viewport() / 2.0);
    schedule_intro(IntroTimeline::centered_on(target));

    let mut rng = Pcg32::seed_from_u64(js_sys::Date::now() as u64);
    paint_project_icons(&document, &mut rng);

    log::info!("Page booted, intro aimed at ({:.0}, {:.0})", target.x, target.y);
    Ok(())
}

fn with_background(f: impl FnOnce(&PixelBackground)) {
    BACKGROUND.with(|slot| {
        if let Some(background) = slot.borrow().as_ref() {
            f(background);
        }
    });
}

/// Run `f` after `delay_ms` via `setTimeout`
fn set_timeout(delay_ms: f64, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms as i32,
    ) {
        log::warn!("setTimeout failed: {:?}", e);
    }
}

fn schedule_intro(timeline: IntroTimeline) {
    for scheduled in timeline.cues() {
        let cue = scheduled.cue;
        set_timeout(scheduled.at_ms, move || run_cue(cue));
    }
}

fn run_cue(cue: IntroCue) {
    match cue {
        IntroCue::Ripple(request) => with_background(|bg| bg.ripple(request)),
        IntroCue::AimIntroWave(center) => {
            with_background(|bg| bg.set_intro_center(center.x, center.y))
        }
        IntroCue::RevealHeadline => {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                reveal_headline(&document);
            }
        }
    }
}

fn swap_fade_in(el: &Element) {
    let classes = el.class_list();
    let _ = classes.remove_1("intro-hidden");
    let _ = classes.add_1("intro-fade-in");
}

fn reveal_headline(document: &Document) {
    if let Some(intro) = document.get_element_by_id("intro-container") {
        let _ = intro.class_list().add_1("active");
    }

    let Some(hero) = document.query_selector(".workspace-hero").ok().flatten() else {
        log::debug!("No .workspace-hero, skipping headline");
        return;
    };
    swap_fade_in(&hero);

    let Some(h1) = hero.query_selector("h1").ok().flatten() else {
        return;
    };
    h1.set_text_content(Some(""));
    let _ = h1.class_list().add_1("typewriter");

    let input_wrap = document.query_selector(".workspace-input-wrap").ok().flatten();
    let rng = Pcg32::seed_from_u64(js_sys::Date::now() as u64 ^ 0x9e37_79b9);
    type_step(
        h1,
        Typewriter::headline(rng),
        Box::new(move || {
            if let Some(wrap) = input_wrap {
                swap_fade_in(&wrap);
                let input = wrap
                    .query_selector(".workspace-input")
                    .ok()
                    .flatten()
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok());
                if let Some(input) = input {
                    let _ = input.focus();
                }
            }
        }),
    );
}

fn type_step(el: Element, mut writer: Typewriter, on_done: Box<dyn FnOnce()>) {
    let Some(step) = writer.next() else {
        on_done();
        return;
    };
    el.set_text_content(Some(&step.shown));
    match step.delay_ms {
        Some(delay) => set_timeout(delay, move || type_step(el, writer, on_done)),
        None => on_done(),
    }
}

fn paint_project_icons(document: &Document, rng: &mut Pcg32) {
    let Ok(items) = document.query_selector_all(".project-item") else {
        return;
    };
    for index in 0..items.length() {
        let Some(item) = items.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let icon = item
            .query_selector(".project-icon")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let name = item.query_selector(".project-name").ok().flatten();
        let (Some(icon), Some(name)) = (icon, name) else {
            continue;
        };

        let letter = icon_letter(&name.text_content().unwrap_or_default());
        icon.set_text_content(Some(&letter));
        let style = icon.style();
        let _ = style.set_property("background-color", icon_color(index as usize, rng));
        let _ = style.set_property("color", ICON_TEXT_COLOR);
        let _ = style.set_property("font-family", ICON_FONT);
    }
}

