//! Browser-based WASM tests.
//!
//! Run with: wasm-pack test --headless --chrome

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use glide_wasm::{Marquee, TiltCard, VisibilityGate};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen::closure::Closure;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement, window};

wasm_bindgen_test_configure!(run_in_browser);

// === Helper Functions ===

fn get_document() -> Document {
    window()
        .expect("no window")
        .document()
        .expect("no document")
}

fn create_element(parent: &HtmlElement, style: &str) -> HtmlElement {
    let element = get_document()
        .create_element("div")
        .expect("create div failed")
        .dyn_into::<HtmlElement>()
        .expect("not an HtmlElement");
    element.set_attribute("style", style).expect("set style");
    parent.append_child(&element).expect("append failed");
    element
}

fn body() -> HtmlElement {
    get_document().body().expect("no body")
}

fn marquee_fixture() -> (HtmlElement, HtmlElement, HtmlElement) {
    let container = create_element(&body(), "width: 1000px; overflow: hidden;");
    let strip = create_element(&container, "display: flex; width: max-content;");
    let sequence = create_element(&strip, "display: flex; width: 300px; height: 40px;");
    for _ in 0..3 {
        create_element(&sequence, "width: 100px; height: 40px;");
    }
    (container, strip, sequence)
}

// === Module ===

#[wasm_bindgen_test]
fn test_version() {
    let version = glide_wasm::version();
    assert!(!version.is_empty());
    assert!(version.contains('.'));
}

// === Marquee ===

#[wasm_bindgen_test]
fn test_marquee_fills_container_with_copies() {
    let (container, strip, sequence) = marquee_fixture();
    let mut marquee =
        Marquee::new(container.clone(), strip.clone(), sequence, 100.0, "left", None, None)
            .expect("marquee attaches");

    assert_eq!(marquee.copies(), 6);
    assert_eq!(strip.child_element_count(), 6);

    marquee.destroy();
    assert_eq!(strip.child_element_count(), 1);
    container.remove();
}

#[wasm_bindgen_test]
fn test_marquee_rejects_unknown_direction() {
    let (container, strip, sequence) = marquee_fixture();
    let result = Marquee::new(container.clone(), strip, sequence, 100.0, "diagonal", None, None);
    assert!(result.is_err());
    container.remove();
}

#[wasm_bindgen_test]
fn test_marquee_drag_writes_offset() {
    let (container, strip, sequence) = marquee_fixture();
    let marquee = Marquee::from_config(container.clone(), strip, sequence, "[track]\nspeed = 0.0\n")
        .expect("marquee attaches");

    marquee.pointer_down(500.0, 10.0, 0.0);
    marquee.pointer_move(460.0, 10.0, 100.0);
    assert!((marquee.offset() - 40.0).abs() < 1e-6);
    marquee.pointer_up();
    container.remove();
}

// === TiltCard ===

#[wasm_bindgen_test]
fn test_tilt_card_attaches_and_destroys() {
    let surface = create_element(&body(), "width: 300px; height: 300px;");
    let figure = create_element(&surface, "width: 300px; height: 300px;");
    let mut card = TiltCard::new(surface.clone(), figure.clone(), None, Some(10.0), None)
        .expect("card attaches");

    card.mouse_enter();
    card.mouse_move(0.0, 0.0);
    card.mouse_leave();
    card.destroy();
    assert_eq!(figure.style().get_property_value("transform").unwrap(), "");
    surface.remove();
}

#[wasm_bindgen_test]
fn test_tilt_card_rejects_bad_scale() {
    let surface = create_element(&body(), "width: 10px; height: 10px;");
    let figure = create_element(&surface, "");
    assert!(TiltCard::new(surface.clone(), figure, None, None, Some(-1.0)).is_err());
    surface.remove();
}

// === VisibilityGate ===

#[wasm_bindgen_test]
fn test_gate_counts_pending_elements() {
    let calls = Rc::new(Cell::new(0));
    let sink = Rc::clone(&calls);
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| sink.set(sink.get() + 1));
    let function: js_sys::Function = callback.as_ref().unchecked_ref::<js_sys::Function>().clone();

    let mut gate = VisibilityGate::new(function, None, None).expect("gate created");
    let target = create_element(&body(), "width: 10px; height: 10px;");
    assert!(!gate.observe(target.clone().into()));
    assert_eq!(gate.pending(), 1);

    // Not in the document yet: deferred, not fired.
    assert!(!gate.observe_selector("#glide-not-there".into()));
    assert_eq!(gate.pending(), 2);

    gate.disconnect();
    assert_eq!(calls.get(), 0);
    target.remove();
}

#[wasm_bindgen_test]
fn test_gate_watches_an_element_once() {
    let calls = Rc::new(Cell::new(0));
    let sink = Rc::clone(&calls);
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| sink.set(sink.get() + 1));
    let function: js_sys::Function = callback.as_ref().unchecked_ref::<js_sys::Function>().clone();

    let mut gate = VisibilityGate::new(function, None, None).expect("gate created");
    let target = create_element(&body(), "width: 10px; height: 10px;");
    target.set_id("glide-watched-twice");

    let first = gate.observe(target.clone().into());
    let second = gate.observe(target.clone().into());
    let by_selector = gate.observe_selector("#glide-watched-twice".into());

    // Either the observer is pending for one element, or the fallback
    // revealed it on the first call and never again.
    assert!(!second && !by_selector);
    if first {
        assert_eq!(gate.pending(), 0);
    } else {
        assert_eq!(gate.pending(), 1);
    }
    assert!(calls.get() <= 1);

    gate.disconnect();
    target.remove();
}
