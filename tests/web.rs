//! Browser-side lifecycle tests, run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use echoreads_particles::CursorField;

wasm_bindgen_test_configure!(run_in_browser);

fn make_canvas() -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document.create_element("canvas").unwrap();
    element.dyn_into::<web_sys::HtmlCanvasElement>().unwrap()
}

#[wasm_bindgen_test]
fn start_then_stop_round_trip() {
    let mut field = CursorField::attach(make_canvas(), true);
    assert!(!field.is_running());
    field.start();
    assert!(field.is_running());
    field.stop();
    assert!(!field.is_running());
    assert_eq!(field.particle_count(), 0);
}

#[wasm_bindgen_test]
fn stop_is_idempotent() {
    let mut field = CursorField::attach(make_canvas(), true);
    field.start();
    field.stop();
    field.stop();
    assert!(!field.is_running());
    assert_eq!(field.particle_count(), 0);
}

#[wasm_bindgen_test]
fn stop_without_start_is_harmless() {
    let mut field = CursorField::attach(make_canvas(), false);
    field.stop();
    assert!(!field.is_running());
}

#[wasm_bindgen_test]
fn restart_after_stop() {
    let mut field = CursorField::attach(make_canvas(), true);
    field.start();
    field.stop();
    field.start();
    assert!(field.is_running());
    field.stop();
}

#[wasm_bindgen_test]
fn repeated_start_stop_cycles_keep_working() {
    let mut field = CursorField::attach(make_canvas(), true);
    for _ in 0..5 {
        field.start();
        assert!(field.is_running());
        field.stop();
        assert!(!field.is_running());
        assert_eq!(field.particle_count(), 0);
    }
}

#[wasm_bindgen_test]
fn instances_do_not_interfere() {
    let mut first = CursorField::attach(make_canvas(), true);
    let mut second = CursorField::attach(make_canvas(), false);
    first.start();
    second.start();
    first.stop();
    assert!(!first.is_running());
    assert!(second.is_running());
    second.stop();
}

#[wasm_bindgen_test]
fn theme_can_change_while_running() {
    let mut field = CursorField::attach(make_canvas(), true);
    field.start();
    field.set_theme(false);
    field.set_theme(true);
    assert!(field.is_running());
    field.stop();
}
