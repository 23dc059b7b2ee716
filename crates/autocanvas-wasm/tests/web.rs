//! Browser tests: the exported `Canvas` against a real DOM.
//!
//! Run with `wasm-pack test --headless --firefox crates/autocanvas-wasm`.

#![cfg(target_arch = "wasm32")]

use autocanvas_core::HostValue;
use autocanvas_wasm::{Canvas, WebValue};
use js_sys::{Array, Function};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn window_size() -> (u32, u32) {
    let window = web_sys::window().unwrap();
    let width = window.inner_width().unwrap().as_f64().unwrap() as u32;
    let height = window.inner_height().unwrap().as_f64().unwrap() as u32;
    (width, height)
}

#[wasm_bindgen_test]
fn auto_sized_canvas_matches_window() {
    let canvas = Canvas::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    let element = canvas.element();
    assert!(canvas.is_auto_sized());
    assert_eq!((element.width(), element.height()), window_size());
}

#[wasm_bindgen_test]
fn explicit_size_is_exact() {
    let canvas = Canvas::new(JsValue::from(400), JsValue::from(300)).unwrap();
    assert!(!canvas.is_auto_sized());
    assert_eq!(canvas.get_property("width").unwrap().as_f64(), Some(400.0));
    assert_eq!(canvas.get_property("height").unwrap().as_f64(), Some(300.0));
}

#[wasm_bindgen_test]
fn canvas_is_attached_to_body() {
    let canvas = Canvas::new(JsValue::from(10), JsValue::from(10)).unwrap();
    let body = web_sys::window().unwrap().document().unwrap().body().unwrap();
    let element = canvas.element();
    let node: &web_sys::Node = &element;
    assert!(body.contains(Some(node)));
}

#[wasm_bindgen_test]
fn context_properties_round_trip() {
    let canvas = Canvas::new(JsValue::from(10), JsValue::from(10)).unwrap();
    canvas.set_property("lineWidth", JsValue::from(3)).unwrap();
    assert_eq!(canvas.context().line_width(), 3.0);
}

#[wasm_bindgen_test]
fn style_goes_to_element() {
    let canvas = Canvas::new(JsValue::from(10), JsValue::from(10)).unwrap();
    canvas.set_property("style", JsValue::from_str("display: block")).unwrap();
    assert_eq!(canvas.element().style().get_property_value("display").unwrap(), "block");
}

#[wasm_bindgen_test]
fn detached_method_keeps_receiver() {
    let canvas = Canvas::new(JsValue::from(20), JsValue::from(20)).unwrap();
    let fill_rect: Function = canvas.get_property("fillRect").unwrap().dyn_into().unwrap();
    canvas.set_property("fillStyle", JsValue::from_str("#ff0000")).unwrap();

    let args = Array::of4(&0.into(), &0.into(), &20.into(), &20.into());
    fill_rect.apply(&JsValue::UNDEFINED, &args).unwrap();

    let pixel = canvas.context().get_image_data(5.0, 5.0, 1.0, 1.0).unwrap().data();
    assert_eq!(pixel[0], 255);
    assert_eq!(pixel[3], 255);
}

#[wasm_bindgen_test]
fn own_methods_are_callable_from_script() {
    let canvas = Canvas::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    let resize: Function = canvas.get_property("resize").unwrap().dyn_into().unwrap();
    resize.call2(&JsValue::NULL, &JsValue::from(64), &JsValue::from(48)).unwrap();
    assert!(!canvas.is_auto_sized());
    assert_eq!(canvas.element().width(), 64);
    assert_eq!(canvas.element().height(), 48);
}

#[wasm_bindgen_test]
fn own_members_cannot_be_assigned() {
    let canvas = Canvas::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    assert!(canvas.set_property("isAutoSized", JsValue::FALSE).is_err());
    assert!(canvas.is_auto_sized());
}

#[wasm_bindgen_test]
fn fixed_canvas_ignores_window_resize_event() {
    let canvas = Canvas::new(JsValue::from(40), JsValue::from(30)).unwrap();
    let event = web_sys::Event::new("resize").unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();
    assert_eq!((canvas.element().width(), canvas.element().height()), (40, 30));
}

#[wasm_bindgen_test]
fn auto_sized_canvas_reacts_to_window_resize_event() {
    let canvas = Canvas::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    canvas.element().set_width(1);
    let event = web_sys::Event::new("resize").unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();
    assert_eq!((canvas.element().width(), canvas.element().height()), window_size());
}

#[wasm_bindgen_test]
fn call_reports_missing_methods() {
    let canvas = Canvas::new(JsValue::from(10), JsValue::from(10)).unwrap();
    assert!(canvas.call("drawUnicorn", Array::new()).is_err());
    let rect = Array::of4(&0.into(), &0.into(), &10.into(), &10.into());
    assert!(canvas.call("clearRect", rect).unwrap().is_undefined());
}

#[wasm_bindgen_test]
fn config_json_selects_size() {
    let canvas = Canvas::from_config(r#"{"width": 12, "height": 34}"#).unwrap();
    assert_eq!((canvas.element().width(), canvas.element().height()), (12, 34));
    assert!(Canvas::from_config("not json").is_err());
}

#[wasm_bindgen_test]
fn dimensions_from_script_values() {
    assert_eq!(WebValue(JsValue::from(300)).as_dimension(), Some(300));
    assert_eq!(WebValue(JsValue::from(0)).as_dimension(), None);
    assert_eq!(WebValue(JsValue::from_str("300")).as_dimension(), None);
    assert_eq!(WebValue(JsValue::NULL).as_dimension(), None);
}
