//! WASM bridge for AutoCanvas — exposes the forwarding canvas to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. A page creates one
//! `Canvas`, which inserts a `<canvas>` element into the body and keeps it
//! sized to the window unless explicit dimensions are given.

mod web;

pub use web::{WebContext, WebElement, WebHost, WebValue};

use autocanvas_core::{
    BoundMethod, ForwardingSurface, HostValue, Resolved, SurfaceConfig, SurfaceError, Target,
};
use js_sys::Array;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

type Surface = ForwardingSurface<WebHost>;

/// A canvas element and its 2D context behind one handle.
///
/// `width`, `height` and `style` go to the element; every other name goes
/// to the drawing context. `resize`, `clear` and `isAutoSized` belong to the
/// handle itself and are never shadowed.
#[wasm_bindgen]
pub struct Canvas {
    surface: Rc<RefCell<Surface>>,
    /// Window `resize` listener, removed again when the handle is freed.
    on_resize: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl Canvas {
    /// Create a canvas. Without both dimensions it tracks the window size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: JsValue, height: JsValue) -> Result<Canvas, JsValue> {
        let config = SurfaceConfig {
            width: WebValue(width).as_dimension(),
            height: WebValue(height).as_dimension(),
            ..SurfaceConfig::default()
        };
        Self::with_config(&config)
    }

    /// Create a canvas from a JSON options object:
    /// `{"width"?, "height"?, "context"?, "anchor"?}`.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<Canvas, JsValue> {
        let config = SurfaceConfig::from_json(json).map_err(|e| js_error(&e.to_string()))?;
        Self::with_config(&config)
    }

    /// Resize to `width` × `height`, or to the window when either is missing
    /// or not a positive number.
    pub fn resize(&self, width: JsValue, height: JsValue) {
        self.surface.borrow_mut().resize(
            WebValue(width).as_dimension(),
            WebValue(height).as_dimension(),
        );
    }

    /// Clear the whole canvas.
    pub fn clear(&self) {
        self.surface.borrow_mut().clear();
    }

    #[wasm_bindgen(getter, js_name = isAutoSized)]
    pub fn is_auto_sized(&self) -> bool {
        self.surface.borrow().is_auto_sized()
    }

    /// Read a forwarded member. Functions come back bound to their owner,
    /// so they can be stored and called later.
    #[wasm_bindgen(js_name = getProperty)]
    pub fn get_property(&self, name: &str) -> Result<JsValue, JsValue> {
        let resolved = self.surface.borrow().get(name);
        match resolved {
            Resolved::Value(value) => Ok(value.0),
            Resolved::Method(method) => self.bind(method),
        }
    }

    /// Write a forwarded member.
    #[wasm_bindgen(js_name = setProperty)]
    pub fn set_property(&self, name: &str, value: JsValue) -> Result<(), JsValue> {
        self.surface
            .borrow_mut()
            .set(name, WebValue(value))
            .map_err(to_js)
    }

    /// Call a forwarded method with the given arguments.
    pub fn call(&self, name: &str, args: Array) -> Result<JsValue, JsValue> {
        let args: Vec<WebValue> = args.iter().map(WebValue).collect();
        self.surface
            .borrow_mut()
            .invoke(name, &args)
            .map(|value| value.0)
            .map_err(to_js)
    }

    /// The underlying `<canvas>` element.
    pub fn element(&self) -> HtmlCanvasElement {
        self.surface.borrow().element().canvas().clone()
    }

    /// The underlying 2D drawing context.
    pub fn context(&self) -> CanvasRenderingContext2d {
        self.surface.borrow().context().context_2d().clone()
    }
}

impl Canvas {
    fn with_config(config: &SurfaceConfig) -> Result<Canvas, JsValue> {
        console_error_panic_hook_setup();

        let host = WebHost::new().map_err(to_js)?;
        let surface = Rc::new(RefCell::new(ForwardingSurface::new(host, config).map_err(to_js)?));

        let weak = Rc::downgrade(&surface);
        let on_resize = Closure::<dyn FnMut()>::new(move || on_window_resize(&weak));
        let listening = surface
            .borrow()
            .host()
            .window()
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
        if let Err(err) = listening {
            detach(&surface.borrow());
            return Err(err);
        }

        Ok(Canvas { surface, on_resize })
    }

    fn bind(&self, method: BoundMethod) -> Result<JsValue, JsValue> {
        let surface = self.surface.borrow();
        let function = match method.target() {
            Target::Surface => return Ok(own_method(Rc::downgrade(&self.surface), method)),
            Target::Element => web::bound_function(surface.element().canvas(), method.name()),
            Target::Context => web::bound_function(surface.context().context_2d(), method.name()),
        };
        function.map(JsValue::from).map_err(to_js)
    }
}

impl Drop for Canvas {
    fn drop(&mut self) {
        if let Ok(surface) = self.surface.try_borrow() {
            let listener = self.on_resize.as_ref().unchecked_ref();
            let removed = surface
                .host()
                .window()
                .remove_event_listener_with_callback("resize", listener);
            if let Err(err) = removed {
                log::warn!("failed to remove resize listener: {err:?}");
            }
        }
    }
}

/// Take the element back out of the document after a failed construction.
fn detach(surface: &Surface) {
    surface.element().canvas().remove();
}

fn on_window_resize(surface: &Weak<RefCell<Surface>>) {
    let Some(surface) = surface.upgrade() else {
        return;
    };
    match surface.try_borrow_mut() {
        Ok(mut surface) => {
            surface.handle_viewport_resize();
        }
        Err(_) => log::warn!("resize event while the canvas is busy, skipped"),
    }
}

/// Wrap one of the handle's own methods as a JS function that calls back
/// into the surface for as long as it is alive.
fn own_method(surface: Weak<RefCell<Surface>>, method: BoundMethod) -> JsValue {
    let callback = move |width: JsValue, height: JsValue| -> Result<JsValue, JsValue> {
        let surface = surface
            .upgrade()
            .ok_or_else(|| js_error("canvas has been freed"))?;
        let mut surface = surface.borrow_mut();
        surface
            .call(&method, &[WebValue(width), WebValue(height)])
            .map(|value| value.0)
            .map_err(to_js)
    };
    type OwnMethod = dyn FnMut(JsValue, JsValue) -> Result<JsValue, JsValue>;
    Closure::<OwnMethod>::new(callback).into_js_value()
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

fn to_js(err: SurfaceError) -> JsValue {
    js_error(&err.to_string())
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("AutoCanvas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn detach_removes_element_from_body() {
        let host = WebHost::new().unwrap();
        let surface = ForwardingSurface::new(host, &SurfaceConfig::sized(8, 8)).unwrap();
        let canvas = surface.element().canvas().clone();
        assert!(canvas.is_connected());

        detach(&surface);

        assert!(!canvas.is_connected());
    }
}
