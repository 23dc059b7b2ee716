//! Browser host built on `web-sys`.
//!
//! The element is an `HtmlCanvasElement`, the context a
//! `CanvasRenderingContext2d`. Dynamic member access goes through
//! `js_sys::Reflect` so any property the browser exposes can be forwarded.

use autocanvas_core::{
    DrawingContext, Host, HostValue, Insertion, Member, PropertyHost, Size, SurfaceElement,
    SurfaceError, dimension_from_f64,
};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

/// A script value held by the browser host.
#[derive(Debug, Clone)]
pub struct WebValue(pub JsValue);

impl From<JsValue> for WebValue {
    fn from(value: JsValue) -> Self {
        WebValue(value)
    }
}

impl HostValue for WebValue {
    fn undefined() -> Self {
        WebValue(JsValue::UNDEFINED)
    }

    fn from_bool(b: bool) -> Self {
        WebValue(JsValue::from_bool(b))
    }

    fn as_dimension(&self) -> Option<u32> {
        self.0.as_f64().and_then(dimension_from_f64)
    }
}

/// Convert a thrown script value into a surface error.
pub(crate) fn host_error(err: JsValue) -> SurfaceError {
    let message = err
        .as_string()
        .or_else(|| err.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{err:?}"));
    SurfaceError::Host(message)
}

// ─── Reflect helpers ────────────────────────────────────────────────────

fn read_member(receiver: &JsValue, name: &str) -> Member<WebValue> {
    match Reflect::get(receiver, &JsValue::from_str(name)) {
        Ok(value) if value.is_function() => Member::Method,
        Ok(value) => Member::Data(WebValue(value)),
        Err(err) => {
            log::warn!("reading `{name}` failed: {err:?}");
            Member::Data(WebValue::undefined())
        }
    }
}

fn write_member(receiver: &JsValue, name: &str, value: WebValue) -> Result<(), SurfaceError> {
    Reflect::set(receiver, &JsValue::from_str(name), &value.0)
        .map(|_| ())
        .map_err(host_error)
}

fn function_member(receiver: &JsValue, name: &str) -> Result<Function, SurfaceError> {
    Reflect::get(receiver, &JsValue::from_str(name))
        .map_err(host_error)?
        .dyn_into::<Function>()
        .map_err(|_| SurfaceError::NotCallable(name.to_string()))
}

fn invoke_member(
    receiver: &JsValue,
    name: &str,
    args: &[WebValue],
) -> Result<WebValue, SurfaceError> {
    let function = function_member(receiver, name)?;
    let args: Array = args.iter().map(|arg| &arg.0).collect();
    function.apply(receiver, &args).map(WebValue).map_err(host_error)
}

/// Look up `name` on `receiver` and bind it, so the returned function keeps
/// its receiver when called from script later on.
pub(crate) fn bound_function(receiver: &JsValue, name: &str) -> Result<Function, SurfaceError> {
    Ok(function_member(receiver, name)?.bind(receiver))
}

// ─── Element ────────────────────────────────────────────────────────────

pub struct WebElement {
    canvas: HtmlCanvasElement,
}

impl WebElement {
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl PropertyHost for WebElement {
    type Value = WebValue;

    fn member(&self, name: &str) -> Member<WebValue> {
        read_member(&self.canvas, name)
    }

    fn set_member(&mut self, name: &str, value: WebValue) -> Result<(), SurfaceError> {
        write_member(&self.canvas, name, value)
    }

    fn invoke(&mut self, name: &str, args: &[WebValue]) -> Result<WebValue, SurfaceError> {
        invoke_member(&self.canvas, name, args)
    }
}

impl SurfaceElement for WebElement {
    fn size(&self) -> Size {
        Size::new(self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, size: Size) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }
}

// ─── Context ────────────────────────────────────────────────────────────

pub struct WebContext {
    ctx: CanvasRenderingContext2d,
}

impl WebContext {
    pub fn context_2d(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl PropertyHost for WebContext {
    type Value = WebValue;

    fn member(&self, name: &str) -> Member<WebValue> {
        read_member(&self.ctx, name)
    }

    fn set_member(&mut self, name: &str, value: WebValue) -> Result<(), SurfaceError> {
        write_member(&self.ctx, name, value)
    }

    fn invoke(&mut self, name: &str, args: &[WebValue]) -> Result<WebValue, SurfaceError> {
        invoke_member(&self.ctx, name, args)
    }
}

impl DrawingContext for WebContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }
}

// ─── Host ───────────────────────────────────────────────────────────────

pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// Host for the current browsing context.
    pub fn new() -> Result<Self, SurfaceError> {
        let window =
            web_sys::window().ok_or_else(|| SurfaceError::Host("no global window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SurfaceError::Host("window has no document".into()))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

fn inner_dimension(value: Result<JsValue, JsValue>) -> u32 {
    value
        .ok()
        .and_then(|v| v.as_f64())
        .map_or(0, |n| n.clamp(0.0, u32::MAX as f64) as u32)
}

impl Host for WebHost {
    type Value = WebValue;
    type Element = WebElement;
    type Context = WebContext;

    fn create_element(&self) -> Result<WebElement, SurfaceError> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(host_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SurfaceError::Host("created element is not a canvas".into()))?;
        Ok(WebElement { canvas })
    }

    fn create_context(&self, element: &WebElement, kind: &str) -> Result<WebContext, SurfaceError> {
        let ctx = element
            .canvas
            .get_context(kind)
            .map_err(host_error)?
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| SurfaceError::ContextUnavailable(kind.to_string()))?;
        Ok(WebContext { ctx })
    }

    fn viewport(&self) -> Size {
        Size::new(
            inner_dimension(self.window.inner_width()),
            inner_dimension(self.window.inner_height()),
        )
    }

    fn insert(&self, element: &WebElement, anchor: &str) -> Result<Insertion, SurfaceError> {
        let body = self.document.body().ok_or(SurfaceError::MissingBody)?;
        match body.query_selector(anchor).map_err(host_error)? {
            Some(marker) => {
                marker
                    .insert_adjacent_element("beforebegin", &element.canvas)
                    .map_err(host_error)?;
                Ok(Insertion::BeforeAnchor)
            }
            None => {
                body.insert_adjacent_element("beforeend", &element.canvas)
                    .map_err(host_error)?;
                Ok(Insertion::AppendedToBody)
            }
        }
    }
}
