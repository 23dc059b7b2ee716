//! In-memory host.
//!
//! Stands in for a browser when there is none: the viewport is a settable
//! size, the document only knows whether it has an anchor element, and the
//! drawing context records every call as a `DrawCommand`.

use crate::error::SurfaceError;
use crate::host::{DrawingContext, Host, Insertion, PropertyHost, Size, SurfaceElement};
use crate::value::{Member, Value};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Size of a freshly created canvas element before any resize.
pub const DEFAULT_ELEMENT_SIZE: Size = Size::new(300, 150);

pub struct HeadlessHost {
    viewport: Cell<Size>,
    anchor: Option<String>,
    insertions: RefCell<Vec<Insertion>>,
}

impl HeadlessHost {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Cell::new(viewport),
            anchor: None,
            insertions: RefCell::new(Vec::new()),
        }
    }

    /// Give the document body an element matching `selector`.
    pub fn with_anchor(mut self, selector: &str) -> Self {
        self.anchor = Some(selector.to_string());
        self
    }

    /// Change the viewport size. The surface only notices once
    /// `handle_viewport_resize` is called, like a real resize event.
    pub fn set_viewport(&self, size: Size) {
        self.viewport.set(size);
    }

    pub fn insertions(&self) -> Vec<Insertion> {
        self.insertions.borrow().clone()
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(Size::new(1024, 768))
    }
}

impl Host for HeadlessHost {
    type Value = Value;
    type Element = HeadlessElement;
    type Context = HeadlessContext;

    fn create_element(&self) -> Result<HeadlessElement, SurfaceError> {
        Ok(HeadlessElement::default())
    }

    fn create_context(
        &self,
        _element: &HeadlessElement,
        kind: &str,
    ) -> Result<HeadlessContext, SurfaceError> {
        match kind {
            "2d" => Ok(HeadlessContext::default()),
            other => Err(SurfaceError::ContextUnavailable(other.to_string())),
        }
    }

    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn insert(&self, _element: &HeadlessElement, anchor: &str) -> Result<Insertion, SurfaceError> {
        let insertion = if self.anchor.as_deref() == Some(anchor) {
            Insertion::BeforeAnchor
        } else {
            Insertion::AppendedToBody
        };
        self.insertions.borrow_mut().push(insertion);
        Ok(insertion)
    }
}

// ─── Element ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessElement {
    size: Size,
    style: String,
    attributes: BTreeMap<String, Value>,
}

impl Default for HeadlessElement {
    fn default() -> Self {
        Self {
            size: DEFAULT_ELEMENT_SIZE,
            style: String::new(),
            attributes: BTreeMap::new(),
        }
    }
}

impl HeadlessElement {
    pub fn style(&self) -> &str {
        &self.style
    }
}

/// DOM-style coercion for unsigned integer attributes.
fn to_pixels(value: &Value) -> u32 {
    value.to_number().clamp(0.0, u32::MAX as f64) as u32
}

impl PropertyHost for HeadlessElement {
    type Value = Value;

    fn member(&self, name: &str) -> Member<Value> {
        match name {
            "width" => Member::Data(self.size.width.into()),
            "height" => Member::Data(self.size.height.into()),
            "style" => Member::Data(self.style.clone().into()),
            _ => Member::Data(self.attributes.get(name).cloned().unwrap_or_default()),
        }
    }

    fn set_member(&mut self, name: &str, value: Value) -> Result<(), SurfaceError> {
        match name {
            "width" => self.size.width = to_pixels(&value),
            "height" => self.size.height = to_pixels(&value),
            "style" => self.style = value.to_string(),
            _ => {
                self.attributes.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    fn invoke(&mut self, name: &str, _args: &[Value]) -> Result<Value, SurfaceError> {
        Err(SurfaceError::NotCallable(name.to_string()))
    }
}

impl SurfaceElement for HeadlessElement {
    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

// ─── Drawing context ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    fn contains(&self, x: f64, y: f64) -> bool {
        let (x0, x1) = (self.x.min(self.x + self.width), self.x.max(self.x + self.width));
        let (y0, y1) = (self.y.min(self.y + self.height), self.y.max(self.y + self.height));
        (x0..=x1).contains(&x) && (y0..=y1).contains(&y)
    }
}

/// A recorded call on the headless drawing context.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect(Rect),
    FillRect(Rect),
    StrokeRect(Rect),
    BeginPath,
    ClosePath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Rect(Rect),
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    Fill,
    Stroke,
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Scale { x: f64, y: f64 },
    Rotate { angle: f64 },
    FillText { text: String, x: f64, y: f64 },
}

/// Graphics state saved and restored by `save()` / `restore()`.
#[derive(Debug, Clone, PartialEq)]
struct DrawState {
    fill_style: String,
    stroke_style: String,
    line_width: f64,
    global_alpha: f64,
    font: String,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill_style: "#000000".to_string(),
            stroke_style: "#000000".to_string(),
            line_width: 1.0,
            global_alpha: 1.0,
            font: "10px sans-serif".to_string(),
        }
    }
}

const CONTEXT_METHODS: &[&str] = &[
    "clearRect",
    "fillRect",
    "strokeRect",
    "beginPath",
    "closePath",
    "moveTo",
    "lineTo",
    "rect",
    "arc",
    "fill",
    "stroke",
    "save",
    "restore",
    "translate",
    "scale",
    "rotate",
    "fillText",
    "isPointInPath",
];

#[derive(Debug, Clone, Default)]
pub struct HeadlessContext {
    state: DrawState,
    saved: Vec<DrawState>,
    /// Rectangles of the current path, for `isPointInPath`.
    path: Vec<Rect>,
    /// Script-assigned properties, including ones that shadow built-ins.
    expando: BTreeMap<String, Value>,
    commands: Vec<DrawCommand>,
}

impl HeadlessContext {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn fill_style(&self) -> &str {
        &self.state.fill_style
    }

    pub fn line_width(&self) -> f64 {
        self.state.line_width
    }

    fn record(&mut self, command: DrawCommand) -> Value {
        log::trace!("headless draw {command:?}");
        self.commands.push(command);
        Value::Undefined
    }
}

fn arg(name: &str, args: &[Value], index: usize) -> Result<f64, SurfaceError> {
    args.get(index)
        .map(Value::to_number)
        .ok_or_else(|| SurfaceError::Host(format!("{name}: missing argument {}", index + 1)))
}

fn rect_args(name: &str, args: &[Value]) -> Result<Rect, SurfaceError> {
    Ok(Rect {
        x: arg(name, args, 0)?,
        y: arg(name, args, 1)?,
        width: arg(name, args, 2)?,
        height: arg(name, args, 3)?,
    })
}

impl PropertyHost for HeadlessContext {
    type Value = Value;

    fn member(&self, name: &str) -> Member<Value> {
        if let Some(value) = self.expando.get(name) {
            return Member::Data(value.clone());
        }
        if CONTEXT_METHODS.contains(&name) {
            return Member::Method;
        }
        let value = match name {
            "fillStyle" => self.state.fill_style.clone().into(),
            "strokeStyle" => self.state.stroke_style.clone().into(),
            "lineWidth" => self.state.line_width.into(),
            "globalAlpha" => self.state.global_alpha.into(),
            "font" => self.state.font.clone().into(),
            _ => Value::Undefined,
        };
        Member::Data(value)
    }

    /// Invalid values for built-in state are ignored, as a canvas does.
    fn set_member(&mut self, name: &str, value: Value) -> Result<(), SurfaceError> {
        match (name, &value) {
            ("fillStyle", Value::String(s)) => self.state.fill_style = s.clone(),
            ("strokeStyle", Value::String(s)) => self.state.stroke_style = s.clone(),
            ("font", Value::String(s)) => self.state.font = s.clone(),
            ("lineWidth", Value::Number(n)) if n.is_finite() && *n > 0.0 => {
                self.state.line_width = *n
            }
            ("globalAlpha", Value::Number(n)) if (0.0..=1.0).contains(n) => {
                self.state.global_alpha = *n
            }
            ("fillStyle" | "strokeStyle" | "font" | "lineWidth" | "globalAlpha", _) => {}
            _ => {
                self.expando.insert(name.to_string(), value.clone());
            }
        }
        Ok(())
    }

    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Value, SurfaceError> {
        if self.expando.contains_key(name) || !CONTEXT_METHODS.contains(&name) {
            return Err(SurfaceError::NotCallable(name.to_string()));
        }
        let value = match name {
            "clearRect" => self.record(DrawCommand::ClearRect(rect_args(name, args)?)),
            "fillRect" => self.record(DrawCommand::FillRect(rect_args(name, args)?)),
            "strokeRect" => self.record(DrawCommand::StrokeRect(rect_args(name, args)?)),
            "beginPath" => {
                self.path.clear();
                self.record(DrawCommand::BeginPath)
            }
            "closePath" => self.record(DrawCommand::ClosePath),
            "moveTo" => self.record(DrawCommand::MoveTo {
                x: arg(name, args, 0)?,
                y: arg(name, args, 1)?,
            }),
            "lineTo" => self.record(DrawCommand::LineTo {
                x: arg(name, args, 0)?,
                y: arg(name, args, 1)?,
            }),
            "rect" => {
                let rect = rect_args(name, args)?;
                self.path.push(rect);
                self.record(DrawCommand::Rect(rect))
            }
            "arc" => self.record(DrawCommand::Arc {
                x: arg(name, args, 0)?,
                y: arg(name, args, 1)?,
                radius: arg(name, args, 2)?,
                start: arg(name, args, 3)?,
                end: arg(name, args, 4)?,
            }),
            "fill" => self.record(DrawCommand::Fill),
            "stroke" => self.record(DrawCommand::Stroke),
            "save" => {
                self.saved.push(self.state.clone());
                self.record(DrawCommand::Save)
            }
            "restore" => {
                if let Some(state) = self.saved.pop() {
                    self.state = state;
                }
                self.record(DrawCommand::Restore)
            }
            "translate" => self.record(DrawCommand::Translate {
                x: arg(name, args, 0)?,
                y: arg(name, args, 1)?,
            }),
            "scale" => self.record(DrawCommand::Scale {
                x: arg(name, args, 0)?,
                y: arg(name, args, 1)?,
            }),
            "rotate" => self.record(DrawCommand::Rotate {
                angle: arg(name, args, 0)?,
            }),
            "fillText" => {
                let text = args.first().map(Value::to_string).unwrap_or_default();
                self.record(DrawCommand::FillText {
                    text,
                    x: arg(name, args, 1)?,
                    y: arg(name, args, 2)?,
                })
            }
            "isPointInPath" => {
                let (x, y) = (arg(name, args, 0)?, arg(name, args, 1)?);
                Value::Bool(self.path.iter().any(|r| r.contains(x, y)))
            }
            _ => return Err(SurfaceError::NotCallable(name.to_string())),
        };
        Ok(value)
    }
}

impl DrawingContext for HeadlessContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(DrawCommand::ClearRect(Rect { x, y, width, height }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn element_coerces_numeric_attributes() {
        let mut el = HeadlessElement::default();
        el.set_member("width", Value::from("640")).unwrap();
        el.set_member("height", Value::from("tall")).unwrap();
        assert_eq!(el.size(), Size::new(640, 0));
    }

    #[test]
    fn element_keeps_unknown_attributes() {
        let mut el = HeadlessElement::default();
        el.set_member("id", Value::from("stage")).unwrap();
        assert_eq!(el.member("id"), Member::Data(Value::from("stage")));
        assert_eq!(el.member("title"), Member::Data(Value::Undefined));
    }

    #[test]
    fn context_reports_methods() {
        let ctx = HeadlessContext::default();
        assert_eq!(ctx.member("fillRect"), Member::Method);
        assert_eq!(ctx.member("lineWidth"), Member::Data(Value::from(1.0)));
        assert_eq!(ctx.member("nope"), Member::Data(Value::Undefined));
    }

    #[test]
    fn context_ignores_invalid_state() {
        let mut ctx = HeadlessContext::default();
        ctx.set_member("lineWidth", Value::from(-2.0)).unwrap();
        ctx.set_member("globalAlpha", Value::from(3.0)).unwrap();
        ctx.set_member("fillStyle", Value::from(12.0)).unwrap();
        assert_eq!(ctx.line_width(), 1.0);
        assert_eq!(ctx.member("globalAlpha"), Member::Data(Value::from(1.0)));
        assert_eq!(ctx.fill_style(), "#000000");
    }

    #[test]
    fn save_restore_round_trips_state() {
        let mut ctx = HeadlessContext::default();
        ctx.set_member("fillStyle", Value::from("red")).unwrap();
        ctx.invoke("save", &[]).unwrap();
        ctx.set_member("fillStyle", Value::from("blue")).unwrap();
        ctx.invoke("restore", &[]).unwrap();
        assert_eq!(ctx.fill_style(), "red");
        assert_eq!(ctx.commands(), &[DrawCommand::Save, DrawCommand::Restore]);
    }

    #[test]
    fn assigned_data_shadows_method() {
        let mut ctx = HeadlessContext::default();
        ctx.set_member("stroke", Value::from(5.0)).unwrap();
        assert_eq!(ctx.member("stroke"), Member::Data(Value::from(5.0)));
        assert_eq!(
            ctx.invoke("stroke", &[]),
            Err(SurfaceError::NotCallable("stroke".to_string()))
        );
    }

    #[test]
    fn missing_arguments_are_errors() {
        let mut ctx = HeadlessContext::default();
        assert!(ctx.invoke("fillRect", &[Value::from(1.0)]).is_err());
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn point_in_path_uses_rect_subpaths() {
        let mut ctx = HeadlessContext::default();
        ctx.invoke("beginPath", &[]).unwrap();
        let args = [10.0, 10.0, 20.0, 20.0].map(Value::from);
        ctx.invoke("rect", &args).unwrap();
        let inside = ctx.invoke("isPointInPath", &[Value::from(15.0), Value::from(15.0)]).unwrap();
        let outside = ctx.invoke("isPointInPath", &[Value::from(40.0), Value::from(15.0)]).unwrap();
        assert_eq!(inside, Value::Bool(true));
        assert_eq!(outside, Value::Bool(false));
    }

    #[test]
    fn host_inserts_before_matching_anchor() {
        let host = HeadlessHost::default().with_anchor("script");
        let el = host.create_element().unwrap();
        assert_eq!(host.insert(&el, "script").unwrap(), Insertion::BeforeAnchor);
        assert_eq!(host.insert(&el, "#app").unwrap(), Insertion::AppendedToBody);
        assert_eq!(host.insertions(), vec![Insertion::BeforeAnchor, Insertion::AppendedToBody]);
    }

    #[test]
    fn host_only_offers_2d_contexts() {
        let host = HeadlessHost::default();
        let el = host.create_element().unwrap();
        assert!(host.create_context(&el, "2d").is_ok());
        assert_eq!(
            host.create_context(&el, "webgl").unwrap_err(),
            SurfaceError::ContextUnavailable("webgl".to_string())
        );
    }
}
