//! Host collaborators consumed by the forwarding surface.
//!
//! A host creates the surface element and its drawing context, reports the
//! viewport size, and places the element in its document. The surface never
//! talks to a runtime directly; it only goes through these traits.

use crate::error::SurfaceError;
use crate::value::Member;

/// Pixel dimensions of the surface or the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Surface dimension from a script number: finite values of at least one
/// pixel, truncated. Anything else is absent.
pub fn dimension_from_f64(n: f64) -> Option<u32> {
    (n.is_finite() && n >= 1.0).then(|| n.min(u32::MAX as f64) as u32)
}

/// Values a host stores in element and context members.
pub trait HostValue: Clone {
    fn undefined() -> Self;

    fn from_bool(b: bool) -> Self;

    /// Interpret the value as a surface dimension.
    /// `None` means "absent", which callers treat as a request to auto-size.
    fn as_dimension(&self) -> Option<u32>;
}

/// An object with named members that can be read, written and invoked.
pub trait PropertyHost {
    type Value: HostValue;

    /// Current state of the member `name`. Unknown names read as
    /// `Member::Data(undefined)`.
    fn member(&self, name: &str) -> Member<Self::Value>;

    fn set_member(&mut self, name: &str, value: Self::Value) -> Result<(), SurfaceError>;

    /// Invoke the function-valued member `name` with `self` as receiver.
    fn invoke(&mut self, name: &str, args: &[Self::Value]) -> Result<Self::Value, SurfaceError>;
}

/// The visual element representing the drawable area.
pub trait SurfaceElement: PropertyHost {
    fn size(&self) -> Size;

    fn set_size(&mut self, size: Size);
}

/// The object offering drawing operations over a surface element.
pub trait DrawingContext: PropertyHost {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// Where the document-insertion collaborator placed the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Immediately before the first element matching the anchor selector.
    BeforeAnchor,
    /// At the end of the document body.
    AppendedToBody,
}

/// Runtime that owns the document and the viewport.
pub trait Host {
    type Value: HostValue;
    type Element: SurfaceElement<Value = Self::Value>;
    type Context: DrawingContext<Value = Self::Value>;

    fn create_element(&self) -> Result<Self::Element, SurfaceError>;

    fn create_context(
        &self,
        element: &Self::Element,
        kind: &str,
    ) -> Result<Self::Context, SurfaceError>;

    /// Current inner size of the viewport.
    fn viewport(&self) -> Size;

    /// Place `element` in the document: before the first body element
    /// matching `anchor` if there is one, else at the end of the body.
    fn insert(&self, element: &Self::Element, anchor: &str) -> Result<Insertion, SurfaceError>;
}
