//! The forwarding surface.
//!
//! One handle that answers as if it were both the surface element and its
//! drawing context. Each access is resolved by name through
//! [`resolve`](crate::resolve::resolve): own members first, then the element
//! attribute allow-list, then the drawing context. Nothing is cached, so the
//! handle always reflects the current state of both objects.

use crate::config::SurfaceConfig;
use crate::error::SurfaceError;
use crate::host::{DrawingContext, Host, HostValue, PropertyHost, Size, SurfaceElement};
use crate::resolve::{Target, resolve};
use crate::value::Member;

/// A function-valued member detached from the access that produced it.
///
/// Remembers its receiver, so invoking it later through
/// [`ForwardingSurface::call`] behaves exactly like invoking it on the spot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundMethod {
    target: Target,
    name: String,
}

impl BoundMethod {
    fn new(target: Target, name: &str) -> Self {
        Self {
            target,
            name: name.to_string(),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Result of reading a member through the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<V> {
    Value(V),
    Method(BoundMethod),
}

impl<V> Resolved<V> {
    pub fn into_value(self) -> Option<V> {
        match self {
            Resolved::Value(v) => Some(v),
            Resolved::Method(_) => None,
        }
    }

    pub fn into_method(self) -> Option<BoundMethod> {
        match self {
            Resolved::Method(m) => Some(m),
            Resolved::Value(_) => None,
        }
    }
}

pub struct ForwardingSurface<H: Host> {
    host: H,
    element: H::Element,
    context: H::Context,
    auto_sized: bool,
}

impl<H: Host> ForwardingSurface<H> {
    /// Create the element and its context, size it, and insert it into the
    /// host document.
    ///
    /// Subscribing to viewport resizes is left to the owner of the surface,
    /// which forwards each event to [`handle_viewport_resize`](Self::handle_viewport_resize).
    pub fn new(host: H, config: &SurfaceConfig) -> Result<Self, SurfaceError> {
        let element = host.create_element()?;
        let context = host.create_context(&element, &config.context)?;
        let mut surface = Self {
            host,
            element,
            context,
            auto_sized: true,
        };
        surface.resize(config.width, config.height);
        let insertion = surface.host.insert(&surface.element, &config.anchor)?;
        log::debug!(
            "surface created: {:?}, auto-sized: {}, inserted {:?}",
            surface.size(),
            surface.auto_sized,
            insertion
        );
        Ok(surface)
    }

    /// Size the element. Unless both dimensions are given and non-zero the
    /// surface switches to auto-sizing and matches the viewport.
    pub fn resize(&mut self, width: Option<u32>, height: Option<u32>) {
        let nonzero = |d: Option<u32>| d.filter(|&d| d > 0);
        match (nonzero(width), nonzero(height)) {
            (Some(width), Some(height)) => {
                self.auto_sized = false;
                self.element.set_size(Size::new(width, height));
            }
            _ => {
                self.auto_sized = true;
                self.fit_viewport();
            }
        }
        log::debug!("resize -> {:?} (auto-sized: {})", self.size(), self.auto_sized);
    }

    /// Clear the whole surface, using the element size at call time.
    pub fn clear(&mut self) {
        let Size { width, height } = self.element.size();
        self.context.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    pub fn is_auto_sized(&self) -> bool {
        self.auto_sized
    }

    /// React to a viewport resize. Only auto-sized surfaces follow the
    /// viewport; returns whether the element was resized.
    pub fn handle_viewport_resize(&mut self) -> bool {
        if !self.auto_sized {
            return false;
        }
        self.fit_viewport();
        log::debug!("viewport resize -> {:?}", self.size());
        true
    }

    fn fit_viewport(&mut self) {
        let viewport = self.host.viewport();
        self.element.set_size(viewport);
    }

    // ─── Forwarding ─────────────────────────────────────────────────────

    /// Read a member by name.
    pub fn get(&self, name: &str) -> Resolved<H::Value> {
        match resolve(name) {
            Target::Surface => match name {
                "isAutoSized" => Resolved::Value(H::Value::from_bool(self.auto_sized)),
                _ => Resolved::Method(BoundMethod::new(Target::Surface, name)),
            },
            Target::Element => bind(Target::Element, name, self.element.member(name)),
            Target::Context => bind(Target::Context, name, self.context.member(name)),
        }
    }

    /// Write a member by name.
    ///
    /// Own members (`resize`, `clear`, `isAutoSized`) are fixed: writing one
    /// fails with [`SurfaceError::ReadOnly`] instead of replacing it, so the
    /// handle's API cannot be swapped out from script.
    pub fn set(&mut self, name: &str, value: H::Value) -> Result<(), SurfaceError> {
        match resolve(name) {
            Target::Surface => Err(SurfaceError::ReadOnly(name.to_string())),
            Target::Element => self.element.set_member(name, value),
            Target::Context => self.context.set_member(name, value),
        }
    }

    /// Invoke a bound method on the receiver it was read from.
    pub fn call(
        &mut self,
        method: &BoundMethod,
        args: &[H::Value],
    ) -> Result<H::Value, SurfaceError> {
        match method.target {
            Target::Surface => self.call_own(&method.name, args),
            Target::Element => self.element.invoke(&method.name, args),
            Target::Context => self.context.invoke(&method.name, args),
        }
    }

    /// Read `name` and invoke it immediately.
    pub fn invoke(&mut self, name: &str, args: &[H::Value]) -> Result<H::Value, SurfaceError> {
        match self.get(name) {
            Resolved::Method(method) => self.call(&method, args),
            Resolved::Value(_) => Err(SurfaceError::NotCallable(name.to_string())),
        }
    }

    fn call_own(&mut self, name: &str, args: &[H::Value]) -> Result<H::Value, SurfaceError> {
        match name {
            "resize" => {
                let dimension = |i: usize| args.get(i).and_then(HostValue::as_dimension);
                self.resize(dimension(0), dimension(1));
            }
            "clear" => self.clear(),
            _ => return Err(SurfaceError::NotCallable(name.to_string())),
        }
        Ok(H::Value::undefined())
    }

    // ─── Typed access ───────────────────────────────────────────────────

    pub fn size(&self) -> Size {
        self.element.size()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn element(&self) -> &H::Element {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut H::Element {
        &mut self.element
    }

    pub fn context(&self) -> &H::Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut H::Context {
        &mut self.context
    }
}

fn bind<V>(target: Target, name: &str, member: Member<V>) -> Resolved<V> {
    match member {
        Member::Data(value) => Resolved::Value(value),
        Member::Method => Resolved::Method(BoundMethod::new(target, name)),
    }
}
