pub mod config;
pub mod error;
pub mod headless;
pub mod host;
pub mod resolve;
pub mod surface;
pub mod value;

pub use config::SurfaceConfig;
pub use error::SurfaceError;
pub use host::{
    DrawingContext, Host, HostValue, Insertion, PropertyHost, Size, SurfaceElement,
    dimension_from_f64,
};
pub use resolve::{ELEMENT_ATTRIBUTES, OWN_MEMBERS, Target, resolve};
pub use surface::{BoundMethod, ForwardingSurface, Resolved};
pub use value::{Member, Value};
