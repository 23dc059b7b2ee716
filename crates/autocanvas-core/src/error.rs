//! Errors raised while building or driving a forwarding surface.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error("document has no body to insert the surface into")]
    MissingBody,

    #[error("surface element cannot provide a \"{0}\" drawing context")]
    ContextUnavailable(String),

    #[error("member `{0}` is read-only")]
    ReadOnly(String),

    #[error("member `{0}` is not a function")]
    NotCallable(String),

    #[error("host error: {0}")]
    Host(String),
}
