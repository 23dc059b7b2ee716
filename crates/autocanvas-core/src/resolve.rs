//! Member name resolution.
//!
//! Every access on the surface is resolved fresh by name, in this order:
//! the surface's own members, then the element attribute allow-list, then
//! the drawing context.

/// Members declared by the surface itself. These can never be shadowed.
pub const OWN_MEMBERS: &[&str] = &["resize", "clear", "isAutoSized"];

/// Attribute names satisfied by the surface element rather than the context.
pub static ELEMENT_ATTRIBUTES: &[&str] = &["width", "height", "style"];

/// Which object answers for a member name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Surface,
    Element,
    Context,
}

/// Resolve `name` to the object that owns it.
pub fn resolve(name: &str) -> Target {
    let target = if OWN_MEMBERS.contains(&name) {
        Target::Surface
    } else if ELEMENT_ATTRIBUTES.contains(&name) {
        Target::Element
    } else {
        Target::Context
    };
    log::trace!("resolve `{name}` -> {target:?}");
    target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_members_resolve_to_surface() {
        for name in OWN_MEMBERS {
            assert_eq!(resolve(name), Target::Surface, "{name}");
        }
    }

    #[test]
    fn allow_list_resolves_to_element() {
        assert_eq!(resolve("width"), Target::Element);
        assert_eq!(resolve("height"), Target::Element);
        assert_eq!(resolve("style"), Target::Element);
    }

    #[test]
    fn everything_else_resolves_to_context() {
        assert_eq!(resolve("fillRect"), Target::Context);
        assert_eq!(resolve("fillStyle"), Target::Context);
        assert_eq!(resolve("canvas"), Target::Context);
        assert_eq!(resolve(""), Target::Context);
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(resolve("Width"), Target::Context);
        assert_eq!(resolve("isautosized"), Target::Context);
    }

    #[test]
    fn lists_do_not_overlap() {
        for name in ELEMENT_ATTRIBUTES {
            assert!(!OWN_MEMBERS.contains(name));
        }
    }
}
