//! Shadow DOM
//!
//! Shadow roots are ordinary arena nodes whose parent link is NONE; the
//! host keeps a pointer to its root and the root points back at the host.
//! Only open roots are reachable through `DomTree::shadow_root`.

use crate::NodeId;

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Shadow root initialization options
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
}

impl ShadowRootInit {
    /// Options for an open shadow root
    pub fn open() -> Self {
        Self::default()
    }

    /// Options for a closed shadow root
    pub fn closed() -> Self {
        Self { mode: ShadowRootMode::Closed }
    }
}

/// Shadow root data stored on its arena node
#[derive(Debug, Clone)]
pub struct ShadowRoot {
    /// Host element
    pub host: NodeId,
    /// Mode (open/closed)
    pub mode: ShadowRootMode,
}

impl ShadowRoot {
    /// Create from init options
    pub fn from_init(host: NodeId, init: ShadowRootInit) -> Self {
        Self { host, mode: init.mode }
    }

    /// Check whether script-side code may observe this root
    pub fn is_open(&self) -> bool {
        self.mode == ShadowRootMode::Open
    }
}

/// Elements that accept `attachShadow` besides autonomous custom elements
const SHADOW_HOST_ELEMENTS: &[&str] = &[
    "article", "aside", "blockquote", "body", "div", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "main", "nav",
    "p", "section", "span",
];

/// Check if an element with this tag name may host a shadow root
pub fn can_attach_shadow(tag: &str) -> bool {
    is_valid_custom_element_name(tag) || SHADOW_HOST_ELEMENTS.contains(&tag)
}

/// Validate custom element name
pub fn is_valid_custom_element_name(name: &str) -> bool {
    // Must contain hyphen
    if !name.contains('-') {
        return false;
    }

    // Must start with lowercase letter
    if !name.chars().next().map(|c| c.is_ascii_lowercase()).unwrap_or(false) {
        return false;
    }

    const RESERVED: &[&str] = &[
        "annotation-xml", "color-profile", "font-face",
        "font-face-src", "font-face-uri", "font-face-format",
        "font-face-name", "missing-glyph",
    ];
    if RESERVED.contains(&name) {
        return false;
    }

    name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || c == '.')
}

/// Shadow DOM errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShadowError {
    /// Element already has a shadow root
    #[error("Element already has a shadow root")]
    AlreadyAttached,
    /// Element cannot have shadow root attached
    #[error("Element does not support shadow root")]
    NotSupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_root_from_init() {
        let shadow = ShadowRoot::from_init(NodeId(1), ShadowRootInit::closed());
        assert_eq!(shadow.mode, ShadowRootMode::Closed);
        assert_eq!(shadow.host, NodeId(1));
        assert!(!shadow.is_open());

        assert!(ShadowRoot::from_init(NodeId(1), ShadowRootInit::open()).is_open());
    }

    #[test]
    fn test_valid_hosts() {
        assert!(can_attach_shadow("my-element"));
        assert!(can_attach_shadow("x-basic"));
        assert!(can_attach_shadow("div"));
        assert!(!can_attach_shadow("img"));
        assert!(!can_attach_shadow("font-face")); // reserved
        assert!(!can_attach_shadow("1-element"));
    }
}
