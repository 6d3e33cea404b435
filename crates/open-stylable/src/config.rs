//! Runtime Configuration

use stylable_dom::NodeId;

/// Style propagation options
#[derive(Debug, Clone)]
pub struct Config {
    /// Refresh when an attribute under the style root changes
    /// (e.g. a `<link>` getting a new `href`)
    pub observe_attributes: bool,

    /// Refresh when text under the style root is edited in place
    pub observe_character_data: bool,

    /// Minify inline stylesheets through lightningcss once per source
    /// before copying them into shadow roots. Off by default, so copies
    /// carry the source text verbatim.
    pub normalize_inline_styles: bool,

    /// Container whose style sources are propagated; `None` means `<head>`
    pub style_root: Option<NodeId>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            observe_attributes: true,
            observe_character_data: true,
            normalize_inline_styles: false,
            style_root: None,
        }
    }
}
