//! Block Rendering - Style-Driven Boxes

use crate::resolve::{resolve_container, resolve_layout, ResolvedStyle};
use crate::style::{BlockKind, StyleSpec};

/// Resolve a validated spec for the given block variant.
pub fn resolve_for(kind: BlockKind, style: &StyleSpec) -> ResolvedStyle {
    match kind {
        BlockKind::Container => resolve_container(style),
        BlockKind::Layout => resolve_layout(style),
    }
}

/// Render one block box. `children` is already-rendered inner markup; an
/// empty string still yields the box itself, so sibling layout never
/// depends on whether a block happens to be empty.
pub fn render_block(kind: BlockKind, style: &StyleSpec, children: &str) -> String {
    let css = resolve_for(kind, style).to_inline_css();
    format!(
        "<div style=\"{}\">{}</div>",
        escape_attribute(&css),
        children
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::HexColor;

    #[test]
    fn test_empty_block_still_renders_a_box() {
        let html = render_block(BlockKind::Container, &StyleSpec::default(), "");
        assert_eq!(html, "<div style=\"background-size:cover\"></div>");
    }

    #[test]
    fn test_children_render_inside_unchanged() {
        let html = render_block(
            BlockKind::Container,
            &StyleSpec::default(),
            "<p>hello</p>",
        );
        assert!(html.ends_with("><p>hello</p></div>"));
    }

    #[test]
    fn test_layout_box_carries_forced_defaults() {
        let html = render_block(BlockKind::Layout, &StyleSpec::default(), "");
        assert!(html.contains("position:relative"));
        assert!(html.contains("width:100%"));
        assert!(html.contains("overflow:visible"));
    }

    #[test]
    fn test_style_attribute_escaped() {
        let mut spec = StyleSpec::default();
        spec.background_image = Some("https://x.com/a.png".to_string());
        spec.background_color = HexColor::parse("#ffffff");
        let html = render_block(BlockKind::Container, &spec, "");
        assert!(html.contains("url(&quot;https://x.com/a.png&quot;)"));
        assert!(!html.contains("url(\""));
    }
}
