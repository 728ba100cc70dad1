//! Style Resolution - Deterministic CSS Derivation
//!
//! Pure functions from a validated [`StyleSpec`] to the concrete visual
//! properties a box renders with. Resolution never fails and never
//! mutates its input; anything that passed the schema is renderable.

use serde::Serialize;

use crate::style::{BoxOffsets, Dimension, Overflow, PositionMode, StyleSpec};

/// The fixed border line weight. Only the color is configurable.
const BORDER_WEIGHT: &str = "1px solid";

/// The concrete property set a block box renders with. Offsets and the
/// stacking order stay numeric here; units are applied when the set is
/// flattened to an inline declaration string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
}

/// Single border declaration from the border color; absent without one.
/// Radius is carried independently.
pub fn border(spec: &StyleSpec) -> Option<String> {
    spec.border_color
        .as_ref()
        .map(|color| format!("{BORDER_WEIGHT} {}", color.as_str()))
}

/// Four-value shorthand in top/right/bottom/left order, each in px.
/// Absent when the box object is absent; a present object always has all
/// four offsets (schema guarantee), so there is no zero-defaulting here.
pub fn padding(spec: &StyleSpec) -> Option<String> {
    spec.padding.as_ref().map(shorthand)
}

pub fn margin(spec: &StyleSpec) -> Option<String> {
    spec.margin.as_ref().map(shorthand)
}

fn shorthand(offsets: &BoxOffsets) -> String {
    format!(
        "{}px {}px {}px {}px",
        offsets.top, offsets.right, offsets.bottom, offsets.left
    )
}

/// Comma-split the image value and wrap URL entries as `url("...")`.
///
/// The `http` prefix is tested against the raw comma-split token, before
/// trimming; trimming applies only inside the wrap. A token like
/// `" https://..."` therefore passes through as a literal.
pub fn background_image(spec: &StyleSpec) -> Option<String> {
    let raw = spec.background_image.as_deref()?;
    let entries: Vec<String> = raw
        .split(',')
        .map(|entry| {
            if entry.starts_with("http") {
                format!("url(\"{}\")", entry.trim())
            } else {
                entry.to_string()
            }
        })
        .collect();
    Some(entries.join(","))
}

/// Numeric dimensions gain a px suffix; string dimensions pass through.
pub fn dimension(value: &Dimension) -> String {
    match value {
        Dimension::Px(number) => format!("{number}px"),
        Dimension::Css(text) => text.clone(),
    }
}

/// Resolve the generic container variant: background-size falls back to
/// `cover` only when unset, positioning stays absent unless chosen, and
/// offsets come from the flat fields.
pub fn resolve_container(spec: &StyleSpec) -> ResolvedStyle {
    ResolvedStyle {
        background_color: spec.background_color.as_ref().map(|c| c.as_str().to_string()),
        background_image: background_image(spec),
        background_size: Some(
            spec.background_size
                .clone()
                .unwrap_or_else(|| "cover".to_string()),
        ),
        border: border(spec),
        border_radius: spec.border_radius,
        padding: padding(spec),
        margin: margin(spec),
        position: spec.position,
        top: spec.top,
        bottom: spec.bottom,
        left: spec.left,
        right: spec.right,
        z_index: spec.z_index,
        width: spec.width.as_ref().map(dimension),
        height: spec.height.as_ref().map(dimension),
        min_width: spec.min_width.as_ref().map(dimension),
        max_width: spec.max_width.as_ref().map(dimension),
        min_height: spec.min_height.as_ref().map(dimension),
        max_height: spec.max_height.as_ref().map(dimension),
        overflow: None,
    }
}

/// Resolve the layout variant: background-size is forced to `cover`
/// regardless of the spec (long-standing divergence from the container
/// variant, kept as-is), position defaults to relative, the box fills its
/// parent by default, and offsets come from the grouped values.
pub fn resolve_layout(spec: &StyleSpec) -> ResolvedStyle {
    let offsets = spec.position_values.unwrap_or_default();
    ResolvedStyle {
        background_color: spec.background_color.as_ref().map(|c| c.as_str().to_string()),
        background_image: background_image(spec),
        background_size: Some("cover".to_string()),
        border: border(spec),
        border_radius: spec.border_radius,
        padding: padding(spec),
        margin: None,
        position: Some(spec.position.unwrap_or(PositionMode::Relative)),
        top: offsets.top,
        bottom: offsets.bottom,
        left: offsets.left,
        right: offsets.right,
        z_index: offsets.z_index,
        width: Some(
            spec.width
                .as_ref()
                .map_or_else(|| "100%".to_string(), dimension),
        ),
        height: Some(
            spec.height
                .as_ref()
                .map_or_else(|| "auto".to_string(), dimension),
        ),
        min_width: None,
        max_width: None,
        min_height: None,
        max_height: None,
        overflow: Some(spec.overflow.unwrap_or(Overflow::Visible)),
    }
}

impl ResolvedStyle {
    /// Flatten to an inline CSS declaration string with a fixed property
    /// order, so the rendered markup is stable across runs.
    pub fn to_inline_css(&self) -> String {
        let mut declarations: Vec<String> = vec![];
        let mut push = |property: &str, value: Option<String>| {
            if let Some(value) = value {
                declarations.push(format!("{property}:{value}"));
            }
        };

        push("background-color", self.background_color.clone());
        push("background-image", self.background_image.clone());
        push("background-size", self.background_size.clone());
        push("border", self.border.clone());
        push("border-radius", self.border_radius.map(|r| format!("{r}px")));
        push("padding", self.padding.clone());
        push("margin", self.margin.clone());
        push("position", self.position.map(|p| p.as_str().to_string()));
        push("top", self.top.map(|v| format!("{v}px")));
        push("bottom", self.bottom.map(|v| format!("{v}px")));
        push("left", self.left.map(|v| format!("{v}px")));
        push("right", self.right.map(|v| format!("{v}px")));
        push("z-index", self.z_index.map(|z| z.to_string()));
        push("width", self.width.clone());
        push("height", self.height.clone());
        push("min-width", self.min_width.clone());
        push("max-width", self.max_width.clone());
        push("min-height", self.min_height.clone());
        push("max-height", self.max_height.clone());
        push("overflow", self.overflow.map(|o| o.as_str().to_string()));

        declarations.join(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::HexColor;

    fn spec() -> StyleSpec {
        StyleSpec::default()
    }

    #[test]
    fn test_border_requires_color() {
        let mut s = spec();
        s.border_radius = Some(8.0);
        assert_eq!(border(&s), None);

        s.border_color = HexColor::parse("#112233");
        assert_eq!(border(&s).as_deref(), Some("1px solid #112233"));
        assert_eq!(s.border_radius, Some(8.0));
    }

    #[test]
    fn test_box_shorthand_order() {
        let mut s = spec();
        s.padding = Some(BoxOffsets {
            top: 1.0,
            bottom: 3.0,
            right: 2.0,
            left: 4.0,
        });
        assert_eq!(padding(&s).as_deref(), Some("1px 2px 3px 4px"));
        assert_eq!(margin(&s), None);
    }

    #[test]
    fn test_background_image_mixed_list() {
        let mut s = spec();
        s.background_image = Some("linear-gradient(red,blue),https://x.com/a.png".to_string());
        assert_eq!(
            background_image(&s).as_deref(),
            Some("linear-gradient(red,blue),url(\"https://x.com/a.png\")")
        );
    }

    #[test]
    fn test_background_image_prefix_checked_before_trim() {
        let mut s = spec();
        s.background_image = Some("https://a.io/x.png, https://b.io/y.png".to_string());
        // The second token carries a leading space, so it stays a literal.
        assert_eq!(
            background_image(&s).as_deref(),
            Some("url(\"https://a.io/x.png\"), https://b.io/y.png")
        );
    }

    #[test]
    fn test_background_image_does_not_mutate_spec() {
        let mut s = spec();
        s.background_image = Some("https://x.com/a.png".to_string());
        let _ = background_image(&s);
        assert_eq!(s.background_image.as_deref(), Some("https://x.com/a.png"));
    }

    #[test]
    fn test_dimension_suffixing() {
        assert_eq!(dimension(&Dimension::Px(120.0)), "120px");
        assert_eq!(dimension(&Dimension::Css("50vh".to_string())), "50vh");
    }

    #[test]
    fn test_container_background_size_default_is_conditional() {
        let mut s = spec();
        assert_eq!(
            resolve_container(&s).background_size.as_deref(),
            Some("cover")
        );

        s.background_size = Some("contain".to_string());
        assert_eq!(
            resolve_container(&s).background_size.as_deref(),
            Some("contain")
        );
    }

    #[test]
    fn test_layout_background_size_always_forced() {
        let mut s = spec();
        s.background_size = Some("contain".to_string());
        assert_eq!(resolve_layout(&s).background_size.as_deref(), Some("cover"));
    }

    #[test]
    fn test_layout_defaults() {
        let resolved = resolve_layout(&spec());
        assert_eq!(resolved.position, Some(PositionMode::Relative));
        assert_eq!(resolved.width.as_deref(), Some("100%"));
        assert_eq!(resolved.height.as_deref(), Some("auto"));
        assert_eq!(resolved.overflow, Some(Overflow::Visible));
    }

    #[test]
    fn test_container_leaves_position_unset() {
        let resolved = resolve_container(&spec());
        assert_eq!(resolved.position, None);
        assert_eq!(resolved.top, None);
    }

    #[test]
    fn test_resolution_idempotent() {
        let mut s = spec();
        s.background_color = HexColor::parse("#f5f5f5");
        s.background_image = Some("https://x.com/a.png,radial-gradient(red,blue)".to_string());
        s.padding = Some(BoxOffsets {
            top: 4.0,
            bottom: 4.0,
            right: 8.0,
            left: 8.0,
        });
        assert_eq!(resolve_container(&s), resolve_container(&s));
        assert_eq!(resolve_layout(&s), resolve_layout(&s));
    }

    #[test]
    fn test_inline_css_order_stable() {
        let mut s = spec();
        s.background_color = HexColor::parse("#ffffff");
        s.border_color = HexColor::parse("#000000");
        s.border_radius = Some(4.0);
        let css = resolve_container(&s).to_inline_css();
        assert_eq!(
            css,
            "background-color:#ffffff;background-size:cover;border:1px solid #000000;border-radius:4px"
        );
    }
}
