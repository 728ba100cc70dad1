//! Style Data Model - Validated Block Styles

use serde::{Deserialize, Serialize};

pub type BlockId = String;

/// The two block variants that carry a style spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Container,
    Layout,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Container => "Container",
            BlockKind::Layout => "Layout",
        }
    }
}

/// A strict `#RRGGBB` color. Construction is only checked through
/// [`HexColor::parse`] or schema validation; serde keeps it transparent
/// so the stored format stays a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(pub String);

impl HexColor {
    pub fn parse(value: &str) -> Option<Self> {
        if Self::is_valid(value) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    /// Exactly `#` followed by 6 hex digits, case-insensitive.
    pub fn is_valid(value: &str) -> bool {
        match value.strip_prefix('#') {
            Some(digits) => digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()),
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Box-model offsets. All four are required: a partial object is a
/// validation failure, never an implicit zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxOffsets {
    pub top: f64,
    pub bottom: f64,
    pub right: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    Relative,
    Absolute,
    Static,
    Fixed,
    Sticky,
}

impl PositionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionMode::Relative => "relative",
            PositionMode::Absolute => "absolute",
            PositionMode::Static => "static",
            PositionMode::Fixed => "fixed",
            PositionMode::Sticky => "sticky",
        }
    }
}

/// Positioning offsets used by the layout variant, grouped under
/// `positionValues` in the stored format. Every offset is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionOffsets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Visible,
    Hidden,
    Scroll,
    Auto,
}

impl Overflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Overflow::Visible => "visible",
            Overflow::Hidden => "hidden",
            Overflow::Scroll => "scroll",
            Overflow::Auto => "auto",
        }
    }
}

/// A size constraint: numeric pixels for the container variant, a free
/// CSS length for the layout variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Px(f64),
    Css(String),
}

/// The full set of visual style attributes a block may carry. Every field
/// is optional; which fields a given block variant accepts is decided by
/// the schema, not by this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<BoxOffsets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<BoxOffsets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_values: Option<PositionOffsets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
}

impl StyleSpec {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Block-specific props, stored alongside the style and validated as an
/// independent structure rather than an extension of the style schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_ids: Option<Vec<BlockId>>,
}
