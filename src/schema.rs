//! Style Schema - Field Registry and Validation
//!
//! Each block variant registers a fixed table of style fields. Validation
//! walks the table, collects structured per-field violations, and only on
//! a clean pass builds the normalized [`StyleSpec`]. Unknown fields are
//! dropped, absent fields are always valid.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::style::{BlockKind, BlockProps, HexColor, PositionMode, StyleSpec};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

/// One field failure: addressable path plus reason, so callers can show
/// which specific field failed and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// True if any violation is rooted at the given field.
    pub fn mentions(&self, field: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field || v.field.starts_with(&format!("{field}.")))
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "{}", lines.join("; "))
    }
}

/// Per-field constraint kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// Strict `#RRGGBB` string.
    Color,
    /// Object with all four numeric offsets, or nothing.
    BoxModel,
    /// One of the permitted positioning modes.
    Mode(&'static [PositionMode]),
    /// Optional numeric offsets grouped under one object.
    OffsetGroup,
    Number,
    /// Numeric pixel dimension.
    PxDimension,
    /// Free CSS length string.
    CssDimension,
    OverflowKeyword,
    /// Comma-separated image values; any string.
    ImageList,
    FreeString,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub check: FieldCheck,
}

const ALL_MODES: &[PositionMode] = &[
    PositionMode::Relative,
    PositionMode::Absolute,
    PositionMode::Static,
    PositionMode::Fixed,
    PositionMode::Sticky,
];

const LAYOUT_MODES: &[PositionMode] = &[PositionMode::Relative, PositionMode::Absolute];

const OVERFLOW_KEYWORDS: &[&str] = &["visible", "hidden", "scroll", "auto"];

const CONTAINER_FIELDS: &[FieldRule] = &[
    FieldRule { name: "backgroundColor", check: FieldCheck::Color },
    FieldRule { name: "backgroundImage", check: FieldCheck::ImageList },
    FieldRule { name: "backgroundSize", check: FieldCheck::FreeString },
    FieldRule { name: "borderColor", check: FieldCheck::Color },
    FieldRule { name: "borderRadius", check: FieldCheck::Number },
    FieldRule { name: "padding", check: FieldCheck::BoxModel },
    FieldRule { name: "margin", check: FieldCheck::BoxModel },
    FieldRule { name: "position", check: FieldCheck::Mode(ALL_MODES) },
    FieldRule { name: "top", check: FieldCheck::Number },
    FieldRule { name: "bottom", check: FieldCheck::Number },
    FieldRule { name: "left", check: FieldCheck::Number },
    FieldRule { name: "right", check: FieldCheck::Number },
    FieldRule { name: "zIndex", check: FieldCheck::Number },
    FieldRule { name: "width", check: FieldCheck::PxDimension },
    FieldRule { name: "height", check: FieldCheck::PxDimension },
    FieldRule { name: "minWidth", check: FieldCheck::PxDimension },
    FieldRule { name: "maxWidth", check: FieldCheck::PxDimension },
    FieldRule { name: "minHeight", check: FieldCheck::PxDimension },
    FieldRule { name: "maxHeight", check: FieldCheck::PxDimension },
];

const LAYOUT_FIELDS: &[FieldRule] = &[
    FieldRule { name: "backgroundColor", check: FieldCheck::Color },
    FieldRule { name: "backgroundImage", check: FieldCheck::ImageList },
    FieldRule { name: "borderColor", check: FieldCheck::Color },
    FieldRule { name: "borderRadius", check: FieldCheck::Number },
    FieldRule { name: "padding", check: FieldCheck::BoxModel },
    FieldRule { name: "position", check: FieldCheck::Mode(LAYOUT_MODES) },
    FieldRule { name: "positionValues", check: FieldCheck::OffsetGroup },
    FieldRule { name: "width", check: FieldCheck::CssDimension },
    FieldRule { name: "height", check: FieldCheck::CssDimension },
    FieldRule { name: "overflow", check: FieldCheck::OverflowKeyword },
];

const BOX_SIDES: &[&str] = &["top", "bottom", "right", "left"];

/// The style schema for one block variant.
#[derive(Debug, Clone, Copy)]
pub struct StyleSchema {
    kind: BlockKind,
}

impl StyleSchema {
    pub fn for_kind(kind: BlockKind) -> Self {
        Self { kind }
    }

    pub fn container() -> Self {
        Self::for_kind(BlockKind::Container)
    }

    pub fn layout() -> Self {
        Self::for_kind(BlockKind::Layout)
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn fields(&self) -> &'static [FieldRule] {
        match self.kind {
            BlockKind::Container => CONTAINER_FIELDS,
            BlockKind::Layout => LAYOUT_FIELDS,
        }
    }

    pub fn rule(&self, name: &str) -> Option<&'static FieldRule> {
        self.fields().iter().find(|rule| rule.name == name)
    }

    /// Validate an untrusted style candidate.
    ///
    /// `null` and missing candidates normalize to the empty spec. All
    /// violations are collected before failing, so a form can surface
    /// every broken field at once. Pure; never mutates the input.
    pub fn validate(&self, candidate: &Value) -> Result<StyleSpec, ValidationReport> {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        let object = match candidate {
            Value::Null => return Ok(StyleSpec::default()),
            Value::Object(map) => map,
            other => {
                return Err(ValidationReport::single(FieldViolation {
                    field: "style".to_string(),
                    message: "style must be an object".to_string(),
                    expected: Some("object".to_string()),
                    actual: Some(json_type_name(other).to_string()),
                }))
            }
        };

        let mut violations = vec![];
        let mut normalized = Map::new();

        for rule in self.fields() {
            let value = match object.get(rule.name) {
                Some(value) if !value.is_null() => value,
                _ => continue,
            };
            check_field(rule, value, &mut violations);
            normalized.insert(rule.name.to_string(), value.clone());
        }

        if !violations.is_empty() {
            return Err(ValidationReport::new(violations));
        }

        serde_json::from_value(Value::Object(normalized)).map_err(|err| {
            ValidationReport::single(FieldViolation {
                field: "style".to_string(),
                message: format!("normalization failed: {err}"),
                expected: None,
                actual: None,
            })
        })
    }
}

/// Validate the block-specific props that sit next to the style. Kept as
/// an independent structure composed with the style schema, not an
/// extension of it.
pub fn validate_props(candidate: &Value) -> Result<BlockProps, ValidationReport> {
    let object = match candidate {
        Value::Null => return Ok(BlockProps::default()),
        Value::Object(map) => map,
        other => {
            return Err(ValidationReport::single(FieldViolation {
                field: "props".to_string(),
                message: "props must be an object".to_string(),
                expected: Some("object".to_string()),
                actual: Some(json_type_name(other).to_string()),
            }))
        }
    };

    let mut violations = vec![];
    if let Some(ids) = object.get("childrenIds").filter(|v| !v.is_null()) {
        match ids.as_array() {
            Some(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    if !entry.is_string() {
                        violations.push(FieldViolation {
                            field: format!("props.childrenIds[{index}]"),
                            message: "child block id must be a string".to_string(),
                            expected: Some("string".to_string()),
                            actual: Some(json_type_name(entry).to_string()),
                        });
                    }
                }
            }
            None => violations.push(FieldViolation {
                field: "props.childrenIds".to_string(),
                message: "childrenIds must be an array".to_string(),
                expected: Some("array".to_string()),
                actual: Some(json_type_name(ids).to_string()),
            }),
        }
    }

    if !violations.is_empty() {
        return Err(ValidationReport::new(violations));
    }

    let children_ids = object.get("childrenIds").and_then(|ids| {
        ids.as_array().map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_str().map(str::to_string))
                .collect()
        })
    });

    Ok(BlockProps { children_ids })
}

fn check_field(rule: &FieldRule, value: &Value, violations: &mut Vec<FieldViolation>) {
    match rule.check {
        FieldCheck::Color => {
            let valid = value.as_str().map_or(false, HexColor::is_valid);
            if !valid {
                violations.push(violation(rule.name, "must be a #RRGGBB color", "#RRGGBB", value));
            }
        }
        FieldCheck::BoxModel => match value.as_object() {
            Some(object) => {
                for side in BOX_SIDES {
                    match object.get(*side) {
                        Some(offset) if offset.is_number() => {}
                        Some(offset) => violations.push(violation(
                            &format!("{}.{side}", rule.name),
                            "offset must be a number",
                            "number",
                            offset,
                        )),
                        None => violations.push(FieldViolation {
                            field: format!("{}.{side}", rule.name),
                            message: "offset is required".to_string(),
                            expected: Some("number".to_string()),
                            actual: None,
                        }),
                    }
                }
            }
            None => violations.push(violation(
                rule.name,
                "must be an object of four offsets",
                "object",
                value,
            )),
        },
        FieldCheck::Mode(allowed) => {
            let matched = value
                .as_str()
                .map_or(false, |text| allowed.iter().any(|mode| mode.as_str() == text));
            if !matched {
                let options: Vec<&str> = allowed.iter().map(|mode| mode.as_str()).collect();
                violations.push(violation(
                    rule.name,
                    "must be a permitted position mode",
                    &options.join("|"),
                    value,
                ));
            }
        }
        FieldCheck::OffsetGroup => match value.as_object() {
            Some(object) => {
                for side in ["top", "bottom", "left", "right"] {
                    if let Some(offset) = object.get(side).filter(|v| !v.is_null()) {
                        if !offset.is_number() {
                            violations.push(violation(
                                &format!("{}.{side}", rule.name),
                                "offset must be a number",
                                "number",
                                offset,
                            ));
                        }
                    }
                }
                if let Some(z) = object.get("zIndex").filter(|v| !v.is_null()) {
                    if !z.is_number() {
                        violations.push(violation(
                            &format!("{}.zIndex", rule.name),
                            "stacking order must be a number",
                            "number",
                            z,
                        ));
                    }
                }
            }
            None => violations.push(violation(rule.name, "must be an object", "object", value)),
        },
        FieldCheck::Number | FieldCheck::PxDimension => {
            if !value.is_number() {
                violations.push(violation(rule.name, "must be a number", "number", value));
            }
        }
        FieldCheck::CssDimension | FieldCheck::ImageList | FieldCheck::FreeString => {
            if !value.is_string() {
                violations.push(violation(rule.name, "must be a string", "string", value));
            }
        }
        FieldCheck::OverflowKeyword => {
            let matched = value
                .as_str()
                .map_or(false, |text| OVERFLOW_KEYWORDS.contains(&text));
            if !matched {
                violations.push(violation(
                    rule.name,
                    "must be a clipping keyword",
                    &OVERFLOW_KEYWORDS.join("|"),
                    value,
                ));
            }
        }
    }
}

fn violation(field: &str, message: &str, expected: &str, actual: &Value) -> FieldViolation {
    FieldViolation {
        field: field.to_string(),
        message: message.to_string(),
        expected: Some(expected.to_string()),
        actual: Some(render_actual(actual)),
    }
}

fn render_actual(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => json_type_name(other).to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
