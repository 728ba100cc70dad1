//! Editor Controls - Field Registry and Edit Commits
//!
//! The side panel is driven by a registration table mapping each editable
//! field to its control, instead of branching on field names at render
//! time. Every edit round-trips through the schema; a failed edit never
//! touches the committed spec.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::schema::{StyleSchema, ValidationReport};
use crate::style::{BlockKind, PositionMode, PositionOffsets, StyleSpec};

/// Which widget edits a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum ControlKind {
    ColorPicker,
    Slider {
        min: f64,
        max: f64,
        step: f64,
        units: &'static str,
    },
    TextDimension,
    Select {
        options: &'static [&'static str],
    },
    ImageList,
    PaddingBox,
    /// Position mode plus its offsets and stacking order, edited as one
    /// logical group.
    PositionGroup,
}

/// One registration entry: the field, its widget, and the value the
/// widget falls back to when the field is absent. Everything the panel
/// needs for a field lives in this one row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldControl {
    pub field: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub control: ControlKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl FieldControl {
    /// The absent-field fallback as a JSON value; `Null` means the
    /// control starts empty.
    pub fn default_value(&self) -> Value {
        match self.default {
            Some(value) => json!(value),
            None => Value::Null,
        }
    }
}

const CONTAINER_CONTROLS: &[FieldControl] = &[
    FieldControl { field: "backgroundColor", label: "Background color", control: ControlKind::ColorPicker, default: None },
    FieldControl { field: "backgroundImage", label: "Background image", control: ControlKind::ImageList, default: None },
    FieldControl {
        field: "backgroundSize",
        label: "Background size",
        control: ControlKind::Select { options: &["cover", "contain", "auto"] },
        default: Some("cover"),
    },
    FieldControl { field: "borderColor", label: "Border color", control: ControlKind::ColorPicker, default: None },
    FieldControl {
        field: "borderRadius",
        label: "Border radius",
        control: ControlKind::Slider { min: 0.0, max: 48.0, step: 4.0, units: "px" },
        default: None,
    },
    FieldControl { field: "padding", label: "Padding", control: ControlKind::PaddingBox, default: None },
    FieldControl { field: "margin", label: "Margin", control: ControlKind::PaddingBox, default: None },
    FieldControl { field: "position", label: "Position", control: ControlKind::PositionGroup, default: Some("relative") },
    FieldControl { field: "width", label: "Width", control: ControlKind::TextDimension, default: None },
    FieldControl { field: "height", label: "Height", control: ControlKind::TextDimension, default: None },
    FieldControl { field: "minWidth", label: "Min width", control: ControlKind::TextDimension, default: None },
    FieldControl { field: "maxWidth", label: "Max width", control: ControlKind::TextDimension, default: None },
    FieldControl { field: "minHeight", label: "Min height", control: ControlKind::TextDimension, default: None },
    FieldControl { field: "maxHeight", label: "Max height", control: ControlKind::TextDimension, default: None },
];

const LAYOUT_CONTROLS: &[FieldControl] = &[
    FieldControl { field: "backgroundColor", label: "Background color", control: ControlKind::ColorPicker, default: None },
    FieldControl { field: "backgroundImage", label: "Background image", control: ControlKind::ImageList, default: None },
    FieldControl { field: "borderColor", label: "Border color", control: ControlKind::ColorPicker, default: None },
    FieldControl {
        field: "borderRadius",
        label: "Border radius",
        control: ControlKind::Slider { min: 0.0, max: 48.0, step: 4.0, units: "px" },
        default: None,
    },
    FieldControl { field: "padding", label: "Padding", control: ControlKind::PaddingBox, default: None },
    FieldControl { field: "position", label: "Position", control: ControlKind::PositionGroup, default: Some("relative") },
    FieldControl { field: "width", label: "Width", control: ControlKind::TextDimension, default: None },
    FieldControl { field: "height", label: "Height", control: ControlKind::TextDimension, default: None },
    FieldControl {
        field: "overflow",
        label: "Overflow",
        control: ControlKind::Select { options: &["visible", "hidden", "scroll", "auto"] },
        default: Some("visible"),
    },
];

pub fn controls_for(kind: BlockKind) -> &'static [FieldControl] {
    match kind {
        BlockKind::Container => CONTAINER_CONTROLS,
        BlockKind::Layout => LAYOUT_CONTROLS,
    }
}

/// Side-panel state for one block's style: the last committed style
/// object plus its validated spec. Edits produce a new candidate which is
/// re-validated in full; rejection leaves the committed state untouched.
#[derive(Debug, Clone)]
pub struct EditorPanel {
    schema: StyleSchema,
    committed: Value,
    spec: StyleSpec,
}

impl EditorPanel {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            schema: StyleSchema::for_kind(kind),
            committed: Value::Object(Map::new()),
            spec: StyleSpec::default(),
        }
    }

    /// Open the panel over a previously saved style object.
    pub fn from_saved(kind: BlockKind, style: &Value) -> Result<Self, ValidationReport> {
        let schema = StyleSchema::for_kind(kind);
        let spec = schema.validate(style)?;
        let committed = match style {
            Value::Object(_) => style.clone(),
            _ => Value::Object(Map::new()),
        };
        Ok(Self {
            schema,
            committed,
            spec,
        })
    }

    pub fn kind(&self) -> BlockKind {
        self.schema.kind()
    }

    pub fn spec(&self) -> &StyleSpec {
        &self.spec
    }

    /// The committed style object, as it would be persisted.
    pub fn committed(&self) -> &Value {
        &self.committed
    }

    pub fn controls(&self) -> &'static [FieldControl] {
        controls_for(self.schema.kind())
    }

    /// Set one field and re-validate the whole style. On failure the
    /// report is returned and the previously committed spec stays live.
    pub fn set_field(&mut self, field: &str, value: Value) -> Result<&StyleSpec, ValidationReport> {
        let mut candidate = self.committed.clone();
        if let Value::Object(object) = &mut candidate {
            if value.is_null() {
                object.remove(field);
            } else {
                object.insert(field.to_string(), value);
            }
        }
        self.commit(candidate)
    }

    /// Remove a field entirely; absence is always valid.
    pub fn clear_field(&mut self, field: &str) -> &StyleSpec {
        let mut candidate = self.committed.clone();
        if let Value::Object(object) = &mut candidate {
            object.remove(field);
        }
        if let Ok(spec) = self.schema.validate(&candidate) {
            self.committed = candidate;
            self.spec = spec;
        }
        &self.spec
    }

    /// Edit the position logical group in one transaction: mode, the four
    /// offsets, and the stacking order. The container variant stores the
    /// offsets flat; the layout variant groups them under positionValues.
    pub fn set_position(
        &mut self,
        mode: PositionMode,
        offsets: PositionOffsets,
    ) -> Result<&StyleSpec, ValidationReport> {
        let mut candidate = self.committed.clone();
        if let Value::Object(object) = &mut candidate {
            object.insert("position".to_string(), json!(mode.as_str()));
            match self.schema.kind() {
                BlockKind::Container => {
                    set_or_remove(object, "top", offsets.top.map(|v| json!(v)));
                    set_or_remove(object, "bottom", offsets.bottom.map(|v| json!(v)));
                    set_or_remove(object, "left", offsets.left.map(|v| json!(v)));
                    set_or_remove(object, "right", offsets.right.map(|v| json!(v)));
                    set_or_remove(object, "zIndex", offsets.z_index.map(|v| json!(v)));
                }
                BlockKind::Layout => {
                    let mut group = Map::new();
                    if let Some(top) = offsets.top {
                        group.insert("top".to_string(), json!(top));
                    }
                    if let Some(bottom) = offsets.bottom {
                        group.insert("bottom".to_string(), json!(bottom));
                    }
                    if let Some(left) = offsets.left {
                        group.insert("left".to_string(), json!(left));
                    }
                    if let Some(right) = offsets.right {
                        group.insert("right".to_string(), json!(right));
                    }
                    if let Some(z_index) = offsets.z_index {
                        group.insert("zIndex".to_string(), json!(z_index));
                    }
                    object.insert("positionValues".to_string(), Value::Object(group));
                }
            }
        }
        self.commit(candidate)
    }

    fn commit(&mut self, candidate: Value) -> Result<&StyleSpec, ValidationReport> {
        let spec = self.schema.validate(&candidate)?;
        self.committed = candidate;
        self.spec = spec;
        Ok(&self.spec)
    }
}

fn set_or_remove(object: &mut Map<String, Value>, field: &str, value: Option<Value>) {
    match value {
        Some(value) => {
            object.insert(field.to_string(), value);
        }
        None => {
            object.remove(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StyleSchema;

    #[test]
    fn test_control_table_is_total_over_schema() {
        for kind in [BlockKind::Container, BlockKind::Layout] {
            let schema = StyleSchema::for_kind(kind);
            for control in controls_for(kind) {
                assert!(
                    schema.rule(control.field).is_some(),
                    "{} has no schema rule",
                    control.field
                );
                // A registered fallback must itself pass the same schema
                // the control commits through.
                if control.default.is_some() {
                    let candidate = json!({ control.field: control.default_value() });
                    assert!(
                        schema.validate(&candidate).is_ok(),
                        "{} default does not validate",
                        control.field
                    );
                }
            }
        }
    }

    #[test]
    fn test_control_defaults_come_from_the_table() {
        let find = |kind, field: &str| {
            controls_for(kind)
                .iter()
                .find(|control| control.field == field)
                .unwrap()
                .default_value()
        };
        assert_eq!(find(BlockKind::Container, "position"), json!("relative"));
        assert_eq!(find(BlockKind::Container, "backgroundSize"), json!("cover"));
        assert_eq!(find(BlockKind::Layout, "overflow"), json!("visible"));
        assert_eq!(find(BlockKind::Layout, "backgroundColor"), Value::Null);
    }

    #[test]
    fn test_valid_edit_commits() {
        let mut panel = EditorPanel::new(BlockKind::Container);
        let spec = panel
            .set_field("backgroundColor", json!("#f5f5f5"))
            .unwrap();
        assert_eq!(spec.background_color.as_ref().unwrap().as_str(), "#f5f5f5");
    }

    #[test]
    fn test_rejected_edit_keeps_last_good_spec() {
        let mut panel = EditorPanel::new(BlockKind::Container);
        panel.set_field("backgroundColor", json!("#aabbcc")).unwrap();

        let report = panel
            .set_field("backgroundColor", json!("not-a-color"))
            .unwrap_err();
        assert!(report.mentions("backgroundColor"));
        assert_eq!(
            panel.spec().background_color.as_ref().unwrap().as_str(),
            "#aabbcc"
        );
        assert_eq!(panel.committed()["backgroundColor"], json!("#aabbcc"));
    }

    #[test]
    fn test_clear_field_always_succeeds() {
        let mut panel = EditorPanel::new(BlockKind::Layout);
        panel.set_field("overflow", json!("scroll")).unwrap();
        let spec = panel.clear_field("overflow");
        assert!(spec.overflow.is_none());
    }

    #[test]
    fn test_position_group_edits_atomically() {
        let mut panel = EditorPanel::new(BlockKind::Layout);
        panel
            .set_position(
                PositionMode::Absolute,
                PositionOffsets {
                    top: Some(10.0),
                    left: Some(20.0),
                    z_index: Some(2.0),
                    ..Default::default()
                },
            )
            .unwrap();

        let values = panel.spec().position_values.unwrap();
        assert_eq!(panel.spec().position, Some(PositionMode::Absolute));
        assert_eq!(values.top, Some(10.0));
        assert_eq!(values.left, Some(20.0));
        assert_eq!(values.z_index, Some(2.0));
    }

    #[test]
    fn test_layout_rejects_container_only_mode() {
        let mut panel = EditorPanel::new(BlockKind::Layout);
        let report = panel.set_field("position", json!("fixed")).unwrap_err();
        assert!(report.mentions("position"));
        assert!(panel.spec().position.is_none());
    }
}
