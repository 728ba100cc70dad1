//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees: every edit and every
//! load passes through schema validation, resolution is pure, and the
//! reader renders exactly what was saved.

use serde_json::{json, Value};

use mailblock_core::{
    resolve_for, BlockKind, Document, DocumentError, EditorPanel, PositionMode, PositionOffsets,
    StyleSchema,
};

fn sample_document() -> Document {
    let mut document = Document::new();
    let root = document.root.clone();

    let layout = document
        .insert_block(
            BlockKind::Layout,
            json!({
                "position": "absolute",
                "positionValues": {"top": 10, "left": 20, "zIndex": 2},
                "backgroundColor": "#f5f5f5",
                "height": "300px"
            }),
            Value::Null,
        )
        .unwrap();
    document.attach_child(&root, &layout).unwrap();

    let inner = document
        .insert_block(
            BlockKind::Container,
            json!({
                "padding": {"top": 4, "bottom": 4, "left": 8, "right": 8},
                "backgroundImage": "linear-gradient(red,blue),https://x.com/a.png"
            }),
            Value::Null,
        )
        .unwrap();
    document.attach_child(&layout, &inner).unwrap();

    document
}

#[test]
fn invariant_editor_commit_round_trips_through_schema() {
    // The end-to-end editing scenario: reposition a container and give it
    // a background, then resolve the committed spec.
    let mut panel = EditorPanel::new(BlockKind::Container);
    panel
        .set_field("backgroundColor", json!("#f5f5f5"))
        .unwrap();
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

    let resolved = resolve_for(BlockKind::Container, panel.spec());
    assert_eq!(resolved.position, Some(PositionMode::Absolute));
    assert_eq!(resolved.top, Some(10.0));
    assert_eq!(resolved.left, Some(20.0));
    assert_eq!(resolved.z_index, Some(2.0));
    assert_eq!(resolved.background_color.as_deref(), Some("#f5f5f5"));
    assert_eq!(resolved.background_size.as_deref(), Some("cover"));
    assert_eq!(resolved.border, None);
}

#[test]
fn invariant_rejected_edit_never_reaches_committed_state() {
    let mut panel = EditorPanel::new(BlockKind::Container);
    panel.set_field("borderColor", json!("#112233")).unwrap();
    let before = panel.spec().clone();
    let before_value = panel.committed().clone();

    assert!(panel.set_field("borderColor", json!("#1122")).is_err());
    assert!(panel.set_field("padding", json!({"top": 1})).is_err());

    assert_eq!(panel.spec(), &before);
    assert_eq!(panel.committed(), &before_value);
}

#[test]
fn invariant_resolution_is_pure_and_deterministic() {
    let schema = StyleSchema::container();
    let spec = schema
        .validate(&json!({
            "backgroundImage": "linear-gradient(red,blue),https://x.com/a.png",
            "borderColor": "#abcdef",
            "padding": {"top": 4, "bottom": 4, "left": 8, "right": 8}
        }))
        .unwrap();

    let first = resolve_for(BlockKind::Container, &spec);
    let second = resolve_for(BlockKind::Container, &spec);
    assert_eq!(first, second);
    assert_eq!(
        first.background_image.as_deref(),
        Some("linear-gradient(red,blue),url(\"https://x.com/a.png\")")
    );
    assert_eq!(first.border.as_deref(), Some("1px solid #abcdef"));
    assert_eq!(first.padding.as_deref(), Some("4px 8px 4px 8px"));
}

#[test]
fn invariant_partial_box_model_never_resolves() {
    let schema = StyleSchema::container();
    // A partial object fails validation outright, so resolution can never
    // see it and fill in zeros.
    assert!(schema.validate(&json!({"margin": {"top": 4}})).is_err());

    let spec = schema.validate(&json!({})).unwrap();
    assert_eq!(resolve_for(BlockKind::Container, &spec).margin, None);
}

#[test]
fn invariant_save_load_render_round_trip() {
    let mut document = sample_document();
    let before = document.validate().unwrap().render().unwrap();

    document.seal().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    document.save_to_file(&path).unwrap();

    let reloaded = Document::load_from_file(&path).unwrap();
    let after = reloaded.validate().unwrap().render().unwrap();

    assert_eq!(before, after);
    assert_eq!(
        document.content_fingerprint().unwrap(),
        reloaded.content_fingerprint().unwrap()
    );
}

#[test]
fn invariant_corrupt_document_is_surfaced_not_repaired() {
    let mut document = sample_document();
    let root = document.root.clone();
    if let Some(record) = document.blocks.get_mut(&root) {
        record.data.style = Some(json!({"backgroundColor": "#zzzzzz"}));
    }

    match document.validate() {
        Err(DocumentError::CorruptBlock { block_id, report }) => {
            assert_eq!(block_id, root);
            assert!(report.mentions("backgroundColor"));
        }
        other => panic!("expected corrupt block, got {other:?}"),
    }
}

#[test]
fn invariant_reader_uses_the_editor_schema() {
    // A style committed by the editor loads back as the identical spec.
    let mut panel = EditorPanel::new(BlockKind::Layout);
    panel.set_field("overflow", json!("hidden")).unwrap();
    panel.set_field("width", json!("50%")).unwrap();

    let mut document = Document::new();
    let root = document.root.clone();
    let id = document
        .insert_block(BlockKind::Layout, panel.committed().clone(), Value::Null)
        .unwrap();
    document.attach_child(&root, &id).unwrap();

    let validated = document.validate().unwrap();
    assert_eq!(&validated.get(&id).unwrap().style, panel.spec());
}

#[test]
fn invariant_empty_blocks_still_render_boxes() {
    let document = Document::new();
    let html = document.validate().unwrap().render().unwrap();
    assert_eq!(html, "<div style=\"background-size:cover\"></div>");
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_every_edit_calls_validate() {
    use mailblock_core::schema::get_validation_call_count;

    // The counter is global, so other tests may bump it concurrently;
    // only the delta from this panel's edits is asserted.
    let before = get_validation_call_count();
    let mut panel = EditorPanel::new(BlockKind::Container);
    panel.set_field("backgroundColor", json!("#ffffff")).unwrap();
    let _ = panel.set_field("backgroundColor", json!("oops"));
    panel.set_field("borderRadius", json!(8)).unwrap();

    assert!(get_validation_call_count() - before >= 3);
}
