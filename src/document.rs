//! Document Model - Persisted Blocks and the Reader Path
//!
//! A saved document is a flat map of block records plus a root id. Loading
//! validates once: engine compatibility, fingerprint, then every block's
//! style through its schema. A failure here is a corrupt document and is
//! surfaced as such, never rendered with guessed defaults.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::block::render_block;
use crate::hashing;
use crate::schema::{validate_props, StyleSchema, ValidationReport};
use crate::style::{BlockId, BlockKind, BlockProps, StyleSpec};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid version string: {0}")]
    InvalidVersion(String),

    #[error("document requires engine >= {required}, current is {current}")]
    EngineVersionMismatch { required: String, current: String },

    #[error("fingerprint mismatch: expected {expected}, computed {actual}")]
    FingerprintMismatch { expected: String, actual: String },

    #[error("unknown block type for {block_id}: {block_type}")]
    UnknownBlockType { block_id: BlockId, block_type: String },

    #[error("block {block_id} failed validation: {report}")]
    CorruptBlock {
        block_id: BlockId,
        report: ValidationReport,
    },

    #[error("root block {0} not found")]
    MissingRoot(BlockId),

    #[error("child block {child_id} of {parent_id} not found")]
    MissingChild {
        parent_id: BlockId,
        child_id: BlockId,
    },

    #[error("children cycle through block {0}")]
    Cycle(BlockId),

    #[error("block {0} has malformed props")]
    MalformedProps(BlockId),
}

/// One stored block record: `{ "type": ..., "data": { style, props } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRecord {
    #[serde(rename = "type")]
    pub block_type: String,
    pub data: BlockData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Value>,
}

fn default_engine_min() -> String {
    crate::MIN_DOCUMENT_ENGINE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub version: String,
    #[serde(default = "default_engine_min")]
    pub engine_min_version: String,
    pub root: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub blocks: HashMap<BlockId, BlockRecord>,
}

impl Document {
    /// Fresh document with an empty container at the root.
    pub fn new() -> Self {
        let root = Uuid::new_v4().to_string();
        let mut blocks = HashMap::new();
        blocks.insert(
            root.clone(),
            BlockRecord {
                block_type: BlockKind::Container.as_str().to_string(),
                data: BlockData::default(),
            },
        );
        Self {
            version: "1.0.0".to_string(),
            engine_min_version: default_engine_min(),
            root,
            saved_at: None,
            fingerprint: None,
            blocks,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let document: Self = serde_json::from_str(text)?;
        document.check_engine_version()?;
        document.verify_fingerprint()?;
        Ok(document)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), DocumentError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    fn check_engine_version(&self) -> Result<(), DocumentError> {
        let current = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| DocumentError::InvalidVersion(ENGINE_VERSION.to_string()))?;
        let required = semver::Version::parse(&self.engine_min_version)
            .map_err(|_| DocumentError::InvalidVersion(self.engine_min_version.clone()))?;

        if current < required {
            return Err(DocumentError::EngineVersionMismatch {
                required: self.engine_min_version.clone(),
                current: ENGINE_VERSION.to_string(),
            });
        }
        Ok(())
    }

    fn verify_fingerprint(&self) -> Result<(), DocumentError> {
        if let Some(expected) = &self.fingerprint {
            let actual = self.content_fingerprint()?;
            if &actual != expected {
                return Err(DocumentError::FingerprintMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Fingerprint over the stable content only; the fingerprint itself
    /// and the save stamp are excluded.
    pub fn content_fingerprint(&self) -> Result<String, serde_json::Error> {
        let content = serde_json::json!({
            "version": self.version,
            "engineMinVersion": self.engine_min_version,
            "root": self.root,
            "blocks": self.blocks,
        });
        hashing::fingerprint(&content)
    }

    /// Stamp the save time and recompute the fingerprint. Call before
    /// persisting.
    pub fn seal(&mut self) -> Result<(), DocumentError> {
        self.saved_at = Some(Utc::now());
        self.fingerprint = Some(self.content_fingerprint()?);
        Ok(())
    }

    /// Insert a new block after validating its style and props; the
    /// editor path goes through here so an invalid block never lands in
    /// the document. Returns the generated block id.
    pub fn insert_block(
        &mut self,
        kind: BlockKind,
        style: Value,
        props: Value,
    ) -> Result<BlockId, DocumentError> {
        let id = Uuid::new_v4().to_string();
        StyleSchema::for_kind(kind)
            .validate(&style)
            .map_err(|report| DocumentError::CorruptBlock {
                block_id: id.clone(),
                report,
            })?;
        validate_props(&props).map_err(|report| DocumentError::CorruptBlock {
            block_id: id.clone(),
            report,
        })?;

        self.blocks.insert(
            id.clone(),
            BlockRecord {
                block_type: kind.as_str().to_string(),
                data: BlockData {
                    style: if style.is_null() { None } else { Some(style) },
                    props: if props.is_null() { None } else { Some(props) },
                },
            },
        );
        Ok(id)
    }

    /// Append a child id to a parent's childrenIds list.
    pub fn attach_child(&mut self, parent_id: &str, child_id: &str) -> Result<(), DocumentError> {
        let parent = self
            .blocks
            .get_mut(parent_id)
            .ok_or_else(|| DocumentError::MissingChild {
                parent_id: parent_id.to_string(),
                child_id: child_id.to_string(),
            })?;

        let props = parent
            .data
            .props
            .get_or_insert_with(|| serde_json::json!({}));
        let Value::Object(object) = props else {
            return Err(DocumentError::MalformedProps(parent_id.to_string()));
        };
        let ids = object
            .entry("childrenIds")
            .or_insert_with(|| Value::Array(vec![]));
        let Value::Array(entries) = ids else {
            return Err(DocumentError::MalformedProps(parent_id.to_string()));
        };
        entries.push(Value::String(child_id.to_string()));
        Ok(())
    }

    /// Validate every block once, producing the typed document the reader
    /// renders from.
    pub fn validate(&self) -> Result<ValidatedDocument, DocumentError> {
        if !self.blocks.contains_key(&self.root) {
            return Err(DocumentError::MissingRoot(self.root.clone()));
        }

        let mut blocks = HashMap::new();
        for (id, record) in &self.blocks {
            let kind = parse_block_kind(&record.block_type).ok_or_else(|| {
                DocumentError::UnknownBlockType {
                    block_id: id.clone(),
                    block_type: record.block_type.clone(),
                }
            })?;

            let style_value = record.data.style.clone().unwrap_or(Value::Null);
            let style = StyleSchema::for_kind(kind)
                .validate(&style_value)
                .map_err(|report| DocumentError::CorruptBlock {
                    block_id: id.clone(),
                    report,
                })?;

            let props_value = record.data.props.clone().unwrap_or(Value::Null);
            let props = validate_props(&props_value).map_err(|report| {
                DocumentError::CorruptBlock {
                    block_id: id.clone(),
                    report,
                }
            })?;

            blocks.insert(id.clone(), ValidBlock { kind, style, props });
        }

        Ok(ValidatedDocument {
            root: self.root.clone(),
            blocks,
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_block_kind(block_type: &str) -> Option<BlockKind> {
    match block_type {
        "Container" => Some(BlockKind::Container),
        "Layout" => Some(BlockKind::Layout),
        _ => None,
    }
}

/// One block after validation: typed kind, normalized style, typed props.
#[derive(Debug, Clone)]
pub struct ValidBlock {
    pub kind: BlockKind,
    pub style: StyleSpec,
    pub props: BlockProps,
}

/// The reader's view: every block validated, render is read-only.
#[derive(Debug, Clone)]
pub struct ValidatedDocument {
    pub root: BlockId,
    pub blocks: HashMap<BlockId, ValidBlock>,
}

impl ValidatedDocument {
    pub fn get(&self, id: &str) -> Option<&ValidBlock> {
        self.blocks.get(id)
    }

    /// Render the whole tree from the root. A missing child id or a
    /// cycle in childrenIds is a corrupt document, reported not skipped.
    pub fn render(&self) -> Result<String, DocumentError> {
        if !self.blocks.contains_key(&self.root) {
            return Err(DocumentError::MissingRoot(self.root.clone()));
        }
        let mut stack = vec![];
        self.render_node(&self.root, &mut stack)
    }

    fn render_node(&self, id: &BlockId, stack: &mut Vec<BlockId>) -> Result<String, DocumentError> {
        if stack.contains(id) {
            return Err(DocumentError::Cycle(id.clone()));
        }
        let block = self.blocks.get(id).ok_or_else(|| DocumentError::MissingChild {
            parent_id: stack.last().cloned().unwrap_or_default(),
            child_id: id.clone(),
        })?;

        stack.push(id.clone());
        let mut children = String::new();
        for child_id in block.props.children_ids.iter().flatten() {
            children.push_str(&self.render_node(child_id, stack)?);
        }
        stack.pop();

        Ok(render_block(block.kind, &block.style, &children))
    }
}
