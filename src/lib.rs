//! MailBlock Core - Visual Email Template Engine
//!
//! # The Four Rules (Non-Negotiable)
//! 1. Schemas Are Contracts
//! 2. Validation Is Protective
//! 3. Resolution Is Pure
//! 4. Readers Never Guess

pub mod block;
pub mod document;
pub mod editor;
pub mod hashing;
pub mod resolve;
pub mod schema;
pub mod style;

pub use block::{render_block, resolve_for};
pub use document::{Document, DocumentError, ValidBlock, ValidatedDocument};
pub use editor::{controls_for, ControlKind, EditorPanel, FieldControl};
pub use hashing::{canonical_json, fingerprint, sha256_hex};
pub use resolve::ResolvedStyle;
pub use schema::{FieldViolation, StyleSchema, ValidationReport};
pub use style::{
    BlockId, BlockKind, BlockProps, BoxOffsets, Dimension, HexColor, Overflow, PositionMode,
    PositionOffsets, StyleSpec,
};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_DOCUMENT_ENGINE: &str = "1.0.0";
