//! Replicated-document integration using Loro.
//!
//! The external CRDT engine is consumed as an opaque key-value map:
//!
//! ```text
//! LoroDoc
//! └── "elements": LoroMap<ElementId, LoroMap> (element data)
//! ```
//!
//! Each entry is a LoroMap with a `"type"` tag plus the element's fields;
//! see `convert.rs` for the exact key layout.

mod convert;
mod schema;

pub use convert::{element_from_loro, element_to_loro};
pub use schema::{ReplicatedDocument, ELEMENTS_KEY};

// Re-export Loro types that surface in the public API
pub use loro::VersionVector;
