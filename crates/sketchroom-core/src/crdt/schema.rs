//! Loro document schema and operations.

use super::convert::{element_from_loro, element_to_loro};
use crate::elements::{Element, ElementId};
use loro::{ExportMode, LoroDoc, LoroMap, LoroResult, LoroValue};

/// Key for the elements map in the document.
pub const ELEMENTS_KEY: &str = "elements";

/// The shared replicated document: a CRDT-backed map of elements keyed by
/// element id.
///
/// Writes are whole-value replaces at element granularity. The underlying
/// engine merges concurrent edits to *different* elements; concurrent edits
/// to one element's sub-fields are last-writer-wins, an accepted limitation
/// of this schema.
pub struct ReplicatedDocument {
    doc: LoroDoc,
}

impl ReplicatedDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self { doc: LoroDoc::new() }
    }

    /// Create a document from a snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> LoroResult<Self> {
        let doc = LoroDoc::new();
        doc.import(bytes)?;
        Ok(Self { doc })
    }

    /// Get the underlying Loro document.
    pub fn loro_doc(&self) -> &LoroDoc {
        &self.doc
    }

    fn elements_map(&self) -> LoroMap {
        self.doc.get_map(ELEMENTS_KEY)
    }

    /// Number of elements in the document.
    pub fn element_count(&self) -> usize {
        self.elements_map().len()
    }

    /// Write an element under its id, replacing any existing value whole.
    pub fn set_element(&mut self, element: &Element) -> LoroResult<()> {
        let id = element.id().to_string();
        let elements = self.elements_map();

        if elements.get(&id).is_some() {
            elements.delete(&id)?;
        }
        let entry = elements.insert_container(&id, LoroMap::new())?;
        element_to_loro(element, &entry)?;

        self.doc.commit();
        Ok(())
    }

    /// Delete an element by id. Missing ids are a no-op.
    pub fn remove_element(&mut self, id: ElementId) -> LoroResult<()> {
        let key = id.to_string();
        let elements = self.elements_map();
        if elements.get(&key).is_some() {
            elements.delete(&key)?;
            self.doc.commit();
        }
        Ok(())
    }

    /// Read one element by id.
    pub fn get_element(&self, id: ElementId) -> Option<Element> {
        let key = id.to_string();
        if let LoroValue::Map(map) = self.elements_map().get_deep_value() {
            if let Some(LoroValue::Map(entry)) = map.get(&key) {
                return element_from_loro(entry);
            }
        }
        None
    }

    /// All current element values, in id order.
    ///
    /// The replicated map carries no z-order; materialization is made
    /// deterministic by sorting on the id key.
    pub fn elements(&self) -> Vec<Element> {
        let value = self.elements_map().get_deep_value();
        let LoroValue::Map(map) = value else {
            return Vec::new();
        };

        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort();

        keys.into_iter()
            .filter_map(|key| match map.get(key) {
                Some(LoroValue::Map(entry)) => element_from_loro(entry),
                _ => None,
            })
            .collect()
    }

    /// Export the document as a full snapshot.
    pub fn export_snapshot(&self) -> Vec<u8> {
        self.doc.export(ExportMode::Snapshot).unwrap_or_default()
    }

    /// Export incremental updates since a version.
    pub fn export_updates(&self, since: &loro::VersionVector) -> Vec<u8> {
        self.doc.export(ExportMode::updates(since)).unwrap_or_default()
    }

    /// Import remote bytes (snapshot or updates).
    pub fn import(&mut self, bytes: &[u8]) -> LoroResult<()> {
        self.doc.import(bytes)?;
        Ok(())
    }

    /// Current version vector.
    pub fn version(&self) -> loro::VersionVector {
        self.doc.oplog_vv()
    }
}

impl Default for ReplicatedDocument {
    fn default() -> Self {
        Self::new()
    }
}
