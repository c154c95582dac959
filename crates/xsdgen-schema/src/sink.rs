//! Ordered document collection seen by the mapper and the compiler

use crate::document::SchemaDocument;

/// Ordered, append-only collection of schema documents
///
/// `insert` is the only way a document enters the collection, so an
/// implementation can observe every newly created document at the moment it
/// is created. Indices are stable: documents are never removed or reordered.
pub trait SchemaSink {
    /// All documents in creation order
    fn documents(&self) -> &[SchemaDocument];

    fn document_mut(&mut self, index: usize) -> &mut SchemaDocument;

    /// Append a new document and return its index
    fn insert(&mut self, document: SchemaDocument) -> usize;

    /// Index of the first open document for a namespace
    fn find_open(&self, namespace: &Option<String>) -> Option<usize> {
        self.documents()
            .iter()
            .position(|doc| doc.is_open() && &doc.target_namespace == namespace)
    }
}

impl SchemaSink for Vec<SchemaDocument> {
    fn documents(&self) -> &[SchemaDocument] {
        self
    }

    fn document_mut(&mut self, index: usize) -> &mut SchemaDocument {
        &mut self[index]
    }

    fn insert(&mut self, document: SchemaDocument) -> usize {
        self.push(document);
        self.len() - 1
    }
}
