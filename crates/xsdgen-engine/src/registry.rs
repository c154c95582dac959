//! Schema mapping registry
//!
//! Owns the schema documents of one export and remembers, for each
//! document, the type whose mapping created it. The mapper decides on its
//! own whether a type lands in a new document or is merged into an open
//! one; the registry only learns about new documents through the insertion
//! hook of [`MappingScope`].

use std::collections::HashMap;
use xsdgen_core::{TypeDescriptor, ValidationDiagnostic};
use xsdgen_metadata::TypeIndex;
use xsdgen_schema::{MappingError, SchemaCompiler, SchemaDocument, SchemaMapper, SchemaSink, XmlTypeMapper};

/// Accumulated schema documents and their creating types
pub struct SchemaMappingRegistry {
    /// Documents in creation order
    documents: Vec<SchemaDocument>,

    /// Document index -> type whose mapping created the document
    associations: HashMap<usize, TypeDescriptor>,

    mapper: Box<dyn SchemaMapper>,

    /// Number of compile passes run
    compilations: usize,
}

impl SchemaMappingRegistry {
    pub fn new(mapper: impl SchemaMapper + 'static) -> Self {
        Self {
            documents: Vec::new(),
            associations: HashMap::new(),
            mapper: Box::new(mapper),
            compilations: 0,
        }
    }

    /// Map a type, merging into open documents or creating new ones
    ///
    /// Every document created during this call is associated with `ty`
    /// unless it already has an association.
    pub fn map_type(&mut self, ty: &TypeDescriptor, known: &TypeIndex) -> Result<(), MappingError> {
        let mut scope = MappingScope {
            documents: &mut self.documents,
            associations: &mut self.associations,
            current: Some(ty),
        };

        self.mapper.map_type(ty, known, &mut scope)
    }

    /// Compile all documents not compiled yet
    ///
    /// Diagnostics are passed to `on_diagnostic` before this returns.
    /// Documents added by compilation carry no association.
    pub fn compile(&mut self, on_diagnostic: &mut dyn FnMut(ValidationDiagnostic), full_compile: bool) {
        self.compilations += 1;
        let mut scope = MappingScope {
            documents: &mut self.documents,
            associations: &mut self.associations,
            current: None,
        };

        SchemaCompiler::new(full_compile).compile(&mut scope, on_diagnostic);
    }

    /// Documents in creation order with their creating type, if any
    pub fn enumerate(&self) -> impl Iterator<Item = (&SchemaDocument, Option<&TypeDescriptor>, usize)> {
        self.documents
            .iter()
            .enumerate()
            .map(move |(index, doc)| (doc, self.associations.get(&index), index))
    }

    pub fn association(&self, index: usize) -> Option<&TypeDescriptor> {
        self.associations.get(&index)
    }

    pub fn compilations(&self) -> usize {
        self.compilations
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Default for SchemaMappingRegistry {
    fn default() -> Self {
        Self::new(XmlTypeMapper::new())
    }
}

/// Document collection as seen by one mapping or compile call
///
/// `current` is the type being mapped; `None` while compiling.
struct MappingScope<'r> {
    documents: &'r mut Vec<SchemaDocument>,
    associations: &'r mut HashMap<usize, TypeDescriptor>,
    current: Option<&'r TypeDescriptor>,
}

impl SchemaSink for MappingScope<'_> {
    fn documents(&self) -> &[SchemaDocument] {
        self.documents.as_slice()
    }

    fn document_mut(&mut self, index: usize) -> &mut SchemaDocument {
        &mut self.documents[index]
    }

    fn insert(&mut self, document: SchemaDocument) -> usize {
        let index = self.documents.len();
        self.documents.push(document);

        if let Some(ty) = self.current {
            self.associations.entry(index).or_insert_with(|| ty.clone());
            tracing::debug!(index, type_name = %ty.full_name, "associated schema document");
        }

        index
    }
}
