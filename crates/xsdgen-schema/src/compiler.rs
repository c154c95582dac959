//! Schema compilation
//!
//! Consolidates the documents produced by mapping: supplies the support
//! types, resolves references across documents and adds the imports they
//! need, then checks structural consistency. Compiled documents are closed;
//! later mappings into the same namespace start a new document.

use regex::Regex;
use std::collections::HashSet;
use xsdgen_core::ValidationDiagnostic;
use crate::document::{SchemaDocument, SchemaItem, SUPPORT_NAMESPACE};
use crate::sink::SchemaSink;
use crate::writer::{position_of, SchemaWriter};

/// Compiles the open documents of a sink
#[derive(Debug, Clone)]
pub struct SchemaCompiler {
    full: bool,
    ncname: Regex,
}

impl SchemaCompiler {
    /// `full = false` limits compilation to import and reference resolution
    ///
    /// Full compilation also reports repeated target namespaces and
    /// structural problems.
    pub fn new(full: bool) -> Self {
        Self {
            full,
            ncname: Regex::new(r"^[\p{L}_][\p{L}\p{N}_.\-]*$").expect("valid NCName pattern"),
        }
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Compile every open document, reporting each issue through `on_diagnostic`
    pub fn compile(
        &self,
        sink: &mut dyn SchemaSink,
        on_diagnostic: &mut dyn FnMut(ValidationDiagnostic),
    ) {
        let pending: Vec<usize> = pending_documents(sink.documents());
        if pending.is_empty() {
            return;
        }

        let mut pending = pending;
        if let Some(index) = self.supply_support_types(sink, &pending) {
            pending.push(index);
        }

        for &index in &pending {
            self.resolve_references(sink, index, on_diagnostic);
        }

        if self.full {
            for &index in &pending {
                let doc = &sink.documents()[index];
                let duplicate = sink.documents()[..index]
                    .iter()
                    .any(|other| other.target_namespace == doc.target_namespace);

                if duplicate {
                    on_diagnostic(
                        ValidationDiagnostic::warning(format!(
                            "The target namespace '{}' is already declared by another schema document.",
                            doc.target_namespace.as_deref().unwrap_or("")
                        ))
                        .with_namespace(doc.target_namespace.clone()),
                    );
                }

                self.check_structure(doc, on_diagnostic);
            }
        }

        for &index in &pending {
            sink.document_mut(index).compiled = true;
        }

        tracing::debug!(documents = pending.len(), full = self.full, "compiled schema documents");
    }

    /// Insert the support types document when an open document needs it
    fn supply_support_types(&self, sink: &mut dyn SchemaSink, pending: &[usize]) -> Option<usize> {
        let support = Some(SUPPORT_NAMESPACE.to_string());
        let docs = sink.documents();

        let needed = pending
            .iter()
            .any(|&i| docs[i].referenced_namespaces().contains(&support));
        let present = docs.iter().any(|doc| doc.target_namespace == support);

        if needed && !present {
            Some(sink.insert(SchemaDocument::support_types()))
        } else {
            None
        }
    }

    fn resolve_references(
        &self,
        sink: &mut dyn SchemaSink,
        index: usize,
        on_diagnostic: &mut dyn FnMut(ValidationDiagnostic),
    ) {
        let docs = sink.documents();
        let doc = &docs[index];
        let mut imports = Vec::new();
        let mut unresolved = Vec::new();

        for reference in doc.references() {
            let namespace = &reference.target.namespace;
            let declared = !doc.is_unresolved(&reference)
                && docs.iter().any(|d| {
                    &d.target_namespace == namespace && d.declares_type(&reference.target.local)
                });

            if declared {
                if namespace != &doc.target_namespace && !imports.contains(namespace) {
                    imports.push(namespace.clone());
                }
            } else {
                unresolved.push(reference);
            }
        }

        let doc = sink.document_mut(index);
        for namespace in imports {
            doc.add_import(namespace);
        }

        if unresolved.is_empty() {
            return;
        }

        // Positions refer to the document as it will be written
        let rendered = SchemaWriter::default().render(doc);
        for reference in unresolved {
            let (line, column) = position_of(&rendered, &reference.path);
            on_diagnostic(
                ValidationDiagnostic::error(format!(
                    "Type '{}' is not declared.",
                    reference.target
                ))
                .with_position(line, column)
                .with_namespace(doc.target_namespace.clone()),
            );
        }
    }

    fn check_structure(
        &self,
        doc: &SchemaDocument,
        on_diagnostic: &mut dyn FnMut(ValidationDiagnostic),
    ) {
        let rendered = SchemaWriter::default().render(doc);
        let mut report = |diagnostic: ValidationDiagnostic, path: &[String]| {
            let (line, column) = position_of(&rendered, path);
            on_diagnostic(
                diagnostic
                    .with_position(line, column)
                    .with_namespace(doc.target_namespace.clone()),
            );
        };

        let mut globals = HashSet::new();
        for item in &doc.items {
            let name = item.name().to_string();

            if !self.ncname.is_match(&name) {
                report(
                    ValidationDiagnostic::error(format!("The name '{}' is not a valid NCName.", name)),
                    &[name.clone()],
                );
            }

            match item {
                SchemaItem::Element(_) => {
                    if !globals.insert(name.clone()) {
                        report(
                            ValidationDiagnostic::error(format!(
                                "The global element '{}' has already been declared.",
                                name
                            )),
                            &[],
                        );
                    }
                }
                SchemaItem::ComplexType(t) => {
                    if t.is_empty() {
                        report(
                            ValidationDiagnostic::warning(format!(
                                "The complex type '{}' has no content.",
                                t.name
                            )),
                            &[t.name.clone()],
                        );
                    }

                    let mut elements = HashSet::new();
                    for particle in &t.sequence {
                        self.check_member_name(&t.name, &particle.name, &mut elements, "element", &mut report);
                    }

                    let mut attributes = HashSet::new();
                    for attribute in &t.attributes {
                        self.check_member_name(&t.name, &attribute.name, &mut attributes, "attribute", &mut report);
                    }
                }
                SchemaItem::SimpleType(_) => {}
            }
        }
    }

    fn check_member_name(
        &self,
        type_name: &str,
        member: &str,
        seen: &mut HashSet<String>,
        kind: &str,
        report: &mut dyn FnMut(ValidationDiagnostic, &[String]),
    ) {
        let path = [type_name.to_string(), member.to_string()];

        if !self.ncname.is_match(member) {
            report(
                ValidationDiagnostic::error(format!("The name '{}' is not a valid NCName.", member)),
                &path,
            );
        }

        if !seen.insert(member.to_string()) {
            report(
                ValidationDiagnostic::error(format!(
                    "The {} '{}' is declared more than once in type '{}'.",
                    kind, member, type_name
                )),
                &path,
            );
        }
    }
}

impl Default for SchemaCompiler {
    fn default() -> Self {
        Self::new(false)
    }
}

fn pending_documents(docs: &[SchemaDocument]) -> Vec<usize> {
    docs.iter()
        .enumerate()
        .filter(|(_, doc)| doc.is_open())
        .map(|(i, _)| i)
        .collect()
}
