//! Schema document model
//!
//! One [`SchemaDocument`] holds the declarations of a single target
//! namespace. Items keep their insertion order, which is also the order they
//! are rendered in.

use std::collections::BTreeSet;

/// The XML Schema namespace
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Namespace of the support types (guid, char) that have no XSD built-in
pub const SUPPORT_NAMESPACE: &str = "http://microsoft.com/wsdl/types/";

/// Namespace-qualified schema name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Namespace URI; `None` for the absent namespace
    pub namespace: Option<String>,

    /// Local name
    pub local: String,
}

impl QualifiedName {
    pub fn new(namespace: Option<String>, local: impl Into<String>) -> Self {
        Self {
            namespace,
            local: local.into(),
        }
    }

    /// Built-in XML Schema type
    pub fn xs(local: impl Into<String>) -> Self {
        Self::new(Some(XS_NAMESPACE.to_string()), local)
    }

    pub fn is_builtin(&self) -> bool {
        self.namespace.as_deref() == Some(XS_NAMESPACE)
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}:{}", ns, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// Child element inside a complex type sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementParticle {
    pub name: String,
    pub type_name: QualifiedName,
    pub min_occurs: u32,

    /// `None` means unbounded
    pub max_occurs: Option<u32>,
}

/// Attribute of a complex type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: String,
    pub type_name: QualifiedName,
    pub required: bool,
}

/// Complex type generated for a class or struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexType {
    pub name: String,
    pub base: Option<QualifiedName>,
    pub sequence: Vec<ElementParticle>,
    pub attributes: Vec<AttributeDecl>,

    /// Full name of the type this was generated from
    pub source: Option<String>,
}

impl ComplexType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            sequence: Vec::new(),
            attributes: Vec::new(),
            source: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.sequence.is_empty() && self.attributes.is_empty()
    }
}

/// Restricted simple type (enumerations and support types)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleType {
    pub name: String,
    pub base: QualifiedName,
    pub enumeration: Vec<String>,
    pub pattern: Option<String>,
    pub source: Option<String>,
}

impl SimpleType {
    pub fn new(name: impl Into<String>, base: QualifiedName) -> Self {
        Self {
            name: name.into(),
            base,
            enumeration: Vec::new(),
            pattern: None,
            source: None,
        }
    }
}

/// Top-level element declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalElement {
    pub name: String,
    pub type_name: QualifiedName,
}

/// A top-level schema component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaItem {
    Element(GlobalElement),
    ComplexType(ComplexType),
    SimpleType(SimpleType),
}

impl SchemaItem {
    pub fn name(&self) -> &str {
        match self {
            Self::Element(e) => &e.name,
            Self::ComplexType(t) => &t.name,
            Self::SimpleType(t) => &t.name,
        }
    }
}

/// A reference from a declaration to a named type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    /// Referenced type
    pub target: QualifiedName,

    /// Names leading to the referencing declaration (e.g., ["Order", "Customer"])
    pub path: Vec<String>,
}

/// One namespace-scoped schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    /// Target namespace; `None` for the absent namespace
    pub target_namespace: Option<String>,

    /// Imported namespaces, in import order
    pub imports: Vec<Option<String>>,

    /// Top-level components, in insertion order
    pub items: Vec<SchemaItem>,

    /// References to types outside the mapped module; never resolved locally
    pub unresolved: Vec<TypeReference>,

    /// Compiled documents are closed to further merging
    pub compiled: bool,
}

impl SchemaDocument {
    pub fn new(target_namespace: Option<String>) -> Self {
        Self {
            target_namespace,
            imports: Vec::new(),
            items: Vec::new(),
            unresolved: Vec::new(),
            compiled: false,
        }
    }

    /// Document declaring the support types
    pub fn support_types() -> Self {
        let mut doc = Self::new(Some(SUPPORT_NAMESPACE.to_string()));

        let mut guid = SimpleType::new("guid", QualifiedName::xs("string"));
        guid.pattern = Some(
            "[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}".to_string(),
        );
        doc.items.push(SchemaItem::SimpleType(guid));
        doc.items.push(SchemaItem::SimpleType(SimpleType::new(
            "char",
            QualifiedName::xs("unsignedShort"),
        )));

        doc
    }

    pub fn is_open(&self) -> bool {
        !self.compiled
    }

    /// Whether a type (complex or simple) with this local name is declared
    pub fn declares_type(&self, local: &str) -> bool {
        self.items.iter().any(|item| {
            matches!(item, SchemaItem::ComplexType(_) | SchemaItem::SimpleType(_))
                && item.name() == local
        })
    }

    /// Source type of the declared type with this local name
    ///
    /// Returns `Some(None)` for declared types without a source.
    pub fn type_source(&self, local: &str) -> Option<Option<&str>> {
        self.items.iter().find_map(|item| match item {
            SchemaItem::ComplexType(t) if t.name == local => Some(t.source.as_deref()),
            SchemaItem::SimpleType(t) if t.name == local => Some(t.source.as_deref()),
            _ => None,
        })
    }

    pub fn has_element(&self, name: &str, type_name: &QualifiedName) -> bool {
        self.items.iter().any(|item| {
            matches!(item, SchemaItem::Element(e) if e.name == name && &e.type_name == type_name)
        })
    }

    pub fn complex_types(&self) -> impl Iterator<Item = &ComplexType> {
        self.items.iter().filter_map(|item| match item {
            SchemaItem::ComplexType(t) => Some(t),
            _ => None,
        })
    }

    pub fn elements(&self) -> impl Iterator<Item = &GlobalElement> {
        self.items.iter().filter_map(|item| match item {
            SchemaItem::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Add an import unless already present or it names the own namespace
    pub fn add_import(&mut self, namespace: Option<String>) -> bool {
        if namespace == self.target_namespace || self.imports.contains(&namespace) {
            return false;
        }
        self.imports.push(namespace);
        true
    }

    /// All references to non-builtin types, in item order
    pub fn references(&self) -> Vec<TypeReference> {
        let mut refs = Vec::new();
        let mut push = |target: &QualifiedName, path: Vec<String>| {
            if !target.is_builtin() {
                refs.push(TypeReference { target: target.clone(), path });
            }
        };

        for item in &self.items {
            match item {
                SchemaItem::Element(e) => push(&e.type_name, vec![e.name.clone()]),
                SchemaItem::ComplexType(t) => {
                    if let Some(base) = &t.base {
                        push(base, vec![t.name.clone()]);
                    }
                    for p in &t.sequence {
                        push(&p.type_name, vec![t.name.clone(), p.name.clone()]);
                    }
                    for a in &t.attributes {
                        push(&a.type_name, vec![t.name.clone(), a.name.clone()]);
                    }
                }
                SchemaItem::SimpleType(t) => push(&t.base, vec![t.name.clone()]),
            }
        }

        refs
    }

    /// Whether `reference` points at a type unknown to the mapper
    pub fn is_unresolved(&self, reference: &TypeReference) -> bool {
        self.unresolved.contains(reference)
    }

    /// Foreign namespaces referenced by this document, sorted
    pub fn referenced_namespaces(&self) -> BTreeSet<Option<String>> {
        self.references()
            .into_iter()
            .map(|r| r.target.namespace)
            .filter(|ns| ns != &self.target_namespace)
            .collect()
    }
}
