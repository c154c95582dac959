//! Type-to-schema mapping
//!
//! Translates type descriptors into schema components. The mapper decides
//! per target namespace whether a new document is created or the components
//! are merged into an open document of that namespace; the caller only sees
//! the documents arriving through [`SchemaSink::insert`].

use std::collections::HashSet;
use xsdgen_core::{TypeDescriptor, TypeKind, TypeRef, XsdPrimitive};
use xsdgen_metadata::TypeIndex;
use crate::document::{
    AttributeDecl, ComplexType, ElementParticle, GlobalElement, QualifiedName, SchemaDocument,
    SchemaItem, SimpleType, TypeReference, SUPPORT_NAMESPACE,
};
use crate::error::MappingError;
use crate::sink::SchemaSink;

/// Maps one type (and the types it references) into schema documents
pub trait SchemaMapper {
    /// Map `ty` into the documents of `sink`
    ///
    /// `known` resolves named member types so they can be mapped along.
    fn map_type(
        &mut self,
        ty: &TypeDescriptor,
        known: &TypeIndex,
        sink: &mut dyn SchemaSink,
    ) -> Result<(), MappingError>;
}

/// Default mapper producing element-centric schemas
#[derive(Debug, Clone, Default)]
pub struct XmlTypeMapper {
    default_namespace: Option<String>,
}

impl XmlTypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace for types that do not declare one
    pub fn with_default_namespace(mut self, namespace: Option<String>) -> Self {
        self.default_namespace = namespace.filter(|ns| !ns.is_empty());
        self
    }

    fn target_namespace(&self, ty: &TypeDescriptor) -> Option<String> {
        match ty.xml.namespace.as_deref() {
            Some("") => None,
            Some(ns) => Some(ns.to_string()),
            None => self.default_namespace.clone(),
        }
    }

    /// Open document for the namespace, created on first use
    fn open_document(&self, sink: &mut dyn SchemaSink, namespace: &Option<String>) -> usize {
        match sink.find_open(namespace) {
            Some(index) => index,
            None => {
                let index = sink.insert(SchemaDocument::new(namespace.clone()));
                tracing::debug!(index, namespace = ?namespace, "created schema document");
                index
            }
        }
    }

    /// Map a declared type and return the qualified name of its schema type
    fn map_declared(
        &self,
        ty: &TypeDescriptor,
        known: &TypeIndex,
        sink: &mut dyn SchemaSink,
        visiting: &mut HashSet<String>,
    ) -> Result<QualifiedName, MappingError> {
        if ty.is_interface {
            return Err(MappingError::Unsupported(
                ty.full_name.clone(),
                "interfaces cannot be serialized".to_string(),
            ));
        }
        if ty.has_generic_parameters {
            return Err(MappingError::Unsupported(
                ty.full_name.clone(),
                "open generic types cannot be serialized".to_string(),
            ));
        }

        let namespace = self.target_namespace(ty);
        let qname = QualifiedName::new(namespace.clone(), ty.xml_type_name());

        if !visiting.insert(ty.full_name.clone()) {
            // Recursive reference; the declaration is on its way
            return Ok(qname);
        }

        let index = self.open_document(sink, &namespace);

        match sink.documents()[index].type_source(&qname.local) {
            Some(Some(source)) if source == ty.full_name => return Ok(qname),
            Some(existing) => {
                return Err(MappingError::DuplicateTypeName {
                    name: qname.local.clone(),
                    namespace: namespace.unwrap_or_default(),
                    existing: existing.unwrap_or("<builtin>").to_string(),
                    duplicate: ty.full_name.clone(),
                });
            }
            None => {}
        }

        let mut unresolved = Vec::new();
        let item = match ty.kind {
            TypeKind::Enum => {
                let mut simple = SimpleType::new(qname.local.clone(), QualifiedName::xs("string"));
                simple.enumeration = ty.enum_values.clone();
                simple.source = Some(ty.full_name.clone());
                SchemaItem::SimpleType(simple)
            }
            TypeKind::Class | TypeKind::Struct => {
                let mut complex = ComplexType::new(qname.local.clone());
                complex.source = Some(ty.full_name.clone());

                if let Some(base) = &ty.base_type {
                    let target = self.resolve_named(base, &namespace, known, sink, visiting)?;
                    if known.get(base).is_none() {
                        unresolved.push(TypeReference {
                            target: target.clone(),
                            path: vec![qname.local.clone()],
                        });
                    }
                    complex.base = Some(target);
                }

                for member in &ty.members {
                    let type_name = match &member.type_ref {
                        TypeRef::Primitive(p) => primitive_name(*p),
                        TypeRef::Named(name) => {
                            let target = self.resolve_named(name, &namespace, known, sink, visiting)?;
                            if known.get(name).is_none() {
                                unresolved.push(TypeReference {
                                    target: target.clone(),
                                    path: vec![qname.local.clone(), member.xml_name().to_string()],
                                });
                            }
                            target
                        }
                    };

                    if member.attribute {
                        complex.attributes.push(AttributeDecl {
                            name: member.xml_name().to_string(),
                            type_name,
                            required: !member.optional,
                        });
                    } else {
                        complex.sequence.push(ElementParticle {
                            name: member.xml_name().to_string(),
                            type_name,
                            min_occurs: if member.optional || member.repeated { 0 } else { 1 },
                            max_occurs: if member.repeated { None } else { Some(1) },
                        });
                    }
                }

                SchemaItem::ComplexType(complex)
            }
        };

        // Referenced types may have been added meanwhile; the index is stable
        let doc = sink.document_mut(index);
        doc.items.push(item);
        doc.unresolved.extend(unresolved);
        tracing::debug!(type_name = %ty.full_name, schema_type = %qname, "mapped type");

        Ok(qname)
    }

    /// Resolve a named reference, mapping the referenced type when it is known
    fn resolve_named(
        &self,
        full_name: &str,
        referrer_namespace: &Option<String>,
        known: &TypeIndex,
        sink: &mut dyn SchemaSink,
        visiting: &mut HashSet<String>,
    ) -> Result<QualifiedName, MappingError> {
        match known.get(full_name) {
            Some(referenced) => self.map_declared(referenced, known, sink, visiting),
            None => {
                // Left for the compiler to report
                let local = TypeDescriptor::new(full_name).simple_name().to_string();
                Ok(QualifiedName::new(referrer_namespace.clone(), local))
            }
        }
    }
}

impl SchemaMapper for XmlTypeMapper {
    fn map_type(
        &mut self,
        ty: &TypeDescriptor,
        known: &TypeIndex,
        sink: &mut dyn SchemaSink,
    ) -> Result<(), MappingError> {
        let mut visiting = HashSet::new();
        let qname = self.map_declared(ty, known, sink, &mut visiting)?;

        let index = self.open_document(sink, &qname.namespace);
        let root = ty.xml_root_name().to_string();
        let doc = sink.document_mut(index);

        if !doc.has_element(&root, &qname) {
            doc.items.push(SchemaItem::Element(GlobalElement {
                name: root,
                type_name: qname,
            }));
        }

        Ok(())
    }
}

fn primitive_name(primitive: XsdPrimitive) -> QualifiedName {
    if primitive.is_support_type() {
        QualifiedName::new(Some(SUPPORT_NAMESPACE.to_string()), primitive.xsd_name())
    } else {
        QualifiedName::xs(primitive.xsd_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xsdgen_core::MemberDescriptor;

    fn index(types: &[TypeDescriptor]) -> TypeIndex {
        TypeIndex::from_types(types)
    }

    #[test]
    fn same_namespace_merges_into_one_document() {
        let x = TypeDescriptor::new("NS1.X").with_namespace("urn:ns1");
        let y = TypeDescriptor::new("NS1.Y").with_namespace("urn:ns1");
        let known = index(&[x.clone(), y.clone()]);
        let mut docs: Vec<SchemaDocument> = Vec::new();
        let mut mapper = XmlTypeMapper::new();

        mapper.map_type(&x, &known, &mut docs).unwrap();
        mapper.map_type(&y, &known, &mut docs).unwrap();

        assert_eq!(docs.len(), 1);
        assert!(docs[0].declares_type("X"));
        assert!(docs[0].declares_type("Y"));
        assert_eq!(docs[0].elements().count(), 2);
    }

    #[test]
    fn compiled_documents_are_not_merged_into() {
        let x = TypeDescriptor::new("NS1.X").with_namespace("urn:ns1");
        let y = TypeDescriptor::new("NS1.Y").with_namespace("urn:ns1");
        let known = index(&[x.clone(), y.clone()]);
        let mut docs: Vec<SchemaDocument> = Vec::new();
        let mut mapper = XmlTypeMapper::new();

        mapper.map_type(&x, &known, &mut docs).unwrap();
        docs[0].compiled = true;
        mapper.map_type(&y, &known, &mut docs).unwrap();

        assert_eq!(docs.len(), 2);
        assert!(docs[1].declares_type("Y"));
    }

    #[test]
    fn referenced_types_are_mapped_into_their_namespace() {
        let customer = TypeDescriptor::new("C.Customer").with_namespace("urn:customers");
        let order = TypeDescriptor::new("C.Order")
            .with_namespace("urn:orders")
            .with_member(MemberDescriptor::new("Customer", TypeRef::Named("C.Customer".into())));
        let known = index(&[order.clone(), customer]);
        let mut docs: Vec<SchemaDocument> = Vec::new();

        XmlTypeMapper::new().map_type(&order, &known, &mut docs).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].target_namespace.as_deref(), Some("urn:orders"));
        assert_eq!(docs[1].target_namespace.as_deref(), Some("urn:customers"));
        assert!(docs[1].declares_type("Customer"));
        // Only the mapped type gets a global element
        assert_eq!(docs[1].elements().count(), 0);
    }

    #[test]
    fn recursive_types_terminate() {
        let node = TypeDescriptor::new("T.Node")
            .with_member(MemberDescriptor::new("Next", TypeRef::Named("T.Node".into())));
        let known = index(&[node.clone()]);
        let mut docs: Vec<SchemaDocument> = Vec::new();

        XmlTypeMapper::new().map_type(&node, &known, &mut docs).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].complex_types().count(), 1);
    }

    #[test]
    fn unknown_reference_is_kept_for_the_compiler() {
        let order = TypeDescriptor::new("C.Order")
            .with_namespace("urn:orders")
            .with_member(MemberDescriptor::new("Tax", TypeRef::Named("Other.TaxInfo".into())));
        let mut docs: Vec<SchemaDocument> = Vec::new();

        XmlTypeMapper::new().map_type(&order, &index(&[]), &mut docs).unwrap();

        let refs = docs[0].references();
        assert!(refs.iter().any(|r| r.target.local == "TaxInfo"
            && r.target.namespace.as_deref() == Some("urn:orders")));
        assert_eq!(docs[0].unresolved.len(), 1);
        assert!(docs[0].is_unresolved(&docs[0].unresolved[0]));
        assert_eq!(docs[0].unresolved[0].path, vec!["Order".to_string(), "Tax".to_string()]);
    }

    #[test]
    fn duplicate_type_name_is_an_error() {
        let a = TypeDescriptor::new("A.Item").with_namespace("urn:x");
        let b = TypeDescriptor::new("B.Item").with_namespace("urn:x");
        let known = index(&[a.clone(), b.clone()]);
        let mut docs: Vec<SchemaDocument> = Vec::new();
        let mut mapper = XmlTypeMapper::new();

        mapper.map_type(&a, &known, &mut docs).unwrap();
        let err = mapper.map_type(&b, &known, &mut docs).unwrap_err();
        assert!(matches!(err, MappingError::DuplicateTypeName { .. }));
    }

    #[test]
    fn mapping_twice_is_a_no_op() {
        let a = TypeDescriptor::new("A.Item");
        let known = index(&[a.clone()]);
        let mut docs: Vec<SchemaDocument> = Vec::new();
        let mut mapper = XmlTypeMapper::new();

        mapper.map_type(&a, &known, &mut docs).unwrap();
        mapper.map_type(&a, &known, &mut docs).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].items.len(), 2);
    }

    #[test]
    fn interface_members_are_unsupported() {
        let mut repo = TypeDescriptor::new("A.IRepo");
        repo.is_interface = true;
        let holder = TypeDescriptor::new("A.Holder")
            .with_member(MemberDescriptor::new("Repo", TypeRef::Named("A.IRepo".into())));
        let known = index(&[repo, holder.clone()]);
        let mut docs: Vec<SchemaDocument> = Vec::new();

        let err = XmlTypeMapper::new().map_type(&holder, &known, &mut docs).unwrap_err();
        assert!(matches!(err, MappingError::Unsupported(name, _) if name == "A.IRepo"));
    }

    #[test]
    fn members_and_enums() {
        let mut status = TypeDescriptor::new("A.Status");
        status.kind = TypeKind::Enum;
        status.enum_values = vec!["Open".into(), "Closed".into()];

        let mut id = MemberDescriptor::new("Id", TypeRef::Primitive(XsdPrimitive::Guid));
        id.attribute = true;
        let mut tags = MemberDescriptor::new("Tag", TypeRef::Primitive(XsdPrimitive::String));
        tags.repeated = true;

        let ticket = TypeDescriptor::new("A.Ticket")
            .with_member(id)
            .with_member(tags)
            .with_member(MemberDescriptor::new("Status", TypeRef::Named("A.Status".into())));
        let known = index(&[status, ticket.clone()]);
        let mut docs: Vec<SchemaDocument> = Vec::new();

        XmlTypeMapper::new()
            .with_default_namespace(Some("urn:tickets".into()))
            .map_type(&ticket, &known, &mut docs)
            .unwrap();

        let ticket_type = docs[0].complex_types().next().unwrap();
        assert_eq!(ticket_type.attributes[0].type_name.namespace.as_deref(), Some(SUPPORT_NAMESPACE));
        assert_eq!(ticket_type.sequence[0].min_occurs, 0);
        assert_eq!(ticket_type.sequence[0].max_occurs, None);
        assert!(docs[0].declares_type("Status"));
        assert_eq!(docs[0].target_namespace.as_deref(), Some("urn:tickets"));
    }
}
