//! Mapping, compiling and writing schema documents together

use pretty_assertions::assert_eq;
use xsdgen_core::{MemberDescriptor, OutputEncoding, TypeDescriptor, TypeRef, ValidationDiagnostic, XsdPrimitive};
use xsdgen_metadata::TypeIndex;
use xsdgen_schema::{SchemaCompiler, SchemaDocument, SchemaMapper, SchemaWriter, XmlTypeMapper, SUPPORT_NAMESPACE};

fn shop_types() -> Vec<TypeDescriptor> {
    let mut id = MemberDescriptor::new("Id", TypeRef::Primitive(XsdPrimitive::Guid));
    id.attribute = true;
    let mut lines = MemberDescriptor::new("Line", TypeRef::Named("Shop.Line".to_string()));
    lines.repeated = true;

    let cart = TypeDescriptor::new("Shop.Cart")
        .with_namespace("urn:shop")
        .with_member(id)
        .with_member(lines)
        .with_member(MemberDescriptor::new("Owner", TypeRef::Named("People.Person".to_string())));
    let line = TypeDescriptor::new("Shop.Line")
        .with_namespace("urn:shop")
        .with_member(MemberDescriptor::new("Sku", TypeRef::Primitive(XsdPrimitive::String)));
    let person = TypeDescriptor::new("People.Person")
        .with_namespace("urn:people")
        .with_member(MemberDescriptor::new("Name", TypeRef::Primitive(XsdPrimitive::String)));

    vec![cart, line, person]
}

fn map_and_compile(full: bool) -> (Vec<SchemaDocument>, Vec<ValidationDiagnostic>) {
    let types = shop_types();
    let known = TypeIndex::from_types(&types);
    let mut docs: Vec<SchemaDocument> = Vec::new();
    let mut mapper = XmlTypeMapper::new();

    for ty in &types {
        mapper.map_type(ty, &known, &mut docs).unwrap();
    }

    let mut diagnostics = Vec::new();
    SchemaCompiler::new(full).compile(&mut docs, &mut |d| diagnostics.push(d));
    (docs, diagnostics)
}

#[test]
fn compiled_documents_import_each_other() {
    let (docs, diagnostics) = map_and_compile(true);

    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    let namespaces: Vec<_> = docs.iter().map(|d| d.target_namespace.as_deref()).collect();
    assert_eq!(namespaces, vec![Some("urn:shop"), Some("urn:people"), Some(SUPPORT_NAMESPACE)]);
    assert_eq!(
        docs[0].imports,
        vec![Some("urn:people".to_string()), Some(SUPPORT_NAMESPACE.to_string())]
    );
    assert!(docs.iter().all(|d| d.compiled));
}

#[test]
fn written_files_parse_as_schemas() {
    let (docs, _) = map_and_compile(false);
    let dir = tempfile::tempdir().unwrap();
    let writer = SchemaWriter::new(OutputEncoding::Utf8);

    for (index, doc) in docs.iter().enumerate() {
        let path = dir.path().join(format!("output{}.xsd", index));
        writer.write_to(doc, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed = roxmltree::Document::parse(&text).unwrap();
        let root = parsed.root_element();
        assert_eq!(root.tag_name().name(), "schema");
        assert_eq!(root.attribute("targetNamespace"), doc.target_namespace.as_deref());
    }

    let cart = writer.render(&docs[0]);
    assert!(cart.contains(r#"<xs:element minOccurs="0" maxOccurs="unbounded" name="Line" type="tns:Line" />"#));
    assert!(cart.contains(r#"name="Owner" type="q1:Person""#));
}
