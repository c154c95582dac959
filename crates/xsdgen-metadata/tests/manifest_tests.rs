//! Integration tests for manifest loading

use pretty_assertions::assert_eq;
use std::path::Path;
use xsdgen_core::{TypeKind, TypeRef, XsdPrimitive};
use xsdgen_metadata::{ManifestProvider, ProviderError, TypeMetadataProvider};

const FIXTURE: &str = "tests/fixtures/Contoso.Models.dll";

#[test]
fn load_fixture_module() {
    let module = ManifestProvider::new().load_module(Path::new(FIXTURE)).unwrap();

    assert_eq!(module.name, "Contoso.Models");
    assert_eq!(module.types.len(), 8);

    let order = &module.types[0];
    assert_eq!(order.name, "Order");
    assert_eq!(order.xml_root_name(), "order");
    assert_eq!(order.members[0].type_ref, TypeRef::Primitive(XsdPrimitive::Guid));
    assert!(order.members[0].attribute);
    assert!(order.members[2].repeated);

    let status = &module.types[2];
    assert_eq!(status.kind, TypeKind::Enum);
    assert_eq!(status.enum_values, vec!["Open", "Shipped", "Cancelled"]);
}

#[test]
fn fixture_index_resolves_references() {
    let module = ManifestProvider::new().load_module(Path::new(FIXTURE)).unwrap();
    let index = module.index();

    for member in &module.types[0].members {
        if let TypeRef::Named(name) = &member.type_ref {
            assert!(index.get(name).is_some(), "{} should be declared", name);
        }
    }
}

#[test]
fn corrupt_module_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Broken.dll");
    std::fs::write(&path, "MZ this is not a manifest").unwrap();

    let err = ManifestProvider::new().load_module(&path).unwrap_err();
    match err {
        ProviderError::InvalidMetadata(file, _) => assert!(file.ends_with("Broken.dll")),
        other => panic!("unexpected error: {other}"),
    }
}
