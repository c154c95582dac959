//! XSD rendering and encoding

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use xsdgen_core::OutputEncoding;
use crate::document::{
    ComplexType, QualifiedName, SchemaDocument, SchemaItem, SimpleType, XS_NAMESPACE,
};
use crate::error::WriteError;

const INDENT: &str = "  ";

/// Renders schema documents to XSD text and writes them to disk
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaWriter {
    encoding: OutputEncoding,
}

impl SchemaWriter {
    pub fn new(encoding: OutputEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> OutputEncoding {
        self.encoding
    }

    /// Render a document as XSD text
    pub fn render(&self, doc: &SchemaDocument) -> String {
        let prefixes = Prefixes::for_document(doc);
        let mut out = String::new();

        let _ = writeln!(out, "<?xml version=\"1.0\" encoding=\"{}\"?>", self.encoding.xml_name());

        out.push_str("<xs:schema");
        if let Some(ns) = &doc.target_namespace {
            let _ = write!(out, " xmlns:tns=\"{}\"", escape(ns));
        }
        for (ns, prefix) in prefixes.foreign() {
            let _ = write!(out, " xmlns:{}=\"{}\"", prefix, escape(ns));
        }
        out.push_str(" elementFormDefault=\"qualified\"");
        if let Some(ns) = &doc.target_namespace {
            let _ = write!(out, " targetNamespace=\"{}\"", escape(ns));
        }
        let _ = writeln!(out, " xmlns:xs=\"{}\">", XS_NAMESPACE);

        for import in &doc.imports {
            match import {
                Some(ns) => {
                    let _ = writeln!(out, "{}<xs:import namespace=\"{}\" />", INDENT, escape(ns));
                }
                None => {
                    let _ = writeln!(out, "{}<xs:import />", INDENT);
                }
            }
        }

        for item in &doc.items {
            match item {
                SchemaItem::Element(e) => {
                    let _ = writeln!(
                        out,
                        "{}<xs:element name=\"{}\" type=\"{}\" />",
                        INDENT,
                        escape(&e.name),
                        prefixes.qualify(&e.type_name)
                    );
                }
                SchemaItem::ComplexType(t) => render_complex_type(&mut out, t, &prefixes),
                SchemaItem::SimpleType(t) => render_simple_type(&mut out, t, &prefixes),
            }
        }

        out.push_str("</xs:schema>\n");
        out
    }

    /// Encode rendered text with the configured encoding, byte-order mark included
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self.encoding {
            OutputEncoding::Utf8 => text.as_bytes().to_vec(),
            OutputEncoding::Utf8Bom => {
                let mut bytes = vec![0xEF, 0xBB, 0xBF];
                bytes.extend_from_slice(text.as_bytes());
                bytes
            }
            OutputEncoding::Utf16Le => {
                let mut bytes = vec![0xFF, 0xFE];
                bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                bytes
            }
            OutputEncoding::Utf16Be => {
                let mut bytes = vec![0xFE, 0xFF];
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                bytes
            }
        }
    }

    /// Render, encode and write a document, replacing any existing file
    ///
    /// Returns the bytes written.
    pub fn write_to(&self, doc: &SchemaDocument, path: &Path) -> Result<Vec<u8>, WriteError> {
        let bytes = self.encode(&self.render(doc));

        std::fs::write(path, &bytes).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(bytes)
    }
}

fn render_complex_type(out: &mut String, t: &ComplexType, prefixes: &Prefixes) {
    let _ = writeln!(out, "{}<xs:complexType name=\"{}\">", INDENT, escape(&t.name));

    let mut depth = 2;
    if let Some(base) = &t.base {
        let _ = writeln!(out, "{}<xs:complexContent mixed=\"false\">", INDENT.repeat(2));
        let _ = writeln!(out, "{}<xs:extension base=\"{}\">", INDENT.repeat(3), prefixes.qualify(base));
        depth = 4;
    }

    let pad = INDENT.repeat(depth);
    if !t.sequence.is_empty() {
        let _ = writeln!(out, "{}<xs:sequence>", pad);
        for p in &t.sequence {
            let max = match p.max_occurs {
                Some(n) => n.to_string(),
                None => "unbounded".to_string(),
            };
            let _ = writeln!(
                out,
                "{}{}<xs:element minOccurs=\"{}\" maxOccurs=\"{}\" name=\"{}\" type=\"{}\" />",
                pad,
                INDENT,
                p.min_occurs,
                max,
                escape(&p.name),
                prefixes.qualify(&p.type_name)
            );
        }
        let _ = writeln!(out, "{}</xs:sequence>", pad);
    }
    for a in &t.attributes {
        let _ = writeln!(
            out,
            "{}<xs:attribute name=\"{}\" type=\"{}\" use=\"{}\" />",
            pad,
            escape(&a.name),
            prefixes.qualify(&a.type_name),
            if a.required { "required" } else { "optional" }
        );
    }

    if t.base.is_some() {
        let _ = writeln!(out, "{}</xs:extension>", INDENT.repeat(3));
        let _ = writeln!(out, "{}</xs:complexContent>", INDENT.repeat(2));
    }
    let _ = writeln!(out, "{}</xs:complexType>", INDENT);
}

fn render_simple_type(out: &mut String, t: &SimpleType, prefixes: &Prefixes) {
    let _ = writeln!(out, "{}<xs:simpleType name=\"{}\">", INDENT, escape(&t.name));
    let _ = writeln!(out, "{}<xs:restriction base=\"{}\">", INDENT.repeat(2), prefixes.qualify(&t.base));
    if let Some(pattern) = &t.pattern {
        let _ = writeln!(out, "{}<xs:pattern value=\"{}\" />", INDENT.repeat(3), escape(pattern));
    }
    for value in &t.enumeration {
        let _ = writeln!(out, "{}<xs:enumeration value=\"{}\" />", INDENT.repeat(3), escape(value));
    }
    let _ = writeln!(out, "{}</xs:restriction>", INDENT.repeat(2));
    let _ = writeln!(out, "{}</xs:simpleType>", INDENT);
}

/// Namespace prefixes of one rendered document
struct Prefixes {
    target: Option<String>,
    foreign: BTreeMap<String, String>,
    order: Vec<String>,
}

impl Prefixes {
    fn for_document(doc: &SchemaDocument) -> Self {
        let mut prefixes = Self {
            target: doc.target_namespace.clone(),
            foreign: BTreeMap::new(),
            order: Vec::new(),
        };

        // Imports first so prefixes follow import order
        let imported = doc.imports.iter().flatten().cloned();
        let referenced = doc.referenced_namespaces().into_iter().flatten();
        for ns in imported.chain(referenced) {
            if Some(&ns) != prefixes.target.as_ref() && !prefixes.foreign.contains_key(&ns) {
                let prefix = format!("q{}", prefixes.order.len() + 1);
                prefixes.foreign.insert(ns.clone(), prefix);
                prefixes.order.push(ns);
            }
        }

        prefixes
    }

    fn foreign(&self) -> impl Iterator<Item = (&String, &String)> {
        self.order.iter().map(move |ns| (ns, &self.foreign[ns]))
    }

    fn qualify(&self, name: &QualifiedName) -> String {
        let local = escape(&name.local);
        match name.namespace.as_deref() {
            Some(XS_NAMESPACE) => format!("xs:{}", local),
            Some(ns) if Some(ns) == self.target.as_deref() => format!("tns:{}", local),
            Some(ns) => match self.foreign.get(ns) {
                Some(prefix) => format!("{}:{}", prefix, local),
                None => local,
            },
            None => local,
        }
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Locate a declaration in rendered text
///
/// Follows `names` from outer to inner declaration, each matched as a
/// `name="..."` attribute at or after the previous match. Returns the
/// 1-based line and column of the innermost match, or `(0, 0)` when a name
/// cannot be found.
pub fn position_of(rendered: &str, names: &[String]) -> (u32, u32) {
    let lines: Vec<&str> = rendered.lines().collect();
    let mut line_index = 0;
    let mut found = (0, 0);

    for name in names {
        let needle = format!("name=\"{}\"", escape(name));
        let hit = lines
            .iter()
            .enumerate()
            .skip(line_index)
            .find_map(|(i, line)| line.find(&needle).map(|byte| (i, byte)));

        match hit {
            Some((i, byte)) => {
                let column = lines[i][..byte].chars().count() + 1;
                found = ((i + 1) as u32, column as u32);
                line_index = i;
            }
            None => return (0, 0),
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AttributeDecl, ElementParticle, GlobalElement, SUPPORT_NAMESPACE};
    use pretty_assertions::assert_eq;

    fn order_document() -> SchemaDocument {
        let mut doc = SchemaDocument::new(Some("urn:orders".to_string()));
        let mut order = ComplexType::new("Order");
        order.sequence.push(ElementParticle {
            name: "Customer".to_string(),
            type_name: QualifiedName::new(Some("urn:customers".to_string()), "Customer"),
            min_occurs: 1,
            max_occurs: Some(1),
        });
        order.sequence.push(ElementParticle {
            name: "Note".to_string(),
            type_name: QualifiedName::xs("string"),
            min_occurs: 0,
            max_occurs: None,
        });
        order.attributes.push(AttributeDecl {
            name: "Id".to_string(),
            type_name: QualifiedName::new(Some(SUPPORT_NAMESPACE.to_string()), "guid"),
            required: true,
        });
        doc.add_import(Some("urn:customers".to_string()));
        doc.items.push(SchemaItem::Element(GlobalElement {
            name: "order".to_string(),
            type_name: QualifiedName::new(Some("urn:orders".to_string()), "Order"),
        }));
        doc.items.push(SchemaItem::ComplexType(order));
        doc
    }

    #[test]
    fn render_order_document() {
        let text = SchemaWriter::default().render(&order_document());

        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<xs:schema xmlns:tns="urn:orders" xmlns:q1="urn:customers" xmlns:q2="http://microsoft.com/wsdl/types/" elementFormDefault="qualified" targetNamespace="urn:orders" xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:import namespace="urn:customers" />
  <xs:element name="order" type="tns:Order" />
  <xs:complexType name="Order">
    <xs:sequence>
      <xs:element minOccurs="1" maxOccurs="1" name="Customer" type="q1:Customer" />
      <xs:element minOccurs="0" maxOccurs="unbounded" name="Note" type="xs:string" />
    </xs:sequence>
    <xs:attribute name="Id" type="q2:guid" use="required" />
  </xs:complexType>
</xs:schema>
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn rendered_text_is_well_formed() {
        let mut doc = order_document();
        let mut status = SimpleType::new("Status", QualifiedName::xs("string"));
        status.enumeration = vec!["Open".into(), "R&D".into()];
        doc.items.push(SchemaItem::SimpleType(status));

        let text = SchemaWriter::default().render(&doc);
        let parsed = roxmltree::Document::parse(&text).unwrap();
        let root = parsed.root_element();

        assert_eq!(root.tag_name().name(), "schema");
        assert_eq!(root.attribute("targetNamespace"), Some("urn:orders"));
        assert!(text.contains("value=\"R&amp;D\""));
    }

    #[test]
    fn encodings_carry_byte_order_marks() {
        let text = "<a/>";
        assert_eq!(SchemaWriter::new(OutputEncoding::Utf8).encode(text), b"<a/>".to_vec());
        assert_eq!(&SchemaWriter::new(OutputEncoding::Utf8Bom).encode(text)[..3], &[0xEF, 0xBB, 0xBF]);

        let le = SchemaWriter::new(OutputEncoding::Utf16Le).encode(text);
        assert_eq!(&le[..4], &[0xFF, 0xFE, b'<', 0x00]);
        let be = SchemaWriter::new(OutputEncoding::Utf16Be).encode(text);
        assert_eq!(&be[..4], &[0xFE, 0xFF, 0x00, b'<']);
        assert_eq!(be.len(), 2 + 2 * text.len());
    }

    #[test]
    fn utf16_declaration() {
        let text = SchemaWriter::new(OutputEncoding::Utf16Le).render(&SchemaDocument::new(None));
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-16\"?>"));
    }

    #[test]
    fn locate_nested_declaration() {
        let text = SchemaWriter::default().render(&order_document());

        assert_eq!(position_of(&text, &["Order".to_string()]), (5, 19));
        assert_eq!(position_of(&text, &["Order".to_string(), "Customer".to_string()]), (7, 47));
        assert_eq!(position_of(&text, &["Missing".to_string()]), (0, 0));
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output0.xsd");
        std::fs::write(&path, "stale content that is longer than the schema ................").unwrap();

        let writer = SchemaWriter::new(OutputEncoding::Utf8);
        let bytes = writer.write_to(&SchemaDocument::new(None), &path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("output0.xsd");

        let err = SchemaWriter::default().write_to(&SchemaDocument::new(None), &path).unwrap_err();
        assert!(err.to_string().contains("output0.xsd"));
    }
}
