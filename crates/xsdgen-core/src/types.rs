//! Type descriptors
//!
//! Read-only descriptions of the program types a module exposes. They are
//! produced by a metadata provider and never mutated by the export pipeline.

use serde::{Deserialize, Serialize};

/// Kind of a declared type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Reference type with members
    #[default]
    Class,

    /// Value type with members
    Struct,

    /// Named constant set
    Enum,
}

/// Built-in value types a member can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XsdPrimitive {
    String,
    Boolean,
    Byte,
    SignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Float,
    Double,
    Decimal,
    DateTime,
    Date,
    Time,
    Duration,
    Base64Binary,
    AnyUri,
    Guid,
    Char,
}

impl XsdPrimitive {
    /// Local name of the schema type this primitive maps to
    pub fn xsd_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Byte => "unsignedByte",
            Self::SignedByte => "byte",
            Self::Short => "short",
            Self::UnsignedShort => "unsignedShort",
            Self::Int => "int",
            Self::UnsignedInt => "unsignedInt",
            Self::Long => "long",
            Self::UnsignedLong => "unsignedLong",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::DateTime => "dateTime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Base64Binary => "base64Binary",
            Self::AnyUri => "anyURI",
            Self::Guid => "guid",
            Self::Char => "char",
        }
    }

    /// Whether the type lives in the support namespace instead of the
    /// XML Schema namespace
    pub fn is_support_type(&self) -> bool {
        matches!(self, Self::Guid | Self::Char)
    }
}

/// Reference from a member to its value type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeRef {
    /// Built-in value type
    Primitive(XsdPrimitive),

    /// Another declared type, by full name
    Named(String),
}

/// XML mapping hints attached to a type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlTypeOptions {
    /// Target namespace of the schema the type is mapped into
    #[serde(default)]
    pub namespace: Option<String>,

    /// Overrides the schema type name
    #[serde(default)]
    pub type_name: Option<String>,

    /// Overrides the global element name
    #[serde(default)]
    pub root_name: Option<String>,
}

/// A field or property of a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    /// Member name as declared
    pub name: String,

    /// Value type
    #[serde(rename = "type")]
    pub type_ref: TypeRef,

    /// Overrides the XML element/attribute name
    #[serde(default)]
    pub xml_name: Option<String>,

    /// Serialize as an attribute instead of a child element
    #[serde(default)]
    pub attribute: bool,

    /// Member may be absent
    #[serde(default)]
    pub optional: bool,

    /// Member is a collection
    #[serde(default)]
    pub repeated: bool,
}

impl MemberDescriptor {
    /// Create a required element member
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            xml_name: None,
            attribute: false,
            optional: false,
            repeated: false,
        }
    }

    /// Name used in the XML document
    pub fn xml_name(&self) -> &str {
        self.xml_name.as_deref().unwrap_or(&self.name)
    }
}

fn default_true() -> bool {
    true
}

/// Structural handle describing one declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Namespace-qualified name (e.g., "Contoso.Orders.Order")
    pub full_name: String,

    /// Simple name (e.g., "Order"); derived from `full_name` when empty
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub kind: TypeKind,

    #[serde(default = "default_true")]
    pub is_public: bool,

    #[serde(default)]
    pub is_abstract: bool,

    #[serde(default)]
    pub is_sealed: bool,

    #[serde(default)]
    pub is_interface: bool,

    /// Type still has unbound generic parameters
    #[serde(default)]
    pub has_generic_parameters: bool,

    /// Full name of the base type, if any
    #[serde(default)]
    pub base_type: Option<String>,

    #[serde(default)]
    pub xml: XmlTypeOptions,

    #[serde(default)]
    pub members: Vec<MemberDescriptor>,

    /// Constant names for enum types
    #[serde(default)]
    pub enum_values: Vec<String>,
}

impl TypeDescriptor {
    /// Create a public class with no members
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = simple_name_of(&full_name).to_string();

        Self {
            full_name,
            name,
            kind: TypeKind::Class,
            is_public: true,
            is_abstract: false,
            is_sealed: false,
            is_interface: false,
            has_generic_parameters: false,
            base_type: None,
            xml: XmlTypeOptions::default(),
            members: Vec::new(),
            enum_values: Vec::new(),
        }
    }

    /// Set the target namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.xml.namespace = Some(namespace.into());
        self
    }

    /// Append a member
    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Fill in derived fields left empty by a manifest
    pub fn normalized(mut self) -> Self {
        if self.name.is_empty() {
            self.name = simple_name_of(&self.full_name).to_string();
        }
        self
    }

    /// Simple name, falling back to the last segment of the full name
    pub fn simple_name(&self) -> &str {
        if self.name.is_empty() {
            simple_name_of(&self.full_name)
        } else {
            &self.name
        }
    }

    /// Name of the schema type generated for this type
    pub fn xml_type_name(&self) -> &str {
        self.xml.type_name.as_deref().unwrap_or_else(|| self.simple_name())
    }

    /// Name of the global element generated for this type
    pub fn xml_root_name(&self) -> &str {
        self.xml.root_name.as_deref().unwrap_or_else(|| self.simple_name())
    }

    /// Static types are declared abstract and sealed at once
    pub fn is_static(&self) -> bool {
        self.is_abstract && self.is_sealed
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

fn simple_name_of(full_name: &str) -> &str {
    // Nested types use '+' as separator
    full_name
        .rsplit(|c| c == '.' || c == '+')
        .next()
        .unwrap_or(full_name)
}
