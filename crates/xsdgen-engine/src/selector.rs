//! Selection of exportable types
//!
//! Filters the types declared by a module down to the ones that can be
//! exported, then applies the include list given by the user.

use xsdgen_core::{LogSink, NameComparison, Priority, TypeDescriptor};

/// Suffix marking an include entry as a namespace prefix
const WILDCARD: &str = ".*";

/// Picks the exportable types of a module
pub struct TypeSelector<'a> {
    comparison: NameComparison,
    sink: &'a dyn LogSink,
}

impl<'a> TypeSelector<'a> {
    pub fn new(comparison: NameComparison, sink: &'a dyn LogSink) -> Self {
        Self { comparison, sink }
    }

    /// Whether a type can be exported at all
    ///
    /// Non-public types, static types (abstract and sealed), interfaces and
    /// open generic types have no serializable shape.
    pub fn is_exportable(ty: &TypeDescriptor) -> bool {
        ty.is_public && !ty.is_static() && !ty.is_interface && !ty.has_generic_parameters
    }

    /// Select the exportable types matching any include entry
    ///
    /// An empty include list selects every exportable type. Selection keeps
    /// declaration order and never yields a type twice.
    pub fn select(&self, all_types: &[TypeDescriptor], include_names: &[String]) -> Vec<TypeDescriptor> {
        let mut selected = Vec::new();

        for ty in all_types.iter().filter(|ty| Self::is_exportable(ty)) {
            let included = include_names.is_empty()
                || include_names.iter().any(|entry| self.matches(ty, entry));

            if included {
                self.sink.write_line(
                    Priority::Normal,
                    &format!("Adding '{}' to the list of exportable types.", ty.full_name),
                );
                selected.push(ty.clone());
            }
        }

        tracing::debug!(
            declared = all_types.len(),
            selected = selected.len(),
            "selected exportable types"
        );

        selected
    }

    fn matches(&self, ty: &TypeDescriptor, entry: &str) -> bool {
        if self.comparison.equals(&ty.full_name, entry) || self.comparison.equals(ty.simple_name(), entry) {
            return true;
        }

        match entry.strip_suffix(WILDCARD) {
            Some("") => true,
            // Keep the dot so "Foo.*" does not match "Foobar.Baz"
            Some(namespace) => {
                let prefix = &entry[..namespace.len() + 1];
                self.comparison.starts_with(&ty.full_name, prefix)
            }
            None => false,
        }
    }
}
