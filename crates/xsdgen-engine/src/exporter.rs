//! Schema export orchestration
//!
//! Drives one export from module paths to written schema files:
//!
//! ```text
//! Idle -> PerModuleMapping* -> Consolidating -> Writing -> Done
//! ```
//!
//! Each module is loaded, filtered, mapped and compiled on its own. The
//! mapping registry is shared by all modules of the export, so documents and
//! their file indices accumulate across modules.

use sha2::{Digest, Sha256};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use xsdgen_core::{ExportResult, ExportedItem, ExporterConfig, LogSink, Priority};
use xsdgen_metadata::TypeMetadataProvider;
use xsdgen_schema::{MappingError, SchemaWriter, WriteError, XmlTypeMapper};
use crate::collector::DiagnosticCollector;
use crate::registry::SchemaMappingRegistry;
use crate::selector::TypeSelector;

/// Failures that abort an export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("Failed to write schema file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<WriteError> for ExportError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Io { path, source } => Self::Write { path, source },
        }
    }
}

/// Stage of an export run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    PerModuleMapping,
    Consolidating,
    Writing,
    Done,
}

impl std::fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::PerModuleMapping => write!(f, "per-module mapping"),
            Self::Consolidating => write!(f, "consolidating"),
            Self::Writing => write!(f, "writing"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Exports the types of a set of modules as XML schema files
pub struct SchemaExporter<'a> {
    config: ExporterConfig,
    provider: &'a dyn TypeMetadataProvider,
    sink: &'a dyn LogSink,
    phase: Cell<ExportPhase>,
}

impl<'a> SchemaExporter<'a> {
    pub fn new(config: ExporterConfig, provider: &'a dyn TypeMetadataProvider, sink: &'a dyn LogSink) -> Self {
        Self {
            config,
            provider,
            sink,
            phase: Cell::new(ExportPhase::Idle),
        }
    }

    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Stage reached by the last export
    pub fn phase(&self) -> ExportPhase {
        self.phase.get()
    }

    /// Export the selected types of every module
    ///
    /// Modules that fail to load are logged and skipped. Validation
    /// diagnostics end up in the result. Mapping and write failures abort
    /// the export.
    pub fn export_schemas<P: AsRef<Path>>(
        &self,
        module_paths: &[P],
        include_names: &[String],
    ) -> Result<ExportResult, ExportError> {
        let mut registry = SchemaMappingRegistry::new(
            XmlTypeMapper::new().with_default_namespace(self.config.default_namespace.clone()),
        );

        self.export_into(&mut registry, module_paths, include_names)
    }

    fn export_into<P: AsRef<Path>>(
        &self,
        registry: &mut SchemaMappingRegistry,
        module_paths: &[P],
        include_names: &[String],
    ) -> Result<ExportResult, ExportError> {
        self.enter(ExportPhase::Idle);

        let mut result = ExportResult::new();
        let selector = TypeSelector::new(self.config.type_name_comparison, self.sink);
        let collector = DiagnosticCollector::new(self.config.skip_validation, self.sink);

        for path in module_paths {
            let path = path.as_ref();
            self.enter(ExportPhase::PerModuleMapping);

            let module = match self.provider.load_module(path) {
                Ok(module) => module,
                Err(err) => {
                    self.sink.write_line(
                        Priority::Error,
                        &format!("Failed to load module '{}': {}", path.display(), err),
                    );
                    continue;
                }
            };

            let selected = selector.select(&module.types, include_names);
            if selected.is_empty() {
                self.sink.write_line(
                    Priority::Normal,
                    &format!("No exportable types were found in '{}'.", path.display()),
                );
                continue;
            }

            let known = module.index();
            for ty in &selected {
                registry.map_type(ty, &known)?;
            }

            registry.compile(
                &mut |diagnostic| collector.on_diagnostic(&mut result, diagnostic),
                self.config.full_compile,
            );
        }

        // Every module has been compiled on its own already
        self.enter(ExportPhase::Consolidating);

        self.enter(ExportPhase::Writing);
        self.write_documents(registry, &mut result)?;

        self.enter(ExportPhase::Done);
        Ok(result)
    }

    fn write_documents(&self, registry: &SchemaMappingRegistry, result: &mut ExportResult) -> Result<(), ExportError> {
        let directory = &self.config.output_directory;
        if !registry.is_empty() {
            std::fs::create_dir_all(directory).map_err(|source| ExportError::Write {
                path: directory.clone(),
                source,
            })?;
        }

        let writer = SchemaWriter::new(self.config.output_encoding);

        for (doc, ty, index) in registry.enumerate() {
            let filename = output_filename(index);

            match ty {
                Some(ty) => self.sink.write_line(
                    Priority::Normal,
                    &format!("Generating file for exported type '{}': {}", ty.full_name, filename),
                ),
                None => self
                    .sink
                    .write_line(Priority::Normal, &format!("Generating file: {}", filename)),
            }

            let bytes = writer.write_to(doc, &directory.join(&filename))?;

            result.add_exported_schema(ExportedItem {
                filename,
                type_descriptor: ty.cloned(),
                namespace: doc.target_namespace.clone(),
                sha256: hex::encode(Sha256::digest(&bytes)),
                bytes: bytes.len(),
            });
        }

        Ok(())
    }

    fn enter(&self, phase: ExportPhase) {
        tracing::debug!(from = %self.phase.get(), to = %phase, "export phase");
        self.phase.set(phase);
    }
}

/// File name of the schema document at `index` in creation order
pub fn output_filename(index: usize) -> String {
    format!("output{}.xsd", index)
}
