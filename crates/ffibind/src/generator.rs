//! Generation runs: one module, one or more back-ends.

use std::fs;
use std::path::{Path, PathBuf};

use ffibind_emit::{Backend, Bindings, EmitConfig, emit};
use ffibind_ir::ModuleDescriptor;
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::error::{Error, Result};

/// Bindings produced for one back-end.
#[derive(Clone, Debug)]
pub struct GeneratedFile {
    /// Back-end name.
    pub backend: &'static str,
    /// File name the back-end suggests.
    pub file_name: String,
    pub bindings: Bindings,
}

impl GeneratedFile {
    /// Full source text.
    #[must_use]
    pub fn source(&self) -> String {
        self.bindings.to_source()
    }

    /// Write the source into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns IO errors from creating the directory or writing the file.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, self.source())?;
        debug!(path = %path.display(), "wrote bindings");
        Ok(path)
    }
}

/// Binding generator.
#[derive(Clone, Debug, Default)]
pub struct Generator {
    config: EmitConfig,
}

impl Generator {
    /// Create a new generator with the given configuration.
    #[must_use]
    pub const fn new(config: EmitConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn config(&self) -> &EmitConfig {
        &self.config
    }

    /// Generate bindings for one back-end.
    ///
    /// # Errors
    ///
    /// Returns emission errors; nothing is produced in that case.
    pub fn generate(
        &self,
        module: &ModuleDescriptor,
        backend: &dyn Backend,
    ) -> Result<GeneratedFile> {
        let span = info_span!("generate", backend = backend.name(), module = %module.name);
        let _entered = span.entered();
        let bindings: Bindings = emit(module, backend, &self.config)?.collect();
        let placeholders = bindings.placeholders().count();
        if placeholders > 0 {
            warn!(placeholders, "some items were replaced by placeholders");
        }
        debug!(blocks = bindings.blocks.len(), "bindings generated");
        Ok(GeneratedFile {
            backend: backend.name(),
            file_name: backend.file_name(module),
            bindings,
        })
    }

    /// Generate bindings for several back-ends in parallel.
    ///
    /// Results come back in the order of `backends`; one back-end failing
    /// does not stop the others.
    #[must_use]
    pub fn generate_all(
        &self,
        module: &ModuleDescriptor,
        backends: &[&dyn Backend],
    ) -> Vec<Result<GeneratedFile>> {
        info!(module = %module.name, backends = backends.len(), "generating bindings");
        backends
            .par_iter()
            .map(|backend| self.generate(module, *backend))
            .collect()
    }
}

/// Parse a JSON module descriptor.
///
/// # Errors
///
/// Returns JSON errors for text that is not a descriptor.
pub fn parse_descriptor(json: &str) -> Result<ModuleDescriptor> {
    Ok(serde_json::from_str(json)?)
}

/// Read a JSON module descriptor from a file.
///
/// # Errors
///
/// Returns IO errors, or [`Error::Descriptor`] when the file does not parse.
pub fn load_descriptor(path: &Path) -> Result<ModuleDescriptor> {
    let _span = info_span!("load_descriptor", path = %path.display()).entered();
    let text = fs::read_to_string(path)?;
    let module: ModuleDescriptor =
        serde_json::from_str(&text).map_err(|source| Error::Descriptor {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(module = %module.name, items = module.item_count(), "descriptor loaded");
    Ok(module)
}
