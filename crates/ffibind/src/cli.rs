//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ffibind::{
    Backend, DataModel, EmitConfig, JavaJna, JavaJnaConfig, ListLayout, PythonCtypes,
    PythonCtypesConfig,
};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "ffibind")]
#[command(about = "FFI binding generator - emits Java/JNA and Python/ctypes bindings")]
#[command(version)]
pub struct Cli {
    /// Module descriptor (JSON)
    #[arg(value_name = "DESCRIPTOR")]
    pub input: PathBuf,

    /// Binding back-end (repeatable)
    #[arg(short, long = "backend", value_enum, required = true)]
    pub backends: Vec<BackendArg>,

    /// Output directory
    #[arg(short, long, default_value = "output", conflicts_with = "stdout")]
    pub output: PathBuf,

    /// Print bindings to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Java package of the generated interface
    #[arg(long)]
    pub package: Option<String>,

    /// Name of the generated Java interface
    #[arg(long, default_value = "Bindings")]
    pub interface_name: String,

    /// Library to load (defaults to the module name)
    #[arg(long)]
    pub library_name: Option<String>,

    /// Preferred maximum line length
    #[arg(long, default_value = "100")]
    pub line_length: usize,

    /// Argument and field-order list layout
    #[arg(long, value_enum, default_value = "auto")]
    pub list_layout: ListLayoutArg,

    /// Native data model used for struct layout
    #[arg(long, value_enum, default_value = "lp64")]
    pub data_model: DataModelArg,

    /// Annotate structs and fields with size, alignment and offsets
    #[arg(long)]
    pub layout_comments: bool,

    /// Skip documentation comments
    #[arg(long)]
    pub no_docs: bool,

    /// Stamp the generator version into the file header
    #[arg(long)]
    pub stamp_version: bool,

    /// Replace functions with unmappable signatures by placeholders instead
    /// of failing
    #[arg(long)]
    pub lenient: bool,

    /// Load the Python library by its bare name, skipping `find_library`
    #[arg(long)]
    pub no_find_library: bool,

    /// Enable verbose output (sets `RUST_LOG=debug`)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub silent: bool,
}

impl Cli {
    /// Emission configuration shared by all back-ends.
    #[must_use]
    pub fn emit_config(&self) -> EmitConfig {
        let mut config = EmitConfig::default()
            .with_data_model(self.data_model.into())
            .with_line_length(self.line_length)
            .with_list_layout(self.list_layout.into())
            .with_layout_comments(self.layout_comments)
            .with_docs(!self.no_docs)
            .with_version(self.stamp_version)
            .with_error_on_unsupported_type(!self.lenient)
            .with_autogen_warning("Automatically generated by ffibind. Do not edit.");
        if let Some(name) = &self.library_name {
            config = config.with_library_name(name.clone());
        }
        config
    }

    /// Instantiate the selected back-ends, deduplicated, in first-seen order.
    #[must_use]
    pub fn backends(&self) -> Vec<Box<dyn Backend>> {
        let mut seen = Vec::new();
        for backend in &self.backends {
            if !seen.contains(backend) {
                seen.push(*backend);
            }
        }
        seen.into_iter().map(|arg| self.backend(arg)).collect()
    }

    fn backend(&self, arg: BackendArg) -> Box<dyn Backend> {
        match arg {
            BackendArg::JavaJna => {
                let name = self.interface_name.clone();
                let mut config = JavaJnaConfig::default().with_interface_name(name);
                if let Some(package) = &self.package {
                    config = config.with_package(package.clone());
                }
                Box::new(JavaJna::new(config))
            }
            BackendArg::PythonCtypes => Box::new(PythonCtypes::new(
                PythonCtypesConfig::default().with_find_library(!self.no_find_library),
            )),
        }
    }
}

/// Binding back-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Java interface on JNA
    JavaJna,
    /// Python module on ctypes
    PythonCtypes,
}

/// List layout argument.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum ListLayoutArg {
    /// Horizontal unless the line gets too long
    #[default]
    Auto,
    /// Always on one line
    Horizontal,
    /// One item per line
    Vertical,
}

impl From<ListLayoutArg> for ListLayout {
    fn from(arg: ListLayoutArg) -> Self {
        match arg {
            ListLayoutArg::Auto => Self::Auto,
            ListLayoutArg::Horizontal => Self::Horizontal,
            ListLayoutArg::Vertical => Self::Vertical,
        }
    }
}

/// Data model argument.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum DataModelArg {
    /// 64-bit longs and pointers
    #[default]
    Lp64,
    /// 32-bit longs and pointers
    Ilp32,
}

impl From<DataModelArg> for DataModel {
    fn from(arg: DataModelArg) -> Self {
        match arg {
            DataModelArg::Lp64 => Self::LP64,
            DataModelArg::Ilp32 => Self::ILP32,
        }
    }
}
