//! Emit configuration.

use std::fmt;
use std::sync::Arc;

use ffibind_ir::ConstantDef;
use ffibind_layout::DataModel;

/// How argument and field-name lists are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListLayout {
    /// Everything on one line.
    Horizontal,
    /// One item per line, aligned under the first.
    Vertical,
    /// Horizontal unless the line would exceed the line length.
    #[default]
    Auto,
}

/// Replacement representability predicate for constants.
#[derive(Clone)]
pub struct LiteralFilter(Arc<dyn Fn(&ConstantDef) -> bool + Send + Sync>);

impl LiteralFilter {
    #[must_use]
    pub fn new(filter: impl Fn(&ConstantDef) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(filter))
    }

    #[must_use]
    pub fn accepts(&self, constant: &ConstantDef) -> bool {
        (self.0)(constant)
    }
}

impl fmt::Debug for LiteralFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LiteralFilter(..)")
    }
}

/// Emission configuration shared by all back-ends.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug)]
pub struct EmitConfig {
    /// Data model for layout resolution.
    pub data_model: DataModel,
    /// Soft limit for `ListLayout::Auto`.
    pub line_length: usize,
    /// Argument and field-name list layout.
    pub list_layout: ListLayout,
    /// Spaces per indentation level. `None` uses the back-end default.
    pub indent_width: Option<usize>,
    /// Text placed verbatim at the top of the file.
    pub header: Option<String>,
    /// Comment placed after the header.
    pub autogen_warning: Option<String>,
    /// Stamp the generator version into the header.
    pub include_version: bool,
    /// Emit documentation and deprecation notes.
    pub emit_docs: bool,
    /// Annotate structs and fields with offsets and sizes.
    pub emit_layout_comments: bool,
    /// Library to load. `None` uses the back-end default.
    pub library_name: Option<String>,
    /// Fail on any type the back-end cannot map. When false, only function
    /// signatures degrade to placeholders.
    pub error_on_unsupported_type: bool,
    /// Overrides the back-end's constant representability predicate.
    pub literal_filter: Option<LiteralFilter>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            data_model: DataModel::LP64,
            line_length: 100,
            list_layout: ListLayout::Auto,
            indent_width: None,
            header: None,
            autogen_warning: None,
            include_version: false,
            emit_docs: true,
            emit_layout_comments: false,
            library_name: None,
            error_on_unsupported_type: true,
            literal_filter: None,
        }
    }
}

impl EmitConfig {
    #[must_use]
    pub const fn with_data_model(mut self, model: DataModel) -> Self {
        self.data_model = model;
        self
    }

    #[must_use]
    pub const fn with_line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }

    #[must_use]
    pub const fn with_list_layout(mut self, layout: ListLayout) -> Self {
        self.list_layout = layout;
        self
    }

    #[must_use]
    pub const fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    #[must_use]
    pub fn with_autogen_warning(mut self, warning: impl Into<String>) -> Self {
        self.autogen_warning = Some(warning.into());
        self
    }

    #[must_use]
    pub const fn with_version(mut self, enabled: bool) -> Self {
        self.include_version = enabled;
        self
    }

    #[must_use]
    pub const fn with_docs(mut self, enabled: bool) -> Self {
        self.emit_docs = enabled;
        self
    }

    #[must_use]
    pub const fn with_layout_comments(mut self, enabled: bool) -> Self {
        self.emit_layout_comments = enabled;
        self
    }

    #[must_use]
    pub fn with_library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn with_error_on_unsupported_type(mut self, enabled: bool) -> Self {
        self.error_on_unsupported_type = enabled;
        self
    }

    #[must_use]
    pub fn with_literal_filter(mut self, filter: LiteralFilter) -> Self {
        self.literal_filter = Some(filter);
        self
    }
}
