//! Emitted text blocks.

use std::fmt;

/// Position of a block in the emitted file.
///
/// Blocks are produced in the declaration order of this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    LibraryLoad,
    Constant,
    Enum,
    StructValue,
    StructReference,
    Function,
    Epilogue,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LibraryLoad => "library-load",
            Self::Constant => "constant",
            Self::Enum => "enum",
            Self::StructValue => "struct-value",
            Self::StructReference => "struct-reference",
            Self::Function => "function",
            Self::Epilogue => "epilogue",
        };
        f.write_str(name)
    }
}

/// One declaration's worth of host-language source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    pub section: Section,
    /// Native name of the item this block declares.
    pub name: Option<String>,
    /// Source text, always newline terminated.
    pub text: String,
    /// The text is a comment standing in for an item that could not be
    /// declared.
    pub placeholder: bool,
}

impl TextBlock {
    #[must_use]
    pub const fn new(section: Section, name: Option<String>, text: String) -> Self {
        Self {
            section,
            name,
            text,
            placeholder: false,
        }
    }

    #[must_use]
    pub const fn placeholder(section: Section, name: String, text: String) -> Self {
        Self {
            section,
            name: Some(name),
            text,
            placeholder: true,
        }
    }
}

/// A collected emission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    pub blocks: Vec<TextBlock>,
}

impl Bindings {
    /// Blocks of one section, in emitted order.
    pub fn section(&self, section: Section) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter(move |b| b.section == section)
    }

    /// Native names of the items of one section, in emitted order.
    pub fn names(&self, section: Section) -> impl Iterator<Item = &str> {
        self.section(section).filter_map(|b| b.name.as_deref())
    }

    /// Placeholder blocks, in emitted order.
    pub fn placeholders(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter(|b| b.placeholder)
    }

    /// Concatenate all blocks into one source file, separated by blank lines.
    #[must_use]
    pub fn to_source(&self) -> String {
        let len = self.blocks.iter().map(|b| b.text.len() + 1).sum();
        let mut out = String::with_capacity(len);
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&block.text);
        }
        out
    }
}

impl FromIterator<TextBlock> for Bindings {
    fn from_iter<I: IntoIterator<Item = TextBlock>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}
