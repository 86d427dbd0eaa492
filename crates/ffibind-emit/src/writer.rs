//! Indentation-aware source buffer.

use crate::config::ListLayout;

/// Line-oriented text buffer used by the back-end renderers.
///
/// Indentation is written lazily at the first character of a line, so blank
/// lines never carry trailing whitespace.
pub struct SourceWriter {
    out: String,
    indent_width: usize,
    level: usize,
    line_length: usize,
    column: usize,
}

impl SourceWriter {
    #[must_use]
    pub const fn new(indent_width: usize, line_length: usize) -> Self {
        Self {
            out: String::new(),
            indent_width,
            level: 0,
            line_length,
            column: 0,
        }
    }

    /// Start at a given indentation level.
    #[must_use]
    pub const fn at_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Write text on the current line. `s` must not contain newlines.
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if self.column == 0 {
            let pad = self.level * self.indent_width;
            self.out.extend(std::iter::repeat_n(' ', pad));
            self.column = pad;
        }
        self.out.push_str(s);
        self.column += s.len();
    }

    /// Write a full line.
    pub fn line(&mut self, s: &str) {
        self.write(s);
        self.new_line();
    }

    /// Write several full lines.
    pub fn lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            self.line(line);
        }
    }

    pub fn new_line(&mut self) {
        self.out.push('\n');
        self.column = 0;
    }

    /// Insert an empty line unless the buffer is empty or already ends in one.
    pub fn blank_line(&mut self) {
        if self.column != 0 {
            self.new_line();
        }
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.new_line();
        }
    }

    pub const fn indent(&mut self) {
        self.level += 1;
    }

    pub const fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// End the current line with ` {` and indent.
    pub fn open_brace(&mut self) {
        self.write(" {");
        self.new_line();
        self.indent();
    }

    /// Dedent and write a closing `}` line followed by `suffix`.
    pub fn close_brace(&mut self, suffix: &str) {
        self.dedent();
        self.write("}");
        self.write(suffix);
        self.new_line();
    }

    /// Column of the next character written.
    #[must_use]
    pub const fn column(&self) -> usize {
        if self.column == 0 {
            self.level * self.indent_width
        } else {
            self.column
        }
    }

    /// Write `items` separated by `separator`.
    ///
    /// `trailing` is the text that will follow the list on its last line; it
    /// counts toward the line length when choosing a layout under
    /// [`ListLayout::Auto`]. Vertical lists align continuation lines under the
    /// first item.
    pub fn write_list(
        &mut self,
        items: &[String],
        separator: &str,
        layout: ListLayout,
        trailing: &str,
    ) {
        let horizontal = match layout {
            ListLayout::Horizontal => true,
            ListLayout::Vertical => false,
            ListLayout::Auto => {
                let width: usize = items.iter().map(String::len).sum::<usize>()
                    + separator.len() * items.len().saturating_sub(1)
                    + trailing.len();
                self.column() + width <= self.line_length
            }
        };

        if horizontal || items.len() < 2 {
            self.write(&items.join(separator));
            return;
        }

        let align = self.column();
        let separator = separator.trim_end();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(separator);
                self.new_line();
                self.out.extend(std::iter::repeat_n(' ', align));
                self.column = align;
            }
            self.write(item);
        }
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}

/// Double-quoted string literal with `\` and `"` escaped. Valid in both
/// Java and Python.
#[must_use]
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
