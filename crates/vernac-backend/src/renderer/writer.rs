// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Simple line-based writer for generating vernacular with proper
//! indentation.

use std::fmt::{Display, Write};

/// Writer context for generating vernacular text.
/// Tracks indentation and handles line-based output.
pub struct VernacWriter<W: Write> {
    out: W,
    indent: usize,
    at_line_start: bool,
}

impl<W: Write> VernacWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: 0,
            at_line_start: true,
        }
    }

    /// Write a string, handling indentation at line starts.
    pub fn write(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                writeln!(self.out).unwrap();
                self.at_line_start = true;
            } else {
                if self.at_line_start {
                    for _ in 0..self.indent {
                        write!(self.out, "  ").unwrap();
                    }
                }
                self.at_line_start = false;
                write!(self.out, "{}", c).unwrap();
            }
        }
    }

    /// Write a complete line (adds newline at end).
    pub fn line(&mut self, s: &str) {
        self.write(s);
        self.write("\n");
    }

    /// Write an empty line (just a newline).
    pub fn newline(&mut self) {
        self.write("\n");
    }

    /// Increase indentation for subsequent lines.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation for subsequent lines.
    pub fn dedent(&mut self) {
        if self.indent > 0 {
            self.indent -= 1;
        }
    }

    /// Get the underlying writer (consumes self).
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write a formatted string using format_args!.
    /// Convenience method to avoid `w.write(&format!(...))`.
    pub fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) {
        self.write(&args.to_string());
    }

    /// Write items separated by a separator string.
    pub fn sep<I, T>(&mut self, separator: &str, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let mut first = true;
        for item in items {
            if !first {
                self.write(separator);
            }
            first = false;
            self.write(&item.to_string());
        }
    }

    /// Write items with a separator, using a custom render function for
    /// each item.
    pub fn sep_with<I, T, F>(&mut self, separator: &str, items: I, mut render: F)
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&mut Self, T),
    {
        let mut first = true;
        for item in items {
            if !first {
                self.write(separator);
            }
            first = false;
            render(self, item);
        }
    }
}

/// Render to a string.
pub fn render_to_string<F>(f: F) -> String
where
    F: FnOnce(&mut VernacWriter<String>),
{
    let mut writer = VernacWriter::new(String::new());
    f(&mut writer);
    writer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_at_line_starts() {
        let out = render_to_string(|w| {
            w.line("Inductive t :=");
            w.indent();
            w.line("| A");
            w.line("| B.");
            w.dedent();
            w.line("Check t.");
        });
        assert_eq!(out, "Inductive t :=\n  | A\n  | B.\nCheck t.\n");
    }

    #[test]
    fn test_sep_with() {
        let out = render_to_string(|w| {
            w.sep_with(" -> ", ["a", "b", "c"], |w, s| w.write(s));
        });
        assert_eq!(out, "a -> b -> c");
    }
}
