//! Low-level DOT statement writer
//!
//! Keeps track of indentation and writes whole statements; it knows nothing
//! about the graph model.

use std::fmt::Write;

use crate::error::LineageError;

pub struct DotWriter {
    output: String,
    indent: usize,
    indent_width: usize,
}

impl DotWriter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::with_capacity(4096),
            indent: 0,
            indent_width,
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent * self.indent_width {
            self.output.push(' ');
        }
    }

    /// Write `header {` and indent what follows.
    pub fn open(&mut self, header: &str) -> Result<&mut Self, LineageError> {
        self.write_indent();
        if header.is_empty() {
            self.output.push_str("{\n");
        } else {
            writeln!(self.output, "{header} {{")?;
        }
        self.indent += 1;
        Ok(self)
    }

    /// Close the innermost open block.
    pub fn close(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self.write_indent();
        self.output.push_str("}\n");
        self
    }

    /// Write `body;` or `body [attrs];`.
    pub fn statement(
        &mut self,
        body: &str,
        attributes: Option<&str>,
    ) -> Result<&mut Self, LineageError> {
        self.write_indent();
        match attributes {
            Some(list) => writeln!(self.output, "{body} {list};")?,
            None => writeln!(self.output, "{body};")?,
        }
        Ok(self)
    }

    pub fn depth(&self) -> usize {
        self.indent
    }

    pub fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks() {
        let mut writer = DotWriter::new(2);
        writer.open("digraph").unwrap();
        writer.statement("node", Some("[shape=box]")).unwrap();
        writer.open("subgraph cluster_a").unwrap();
        writer.statement("A", None).unwrap();
        assert_eq!(writer.depth(), 2);
        writer.close();
        writer.close();

        assert_eq!(
            writer.finish(),
            "digraph {\n  node [shape=box];\n  subgraph cluster_a {\n    A;\n  }\n}\n"
        );
    }

    #[test]
    fn test_anonymous_block() {
        let mut writer = DotWriter::new(4);
        writer.open("").unwrap();
        writer.close();
        assert_eq!(writer.finish(), "{\n}\n");
    }
}
