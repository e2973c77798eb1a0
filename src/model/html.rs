//! Structured HTML-like labels
//!
//! Graphviz accepts a small HTML dialect between `<` and `>`: plain text with
//! `<BR/>` line breaks, or a single `<TABLE>` whose rows and cells may be
//! separated by `<HR/>` and `<VR/>` rules. [`HtmlLabel`] builds that markup
//! with text and attribute values escaped, and checks the table grammar
//! before anything is written.
//!
//! ```
//! use graph_lineage::model::{AttributeValue, HtmlLabel, Table, TableCell, TableRow};
//!
//! # fn main() -> Result<(), graph_lineage::error::LineageError> {
//! let label = HtmlLabel::new().with_table(
//!     Table::new()
//!         .with_attribute("BORDER", "0")
//!         .with_row(TableRow::new().with_cell(TableCell::text("Timer").with_port("name")))
//!         .with_rule()
//!         .with_row(TableRow::new().with_cell(TableCell::text("start() -> None"))),
//! );
//!
//! assert_eq!(
//!     label.to_value()?,
//!     AttributeValue::html(
//!         "<TABLE BORDER=\"0\"><TR><TD PORT=\"name\">Timer</TD></TR><HR/>\
//!          <TR><TD>start() -&gt; None</TD></TR></TABLE>"
//!     )
//! );
//! # Ok(())
//! # }
//! ```

use indexmap::IndexMap;

use crate::error::LineageError;
use crate::model::attributes::AttributeValue;

/// Attribute under which HTML labels are reported in errors
const LABEL: &str = "label";

/// Content of a label or a table cell
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlContent {
    /// Escaped on output
    Text(String),
    LineBreak,
    Table(Table),
}

/// A whole HTML-like label: text and line breaks, or one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlLabel {
    contents: Vec<HtmlContent>,
}

impl HtmlLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.contents.push(HtmlContent::Text(text.into()));
        self
    }

    pub fn with_line_break(mut self) -> Self {
        self.contents.push(HtmlContent::LineBreak);
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.contents.push(HtmlContent::Table(table));
        self
    }

    pub fn contents(&self) -> &[HtmlContent] {
        &self.contents
    }

    /// Markup for the label body, without the enclosing `<` and `>`.
    pub fn render(&self) -> Result<String, LineageError> {
        let mut out = String::new();
        render_contents(&self.contents, &mut out)?;
        Ok(out)
    }

    /// The label as an attribute value
    pub fn to_value(&self) -> Result<AttributeValue, LineageError> {
        Ok(AttributeValue::Html(self.render()?))
    }
}

/// Attributes of a table or cell, in insertion order
type HtmlAttributes = IndexMap<String, String>;

/// An entry in a table: a row or a horizontal rule between rows
#[derive(Debug, Clone, PartialEq)]
pub enum RowEntry {
    Row(TableRow),
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    attributes: HtmlAttributes,
    rows: Vec<RowEntry>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a `<TABLE>` attribute such as `BORDER` or `CELLSPACING`.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_row(mut self, row: TableRow) -> Self {
        self.rows.push(RowEntry::Row(row));
        self
    }

    /// Horizontal rule; must sit between two rows
    pub fn with_rule(mut self) -> Self {
        self.rows.push(RowEntry::Rule);
        self
    }

    pub fn rows(&self) -> &[RowEntry] {
        &self.rows
    }
}

/// An entry in a row: a cell or a vertical rule between cells
#[derive(Debug, Clone, PartialEq)]
pub enum CellEntry {
    Cell(TableCell),
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    cells: Vec<CellEntry>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell(mut self, cell: TableCell) -> Self {
        self.cells.push(CellEntry::Cell(cell));
        self
    }

    /// Vertical rule; must sit between two cells
    pub fn with_rule(mut self) -> Self {
        self.cells.push(CellEntry::Rule);
        self
    }

    pub fn cells(&self) -> &[CellEntry] {
        &self.cells
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    attributes: HtmlAttributes,
    contents: Vec<HtmlContent>,
}

impl TableCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cell holding a single piece of text
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().with_text(text)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Name the cell so edges can attach to it through a port
    pub fn with_port(self, port: impl Into<String>) -> Self {
        self.with_attribute("PORT", port)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.contents.push(HtmlContent::Text(text.into()));
        self
    }

    pub fn with_line_break(mut self) -> Self {
        self.contents.push(HtmlContent::LineBreak);
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.contents.push(HtmlContent::Table(table));
        self
    }

    pub fn contents(&self) -> &[HtmlContent] {
        &self.contents
    }
}

fn render_contents(contents: &[HtmlContent], out: &mut String) -> Result<(), LineageError> {
    let has_table = contents
        .iter()
        .any(|content| matches!(content, HtmlContent::Table(_)));
    if has_table && contents.len() > 1 {
        return Err(LineageError::invalid_value(
            LABEL,
            "a table must be the only content of its label or cell",
        ));
    }

    for content in contents {
        match content {
            HtmlContent::Text(text) => {
                reject_nul(text)?;
                out.push_str(&escape_html(text));
            }
            HtmlContent::LineBreak => out.push_str("<BR/>"),
            HtmlContent::Table(table) => render_table(table, out)?,
        }
    }
    Ok(())
}

fn render_table(table: &Table, out: &mut String) -> Result<(), LineageError> {
    check_separated(
        table.rows.iter().map(|entry| matches!(entry, RowEntry::Rule)),
        "table has no rows",
        "horizontal rule must sit between two rows",
    )?;

    open_tag("TABLE", &table.attributes, out)?;
    for entry in &table.rows {
        match entry {
            RowEntry::Row(row) => render_row(row, out)?,
            RowEntry::Rule => out.push_str("<HR/>"),
        }
    }
    out.push_str("</TABLE>");
    Ok(())
}

fn render_row(row: &TableRow, out: &mut String) -> Result<(), LineageError> {
    check_separated(
        row.cells.iter().map(|entry| matches!(entry, CellEntry::Rule)),
        "table row has no cells",
        "vertical rule must sit between two cells",
    )?;

    out.push_str("<TR>");
    for entry in &row.cells {
        match entry {
            CellEntry::Cell(cell) => {
                open_tag("TD", &cell.attributes, out)?;
                render_contents(&cell.contents, out)?;
                out.push_str("</TD>");
            }
            CellEntry::Rule => out.push_str("<VR/>"),
        }
    }
    out.push_str("</TR>");
    Ok(())
}

/// Rules may only appear between two non-rule entries, and at least one
/// non-rule entry is required.
fn check_separated(
    is_rule: impl Iterator<Item = bool>,
    empty: &str,
    misplaced: &str,
) -> Result<(), LineageError> {
    let mut previous_rule = true;
    let mut seen_entry = false;
    for rule in is_rule {
        if rule && previous_rule {
            return Err(LineageError::invalid_value(LABEL, misplaced));
        }
        seen_entry |= !rule;
        previous_rule = rule;
    }
    if !seen_entry {
        Err(LineageError::invalid_value(LABEL, empty))
    } else if previous_rule {
        Err(LineageError::invalid_value(LABEL, misplaced))
    } else {
        Ok(())
    }
}

fn open_tag(tag: &str, attributes: &HtmlAttributes, out: &mut String) -> Result<(), LineageError> {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(LineageError::invalid_value(
                LABEL,
                format!("'{name}' is not a valid HTML attribute name"),
            ));
        }
        reject_nul(value)?;
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_html(value));
        out.push('"');
    }
    out.push('>');
    Ok(())
}

fn reject_nul(text: &str) -> Result<(), LineageError> {
    if text.contains('\0') {
        Err(LineageError::invalid_value(LABEL, "value contains a NUL byte"))
    } else {
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
