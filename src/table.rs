use crate::style::{Cell, Presenter, Tag};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub width: usize,
}

impl Column {
    pub const fn new(label: &'static str, width: usize) -> Self {
        Column { label, width }
    }
}

/// Fixed-width, left-aligned table. Column widths are static, long cells overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: &[Column]) -> Self {
        Table {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn render<W: Write>(&self, w: &mut W, presenter: Presenter) -> io::Result<()> {
        let header = self
            .columns
            .iter()
            .map(|c| Cell::new(c.label, Tag::Label))
            .collect::<Vec<_>>();
        self.render_line(w, presenter, &header)?;

        for row in &self.rows {
            self.render_line(w, presenter, row)?;
        }

        writeln!(w)
    }

    fn render_line<W: Write>(
        &self,
        w: &mut W,
        presenter: Presenter,
        cells: &[Cell],
    ) -> io::Result<()> {
        let mut line = String::new();
        // width of the trailing padding, so it can be dropped at the end of the line
        let mut pending = 0;

        for (idx, cell) in cells.iter().enumerate() {
            if idx > 0 {
                pending += 1;
            }
            if !cell.text.is_empty() {
                line.extend(std::iter::repeat(' ').take(pending));
                line.push_str(&presenter.paint_cell(cell));
                pending = 0;
            }

            let width = self.columns.get(idx).map(|c| c.width).unwrap_or(0);
            pending += width.saturating_sub(cell.text.width());
        }

        writeln!(w, "{}", line)
    }
}
