//! Fixed-width record formatting.
//!
//! Every sensor describes its columns as a list of [`Field`]s: a label, a
//! width and a cell value.  The header line, the data line and the blank
//! placeholder line are all rendered from that one list, so the three can
//! never disagree about column widths or delimiter positions.
//!
//! ```text
//!   header:  "  bmpHpa,  bmpAlt, bmpTemp"
//!   data:    "  998.12,  127.40,   21.05"
//!   blank:   "        ,        ,        "
//! ```

/// Delimiter between fields and between sensors.
pub const DELIMITER: char = ',';

/// Width of an ordinary numeric column.
pub const DEFAULT_WIDTH: usize = 8;

/// Decimal places of an ordinary numeric column.
pub const DEFAULT_PRECISION: usize = 2;

/// Most columns any single sensor contributes.
pub const MAX_FIELDS: usize = 4;

/// The column list of one sensor.
pub type Fields<'a> = heapless::Vec<Field<'a>, MAX_FIELDS>;

/// Content of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Right-aligned fixed-point number.
    Number { value: f64, precision: usize },
    /// Left-aligned text such as `On`/`Off`.
    Text(&'static str),
    /// Column present but intentionally left empty.
    Empty,
}

/// One (label, width, value) column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'a> {
    pub label: &'a str,
    pub width: usize,
    pub cell: Cell,
}

impl<'a> Field<'a> {
    /// Standard 8-wide, 2-decimal numeric column.
    pub fn number(label: &'a str, value: f64) -> Self {
        Self {
            label,
            width: DEFAULT_WIDTH,
            cell: Cell::Number {
                value,
                precision: DEFAULT_PRECISION,
            },
        }
    }

    /// Numeric column with explicit width and precision.
    pub fn number_with(label: &'a str, value: f64, width: usize, precision: usize) -> Self {
        Self {
            label,
            width,
            cell: Cell::Number { value, precision },
        }
    }

    pub fn text(label: &'a str, text: &'static str) -> Self {
        Self {
            label,
            width: DEFAULT_WIDTH,
            cell: Cell::Text(text),
        }
    }

    pub fn empty(label: &'a str) -> Self {
        Self {
            label,
            width: DEFAULT_WIDTH,
            cell: Cell::Empty,
        }
    }

    fn render_label(&self, out: &mut String) {
        let label = truncate(self.label, self.width);
        push_right(out, label, self.width);
    }

    fn render_cell(&self, out: &mut String) {
        match self.cell {
            Cell::Number { value, precision } => {
                let text = format!("{value:.precision$}");
                if text.len() > self.width {
                    // Never shift the columns; flag the overflow instead.
                    out.extend(core::iter::repeat_n('#', self.width));
                } else {
                    push_right(out, &text, self.width);
                }
            }
            Cell::Text(text) => push_left(out, truncate(text, self.width), self.width),
            Cell::Empty => push_blank(out, self.width),
        }
    }
}

/// Header line: labels right-aligned in their columns.
pub fn header(fields: &[Field<'_>]) -> String {
    render(fields, |f, out| f.render_label(out))
}

/// Data line: every cell formatted to its column width.
pub fn data(fields: &[Field<'_>]) -> String {
    render(fields, |f, out| f.render_cell(out))
}

/// Placeholder line with the same widths and delimiters as [`data`].
pub fn blank(fields: &[Field<'_>]) -> String {
    render(fields, |f, out| push_blank(out, f.width))
}

/// Total rendered width of a column list, delimiters included.
pub fn line_width(fields: &[Field<'_>]) -> usize {
    let columns: usize = fields.iter().map(|f| f.width).sum();
    columns + fields.len().saturating_sub(1)
}

/// Join per-sensor segments into one record line.
pub fn join<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(segment.as_ref());
    }
    line
}

fn render(fields: &[Field<'_>], mut each: impl FnMut(&Field<'_>, &mut String)) -> String {
    let mut out = String::with_capacity(line_width(fields));
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        each(field, &mut out);
    }
    out
}

fn truncate(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn push_right(out: &mut String, text: &str, width: usize) {
    push_blank(out, width.saturating_sub(text.chars().count()));
    out.push_str(text);
}

fn push_left(out: &mut String, text: &str, width: usize) {
    out.push_str(text);
    push_blank(out, width.saturating_sub(text.chars().count()));
}

fn push_blank(out: &mut String, width: usize) {
    out.extend(core::iter::repeat_n(' ', width));
}
