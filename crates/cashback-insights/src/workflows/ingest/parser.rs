//! Best-effort delimited-text reader for the order export.
//!
//! A `"` toggles quote mode and is never kept in the value. Commas and
//! newlines inside quote mode belong to the field. Every field and header is
//! trimmed. Rows with at most one field, or with only blank fields, are
//! discarded, as is a trailing row whose quote never closes.

/// Header names plus the rows that survived parsing, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    discarded: usize,
}

/// A single row viewed through the header names.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> RowView<'a> {
    /// Value under `header`; missing trailing fields and unknown headers read
    /// as an empty string. When a header repeats, the last column wins.
    pub fn get(&self, header: &str) -> &'a str {
        self.headers
            .iter()
            .rposition(|name| name == header)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl ParsedTable {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows dropped as blank, too short or unterminated.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|values| RowView {
            headers: &self.headers,
            values,
        })
    }
}

pub fn parse_table(text: &str) -> ParsedTable {
    let mut tokenizer = Tokenizer::default();
    let mut table = TableBuilder::default();

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' && chars.peek() == Some(&'\n') {
            continue;
        }
        if let Some(fields) = tokenizer.feed(ch) {
            table.accept(fields);
        }
    }

    match tokenizer.finish() {
        Some(Ok(fields)) => table.accept(fields),
        Some(Err(Unterminated)) => table.discard(),
        None => {}
    }

    table.build()
}

#[derive(Default)]
struct TableBuilder {
    headers: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    discarded: usize,
}

impl TableBuilder {
    fn accept(&mut self, fields: Vec<String>) {
        if self.headers.is_none() {
            self.headers = Some(fields);
        } else if fields.len() > 1 && fields.iter().any(|field| !field.is_empty()) {
            self.rows.push(fields);
        } else {
            self.discarded += 1;
        }
    }

    fn discard(&mut self) {
        if self.headers.is_some() {
            self.discarded += 1;
        }
    }

    fn build(self) -> ParsedTable {
        ParsedTable {
            headers: self.headers.unwrap_or_default(),
            rows: self.rows,
            discarded: self.discarded,
        }
    }
}

/// Input ended while a quoted field was still open.
struct Unterminated;

#[derive(Default)]
struct Tokenizer {
    in_quotes: bool,
    field: String,
    fields: Vec<String>,
    touched: bool,
}

impl Tokenizer {
    /// Consumes one character, returning a completed row at an unquoted newline.
    fn feed(&mut self, ch: char) -> Option<Vec<String>> {
        match ch {
            '"' => {
                self.in_quotes = !self.in_quotes;
                self.touched = true;
            }
            ',' if !self.in_quotes => {
                self.push_field();
            }
            '\n' if !self.in_quotes => {
                self.push_field();
                self.touched = false;
                return Some(std::mem::take(&mut self.fields));
            }
            other => {
                self.field.push(other);
                self.touched = true;
            }
        }
        None
    }

    /// Flushes the final row, if any input followed the last newline.
    fn finish(mut self) -> Option<Result<Vec<String>, Unterminated>> {
        if self.in_quotes {
            return Some(Err(Unterminated));
        }
        if !self.touched && self.fields.is_empty() {
            return None;
        }
        self.push_field();
        Some(Ok(self.fields))
    }

    fn push_field(&mut self) {
        let value = std::mem::take(&mut self.field);
        self.fields.push(value.trim().to_string());
        self.touched = true;
    }
}
