//! A minimal flowing-layout writer on top of `lopdf`.
//!
//! Content is laid out top to bottom on A4 pages using the standard
//! Helvetica faces, so no font files are embedded. A new page starts
//! automatically when the cursor reaches the bottom margin.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::error::DocumentError;

pub const PAGE_WIDTH: i64 = 595;
pub const PAGE_HEIGHT: i64 = 842;
pub const MARGIN: i64 = 50;

const CONTENT_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A table column: header text and width in points.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub header: &'a str,
    pub width: i64,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub fn left(header: &'a str, width: i64) -> Self {
        Self {
            header,
            width,
            align: Align::Left,
        }
    }

    pub fn right(header: &'a str, width: i64) -> Self {
        Self {
            header,
            width,
            align: Align::Right,
        }
    }
}

/// Encodes text for a WinAnsi Type1 font. Letters outside Latin-1 are
/// transliterated where a plain equivalent exists, otherwise replaced by `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            'ă' => b'a',
            'Ă' => b'A',
            'ș' | 'ş' => b's',
            'Ș' | 'Ş' => b'S',
            'ț' | 'ţ' => b't',
            'Ț' | 'Ţ' => b'T',
            '–' | '—' => b'-',
            '„' | '”' | '“' => b'"',
            c if (c as u32) <= 0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Approximate rendered width of `text`; Helvetica averages half an em.
pub fn text_width(text: &str, size: i64) -> i64 {
    (text.chars().count() as i64 * size) / 2
}

/// Greedy word wrap to `width` points.
pub fn wrap(text: &str, size: i64, width: i64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, size) > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate(text: &str, size: i64, width: i64) -> String {
    if text_width(text, size) <= width {
        return text.to_string();
    }
    let max_chars = ((width * 2) / size.max(1)).max(2) as usize;
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('.');
    out
}

pub struct PdfWriter {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    fn ensure_space(&mut self, height: i64) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    pub fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn text_at(&mut self, x: i64, y: i64, font: Font, size: i64, text: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font.resource_name().as_bytes().to_vec()),
                    Object::Integer(size),
                ],
            ),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_text(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn aligned(&mut self, x: i64, width: i64, align: Align, font: Font, size: i64, text: &str) {
        let offset = match align {
            Align::Left => 0,
            Align::Center => (width - text_width(text, size)).max(0) / 2,
            Align::Right => (width - text_width(text, size)).max(0),
        };
        let y = self.y;
        self.text_at(x + offset, y, font, size, text);
    }

    fn hline(&mut self, x1: i64, x2: i64, y: i64) {
        self.current.extend([
            Operation::new("w", vec![Object::Integer(1)]),
            Operation::new("m", vec![Object::Integer(x1), Object::Integer(y)]),
            Operation::new("l", vec![Object::Integer(x2), Object::Integer(y)]),
            Operation::new("S", vec![]),
        ]);
    }

    /// Vertical whitespace.
    pub fn gap(&mut self, points: i64) {
        self.y -= points;
    }

    pub fn title(&mut self, text: &str) {
        self.ensure_space(30);
        self.y -= 18;
        self.aligned(MARGIN, CONTENT_WIDTH, Align::Center, Font::Bold, 18, text);
        self.y -= 12;
    }

    pub fn heading(&mut self, text: &str) {
        self.ensure_space(24);
        self.y -= 13;
        self.aligned(MARGIN, CONTENT_WIDTH, Align::Left, Font::Bold, 13, text);
        self.y -= 8;
    }

    pub fn centered(&mut self, text: &str, size: i64) {
        self.ensure_space(size + 4);
        self.y -= size;
        self.aligned(MARGIN, CONTENT_WIDTH, Align::Center, Font::Regular, size, text);
        self.y -= 4;
    }

    pub fn paragraph(&mut self, text: &str) {
        const SIZE: i64 = 11;
        for line in wrap(text, SIZE, CONTENT_WIDTH) {
            self.ensure_space(SIZE + 5);
            self.y -= SIZE;
            self.aligned(MARGIN, CONTENT_WIDTH, Align::Left, Font::Regular, SIZE, &line);
            self.y -= 5;
        }
    }

    /// `Label: value` with a bold label.
    pub fn field(&mut self, label: &str, value: &str) {
        const SIZE: i64 = 11;
        self.ensure_space(SIZE + 5);
        self.y -= SIZE;
        let label = format!("{}:", label);
        let label_width = text_width(&label, SIZE) + 6;
        let y = self.y;
        self.text_at(MARGIN, y, Font::Bold, SIZE, &label);
        let value = truncate(value, SIZE, CONTENT_WIDTH - label_width);
        self.text_at(MARGIN + label_width, y, Font::Regular, SIZE, &value);
        self.y -= 5;
    }

    pub fn rule(&mut self) {
        self.ensure_space(10);
        self.y -= 5;
        let y = self.y;
        self.hline(MARGIN, PAGE_WIDTH - MARGIN, y);
        self.y -= 5;
    }

    /// Draws a table, repeating the header row on every page it spans.
    pub fn table(&mut self, columns: &[Column<'_>], rows: &[Vec<String>]) {
        const SIZE: i64 = 9;
        const ROW: i64 = 16;
        let right = MARGIN + columns.iter().map(|c| c.width).sum::<i64>();

        let header = |writer: &mut PdfWriter| {
            writer.ensure_space(ROW * 2);
            writer.y -= ROW - 4;
            let mut x = MARGIN;
            for column in columns {
                let text = truncate(column.header, SIZE, column.width - 4);
                writer.aligned(x + 2, column.width - 4, column.align, Font::Bold, SIZE, &text);
                x += column.width;
            }
            writer.y -= 4;
            let y = writer.y;
            writer.hline(MARGIN, right, y);
        };

        header(self);
        for row in rows {
            if self.y - ROW < MARGIN {
                self.new_page();
                header(self);
            }
            self.y -= ROW - 4;
            let mut x = MARGIN;
            for (column, cell) in columns.iter().zip(row) {
                let text = truncate(cell, SIZE, column.width - 4);
                self.aligned(x + 2, column.width - 4, column.align, Font::Regular, SIZE, &text);
                x += column.width;
            }
            self.y -= 4;
        }
        let y = self.y;
        self.hline(MARGIN, right, y);
        self.y -= 6;
    }

    /// Serialises every page into a PDF file.
    pub fn finish(mut self) -> Result<Vec<u8>, DocumentError> {
        let last = std::mem::take(&mut self.current);
        self.pages.push(last);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}
