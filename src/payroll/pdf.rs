use std::borrow::Cow;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rect, Rgb as PdfRgb,
};

use super::render::{Align, Block, Document, DocumentSink, Grid, RenderError, Rgb, TextStyle, Tone};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
/// 30pt
const MARGIN: f32 = 10.6;
const MM_PER_PT: f32 = 0.3528;
const CELL_PADDING: f32 = 2.8;
/// Helvetica averages roughly half an em per glyph.
const GLYPH_EM: f32 = 0.5;

/// A4 PDF output using the built-in Helvetica family, so no font files are needed.
///
/// The built-in fonts only cover ASCII here: any other character (a "₹" symbol,
/// accented or non-Latin names) is drawn as `?`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfSink;

impl DocumentSink for PdfSink {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        layout(document).map(|(bytes, _)| bytes)
    }
}

/// Lays the document out and returns the PDF bytes with the page count.
fn layout(document: &Document) -> Result<(Vec<u8>, usize), RenderError> {
    let (doc, page, layer) =
        PdfDocument::new(&document.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts::load(&doc)?;
    let layer = doc.get_page(page).get_layer(layer);

    let pages = {
        let mut page = PageCursor {
            doc: &doc,
            layer,
            fonts,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        };
        for block in &document.blocks {
            page.block(block);
        }
        page.pages
    };

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| RenderError::Backend(e.to_string()))?;
    Ok((bytes, pages))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    bold_italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, RenderError> {
        let add = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| RenderError::Backend(e.to_string()))
        };

        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            italic: add(BuiltinFont::HelveticaOblique)?,
            bold_italic: add(BuiltinFont::HelveticaBoldOblique)?,
        })
    }

    fn pick(&self, bold: bool, italic: bool) -> &IndirectFontRef {
        match (bold, italic) {
            (false, false) => &self.regular,
            (true, false) => &self.bold,
            (false, true) => &self.italic,
            (true, true) => &self.bold_italic,
        }
    }
}

/// Current page plus the vertical write position (mm from the bottom edge).
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    y: f32,
    pages: usize,
}

impl PageCursor<'_> {
    fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    /// Starts a new page when `height` mm no longer fit above the bottom margin.
    fn reserve(&mut self, height: f32) {
        if self.y - height >= MARGIN {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph { text, style } => self.paragraph(text, style),
            Block::Banner { text, fill } => self.banner(text, *fill),
            Block::Grid(grid) => self.grid(grid),
            Block::Spacer(points) => {
                let height = points * MM_PER_PT;
                if self.y - height < MARGIN {
                    self.reserve(height);
                } else {
                    self.y -= height;
                }
            }
        }
    }

    fn paragraph(&mut self, text: &str, style: &TextStyle) {
        let line_height = line_height(style.size);
        for line in wrap(text, Self::content_width(), style.size) {
            self.reserve(line_height);
            let x = match style.align {
                Align::Left => MARGIN,
                Align::Center => MARGIN + (Self::content_width() - text_width(&line, style.size)) / 2.0,
            };
            self.y -= line_height;
            self.text(&line, x, self.y + descent(style.size), style.size, style.bold, style.italic, style.tone);
        }
        self.y -= style.size * MM_PER_PT * 0.4;
    }

    fn banner(&mut self, text: &str, fill: Rgb) {
        let size = 12.0;
        let height = line_height(size) + 2.0 * 3.5;
        self.reserve(height);

        let top = self.y;
        self.rect(MARGIN, top - height, Self::content_width(), height, Some(fill));
        let x = MARGIN + (Self::content_width() - text_width(text, size)) / 2.0;
        let baseline = top - height / 2.0 - size * MM_PER_PT * 0.35;
        self.text(text, x, baseline, size, true, false, Tone::White);
        self.y = top - height;
    }

    fn grid(&mut self, grid: &Grid) {
        let width = Self::content_width();
        let columns: Vec<f32> = grid.widths.iter().map(|w| w * width).collect();
        let line_height = line_height(grid.font_size);

        for row in &grid.rows {
            let wrapped: Vec<Vec<String>> = row
                .cells
                .iter()
                .zip(&columns)
                .map(|(cell, column)| wrap(&cell.text, column - 2.0 * CELL_PADDING, grid.font_size))
                .collect();
            let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
            let height = lines as f32 * line_height + 2.0 * CELL_PADDING;
            self.reserve(height);

            let top = self.y;
            let mut x = MARGIN;
            for ((cell, column), cell_lines) in row.cells.iter().zip(&columns).zip(&wrapped) {
                self.rect(x, top - height, *column, height, row.fill);
                let mut baseline = top - CELL_PADDING;
                for line in cell_lines {
                    baseline -= line_height;
                    self.text(
                        line,
                        x + CELL_PADDING,
                        baseline + descent(grid.font_size),
                        grid.font_size,
                        cell.bold,
                        false,
                        row.tone,
                    );
                }
                x += column;
            }
            self.y = top - height;
        }
    }

    /// Filled (when `fill` is set) and grey-outlined rectangle; `y` is the bottom edge.
    fn rect(&self, x: f32, y: f32, width: f32, height: f32, fill: Option<Rgb>) {
        if let Some(fill) = fill {
            self.layer.set_fill_color(color(fill));
            self.layer.add_rect(
                Rect::new(Mm(x), Mm(y), Mm(x + width), Mm(y + height)).with_mode(PaintMode::Fill),
            );
        }
        self.layer.set_outline_color(color(Rgb(0x80, 0x80, 0x80)));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_rect(
            Rect::new(Mm(x), Mm(y), Mm(x + width), Mm(y + height)).with_mode(PaintMode::Stroke),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn text(&self, text: &str, x: f32, y: f32, size: f32, bold: bool, italic: bool, tone: Tone) {
        if text.is_empty() {
            return;
        }
        let tone = match tone {
            Tone::Black => Rgb(0, 0, 0),
            Tone::White => Rgb(0xff, 0xff, 0xff),
            Tone::Grey => Rgb(0x80, 0x80, 0x80),
        };
        self.layer.set_fill_color(color(tone));
        self.layer.use_text(
            drawable(text),
            size,
            Mm(x),
            Mm(y),
            self.fonts.pick(bold, italic),
        );
    }
}

/// Replaces what the built-in fonts cannot encode with `?`.
fn drawable(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
            .collect(),
    )
}

fn color(rgb: Rgb) -> Color {
    let channel = |c: u8| f32::from(c) / 255.0;
    Color::Rgb(PdfRgb::new(channel(rgb.0), channel(rgb.1), channel(rgb.2), None))
}

fn line_height(size: f32) -> f32 {
    size * 1.2 * MM_PER_PT
}

/// Offset from the bottom of a line box to the text baseline.
fn descent(size: f32) -> f32 {
    size * 0.25 * MM_PER_PT
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_EM * MM_PER_PT
}

/// Greedy word wrap against the estimated glyph width. Never returns an empty list.
fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, size) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}
