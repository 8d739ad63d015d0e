//! Data structures describing the logical content of the report.
//!
//! The types in this module form a small, renderer-agnostic model of what the
//! finished document contains: a cover followed by titled sections, each a
//! list of paragraphs, figures, tables and spacing blocks. The assembly code
//! in [`crate::report`] produces these values; [`crate::builder::PdfBuilder`]
//! turns them into `genpdf` elements.

use crate::richtext::{self, ParseError, Span};

/// Horizontal placement of a block once it is converted into
/// [`genpdf::elements`]. Maps directly to [`genpdf::Alignment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A paragraph of styled text with alignment metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
}

impl RichParagraph {
    /// Creates a paragraph from the provided spans using left alignment.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    /// Parses report markup into a paragraph (see [`richtext::parse_markup`]).
    pub fn from_markup(input: &str) -> Result<Self, ParseError> {
        Ok(Self::new(richtext::parse_markup(input)?))
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// A rendered chart plus its presentation metadata.
///
/// Figures hold encoded PNG bytes rather than file paths: charts are drawn
/// in memory and embedded straight into the document. The width is stored in
/// millimetres to map cleanly onto the [`genpdf::elements::Image`] scaling
/// API; captions reuse [`RichParagraph`] so they can carry inline styling.
#[derive(Clone, Debug, PartialEq)]
pub struct FigureBlock {
    png: Vec<u8>,
    caption: Option<RichParagraph>,
    alignment: HorizontalAlignment,
    width_mm: Option<f64>,
}

impl FigureBlock {
    /// Creates a centered figure from encoded PNG bytes.
    pub fn new(png: impl Into<Vec<u8>>) -> Self {
        Self {
            png: png.into(),
            caption: None,
            alignment: HorizontalAlignment::Center,
            width_mm: None,
        }
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn caption(&self) -> Option<&RichParagraph> {
        self.caption.as_ref()
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn width_mm(&self) -> Option<f64> {
        self.width_mm
    }

    pub fn with_caption(mut self, caption: impl Into<Option<RichParagraph>>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Constrains the rendered width in millimetres.
    pub fn with_width_mm(mut self, width_mm: impl Into<Option<f64>>) -> Self {
        self.width_mm = width_mm.into();
        self
    }
}

/// A simple grid of text cells with a header row.
///
/// Column `weights` are relative widths, one per column; they must match the
/// header length.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    headers: Vec<String>,
    weights: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl TableBlock {
    pub fn new(headers: Vec<String>, weights: Vec<usize>) -> Self {
        debug_assert_eq!(headers.len(), weights.len());
        Self {
            headers,
            weights,
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn weights(&self) -> &[usize] {
        &self.weights
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn with_row(mut self, row: Vec<String>) -> Self {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
        self
    }
}

/// Individual content blocks that make up a section.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Paragraph(RichParagraph),
    Figure(FigureBlock),
    Table(TableBlock),
    /// Vertical whitespace, measured in text lines.
    Spacer(f64),
}

impl Block {
    pub fn paragraph(spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(RichParagraph::new(spans))
    }

    /// Builds a paragraph block straight from report markup.
    pub fn markup(input: &str) -> Result<Self, ParseError> {
        Ok(Self::Paragraph(RichParagraph::from_markup(input)?))
    }
}

/// The cover page: a centered title with optional subtitle and a few lines of
/// metadata (generation date, row counts) underneath.
#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
    title: String,
    subtitle: Option<String>,
    meta_lines: Vec<String>,
}

impl Cover {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            meta_lines: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn meta_lines(&self) -> &[String] {
        &self.meta_lines
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<Option<String>>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_meta_line(mut self, line: impl Into<String>) -> Self {
        self.meta_lines.push(line.into());
        self
    }
}

/// A titled report section. Every section starts on a fresh page and gets a
/// heading rule; the blocks follow in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    title: String,
    blocks: Vec<Block>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_blocks_parse_into_spans() {
        let block = Block::markup("plain **bold**").unwrap();
        let Block::Paragraph(paragraph) = block else {
            panic!("expected a paragraph block");
        };
        assert_eq!(paragraph.spans().len(), 2);
        assert!(paragraph.spans()[1].is_bold());
    }

    #[test]
    fn figures_default_to_centered() {
        let figure = FigureBlock::new(vec![1, 2, 3]).with_width_mm(120.0);
        assert_eq!(figure.alignment(), HorizontalAlignment::Center);
        assert_eq!(figure.width_mm(), Some(120.0));
        assert!(figure.caption().is_none());
    }

    #[test]
    fn cover_collects_meta_lines() {
        let cover = Cover::new("Title")
            .with_subtitle("Subtitle".to_string())
            .with_meta_line("Generated: today")
            .with_meta_line("Rows: 3");
        assert_eq!(cover.subtitle(), Some("Subtitle"));
        assert_eq!(cover.meta_lines().len(), 2);
    }

    #[test]
    fn sections_accumulate_blocks_in_order() {
        let section = Section::new("Overview")
            .with_block(Block::Spacer(1.0))
            .with_blocks([Block::paragraph(Vec::new()), Block::Spacer(0.5)]);
        assert_eq!(section.blocks().len(), 3);
        assert!(matches!(section.blocks()[0], Block::Spacer(_)));
    }
}
