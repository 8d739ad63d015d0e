//! Turns the content model into a rendered PDF document.
//!
//! [`PdfBuilder`] owns the page setup (paper size, margins, footer) plus the
//! cover and section list, and renders everything through `genpdf`. Every
//! section starts on a fresh page with a ruled heading, which is also what
//! lets the optional outline point one bookmark at each section page.

use std::path::Path;

use log::{debug, info};
#[cfg(feature = "bookmarks")]
use log::warn;

use genpdf::elements::{Break, FrameCellDecorator, PageBreak, Paragraph, TableLayout};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element, Margins, Mm, PageDecorator, Position, Size};

#[cfg(feature = "bookmarks")]
use crate::bookmarks::{self, OutlineEntry};
use crate::elements::{CaptionedFigure, SectionHeading};
use crate::error::{ReportError, Result};
use crate::fonts;
use crate::model::{
    Block, Cover, FigureBlock, HorizontalAlignment, RichParagraph, Section, TableBlock,
};

/// US Letter rotated to landscape, in millimetres.
pub const LETTER_LANDSCAPE_MM: (f64, f64) = (279.4, 215.9);

const HEADING_FONT_SIZE: u8 = 16;
const BASE_FONT_SIZE: u8 = 11;

/// A finished render.
pub struct PdfOutput {
    pub bytes: Vec<u8>,
}

impl PdfOutput {
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes).map_err(|e| ReportError::io(path, e))
    }
}

type FooterFactory = dyn Fn(usize) -> Box<dyn Element>;

/// Footer rendered through the page decorator into a reserved strip.
pub struct FooterSpec {
    height: Mm,
    factory: Box<FooterFactory>,
}

impl FooterSpec {
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

/// Builder for the report document.
pub struct PdfBuilder {
    title: Option<String>,
    paper_size: Size,
    margins: Margins,
    footer: Option<FooterSpec>,
    cover: Option<Cover>,
    sections: Vec<Section>,
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            title: None,
            paper_size: Size::new(LETTER_LANDSCAPE_MM.0, LETTER_LANDSCAPE_MM.1),
            margins: Margins::trbl(12.0, 14.0, 12.0, 14.0),
            footer: None,
            cover: None,
            sections: Vec::new(),
        }
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = margins.into();
        self
    }

    /// Configures a footer with a fixed height, built per page number.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    pub fn with_cover(mut self, cover: Cover) -> Self {
        self.cover = Some(cover);
        self
    }

    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Renders the document to PDF bytes.
    pub fn render(self) -> Result<PdfOutput> {
        let PdfBuilder {
            title,
            paper_size,
            margins,
            footer,
            cover,
            sections,
        } = self;

        let family = fonts::report_font_family()?;
        let mut document = genpdf::Document::new(family);
        document.set_paper_size(paper_size);
        document.set_font_size(BASE_FONT_SIZE);
        if let Some(title) = title {
            document.set_title(title);
        }
        document.set_page_decorator(ReportPageDecorator::new(margins, footer));

        if let Some(cover) = &cover {
            push_cover(&mut document, cover);
        }
        for section in &sections {
            debug!("laying out section '{}'", section.title());
            document.push(PageBreak::new());
            push_section(&mut document, section)?;
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        info!(
            "rendered document with {} sections ({} bytes)",
            sections.len(),
            bytes.len()
        );
        Ok(PdfOutput { bytes })
    }

    /// Renders the document and attaches one outline entry per section.
    ///
    /// The outline assumes the one-page-per-section layout; if content
    /// spilled onto extra pages the outline is skipped with a warning rather
    /// than pointing bookmarks at the wrong pages.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks(self) -> Result<PdfOutput> {
        let expected_pages = self.expected_pages();
        let entries = self.outline_entries();
        let output = self.render()?;

        let actual_pages = match bookmarks::page_count(&output.bytes) {
            Ok(n) => n,
            Err(err) => {
                warn!("could not inspect rendered PDF, skipping outline: {err}");
                return Ok(output);
            }
        };
        if actual_pages != expected_pages {
            warn!(
                "layout produced {actual_pages} pages where {expected_pages} were expected; skipping outline"
            );
            return Ok(output);
        }

        match bookmarks::attach_outline(&output.bytes, &entries) {
            Ok(bytes) => Ok(PdfOutput { bytes }),
            Err(err) => {
                warn!("failed to attach outline, keeping plain document: {err}");
                Ok(output)
            }
        }
    }

    #[cfg(feature = "bookmarks")]
    fn expected_pages(&self) -> usize {
        usize::from(self.cover.is_some()) + self.sections.len()
    }

    #[cfg(feature = "bookmarks")]
    fn outline_entries(&self) -> Vec<OutlineEntry> {
        let first = if self.cover.is_some() { 2 } else { 1 };
        self.sections
            .iter()
            .enumerate()
            .map(|(i, section)| OutlineEntry {
                title: section.title().to_string(),
                page: first + i,
            })
            .collect()
    }
}

fn alignment(value: HorizontalAlignment) -> Alignment {
    match value {
        HorizontalAlignment::Left => Alignment::Left,
        HorizontalAlignment::Center => Alignment::Center,
        HorizontalAlignment::Right => Alignment::Right,
    }
}

fn paragraph_element(paragraph: &RichParagraph) -> Paragraph {
    let mut element = Paragraph::default();
    for span in paragraph.spans() {
        let styled = span.to_styled_string();
        element.push_styled(styled.s, styled.style);
    }
    element.set_alignment(alignment(paragraph.alignment()));
    element
}

fn figure_element(figure: &FigureBlock) -> Result<CaptionedFigure> {
    let caption = figure.caption().map(paragraph_element);
    let mut element = CaptionedFigure::from_bytes(figure.png(), caption)?;
    element.set_alignment(alignment(figure.alignment()));
    element.set_width(figure.width_mm().map(Mm::from));
    Ok(element)
}

fn table_element(table: &TableBlock) -> Result<TableLayout> {
    let mut layout = TableLayout::new(table.weights().to_vec());
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut header_style = Style::new();
    header_style.set_bold();
    let mut header_row = layout.row();
    for header in table.headers() {
        header_row = header_row.element(
            Paragraph::new(header.as_str())
                .styled(header_style)
                .padded(1.5),
        );
    }
    header_row.push()?;

    for cells in table.rows() {
        let mut row = layout.row();
        for cell in cells {
            row = row.element(Paragraph::new(cell.as_str()).padded(1.5));
        }
        row.push()?;
    }
    Ok(layout)
}

fn centered(text: &str) -> Paragraph {
    let mut line = Paragraph::new(text);
    line.set_alignment(Alignment::Center);
    line
}

fn push_cover(document: &mut genpdf::Document, cover: &Cover) {
    document.push(Break::new(4.0));

    let mut title_style = Style::new();
    title_style.set_bold();
    title_style.set_font_size(28);
    document.push(centered(cover.title()).styled(title_style));

    if let Some(subtitle) = cover.subtitle() {
        document.push(Break::new(1.5));
        let mut subtitle_style = Style::new();
        subtitle_style.set_font_size(18);
        subtitle_style.set_color(Color::Rgb(90, 90, 90));
        document.push(centered(subtitle).styled(subtitle_style));
    }

    if !cover.meta_lines().is_empty() {
        document.push(Break::new(3.0));
        let mut meta_style = Style::new();
        meta_style.set_font_size(13);
        for line in cover.meta_lines() {
            document.push(centered(line).styled(meta_style));
            document.push(Break::new(0.4));
        }
    }
}

fn push_section(document: &mut genpdf::Document, section: &Section) -> Result<()> {
    document.push(SectionHeading::new(section.title(), HEADING_FONT_SIZE));
    for block in section.blocks() {
        match block {
            Block::Paragraph(paragraph) => document.push(paragraph_element(paragraph)),
            Block::Figure(figure) => document.push(figure_element(figure)?),
            Block::Table(table) => document.push(table_element(table)?),
            Block::Spacer(lines) => document.push(Break::new(*lines)),
        }
    }
    Ok(())
}

struct ReportPageDecorator {
    page: usize,
    margins: Margins,
    footer: Option<FooterSpec>,
}

impl ReportPageDecorator {
    fn new(margins: Margins, footer: Option<FooterSpec>) -> Self {
        Self {
            page: 0,
            margins,
            footer,
        }
    }
}

impl PageDecorator for ReportPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> std::result::Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        area.add_margins(self.margins);

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            // no footer on the cover; the strip is still reserved so every
            // page keeps the same content height
            if self.page > 1 {
                let mut footer_area = area.clone();
                footer_area.add_offset(Position::new(0, available - footer.height));
                let mut element = (footer.factory)(self.page);
                let result = element.render(context, footer_area, style)?;
                if result.has_more {
                    return Err(Error::new(
                        "Footer element does not fit into the reserved space",
                        ErrorKind::PageSizeExceeded,
                    ));
                }
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "bookmarks")]
    use crate::model::Cover;
    use crate::model::Section;

    #[test]
    fn sections_accumulate_in_order() {
        let mut builder = PdfBuilder::new();
        builder.push_section(Section::new("One"));
        builder.push_section(Section::new("Two"));
        let titles: Vec<&str> = builder.sections().iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[cfg(feature = "bookmarks")]
    #[test]
    fn outline_pages_start_after_the_cover() {
        let mut builder = PdfBuilder::new().with_cover(Cover::new("Title"));
        builder.push_section(Section::new("One"));
        builder.push_section(Section::new("Two"));
        let entries = builder.outline_entries();
        let pages: Vec<usize> = entries.iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![2, 3]);
        assert_eq!(builder.expected_pages(), 3);

        let mut plain = PdfBuilder::new();
        plain.push_section(Section::new("Only"));
        assert_eq!(plain.outline_entries()[0].page, 1);
        assert_eq!(plain.expected_pages(), 1);
    }
}
