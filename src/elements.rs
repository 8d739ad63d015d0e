//! Custom `genpdf` elements used by the report renderer.
//!
//! Adds a figure element that stacks a caption under an image, and the ruled
//! section heading drawn at the top of every report page.

use image::GenericImageView;

use genpdf::elements::{Image, Paragraph};
use genpdf::error::{Context as _, Error};
use genpdf::style::Style;
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Scale, Size};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const DEFAULT_CAPTION_SPACING_MM: f64 = 2.0;
const DEFAULT_RULE_GAP_MM: f64 = 1.2;
const DEFAULT_HEADING_SPACING_MM: f64 = 4.0;

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Decodes in-memory image bytes with descriptive errors.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<image::DynamicImage, Error> {
    image::load_from_memory(bytes.as_ref()).context("Failed to decode image from provided bytes")
}

/// Converts encoded image bytes into a `genpdf` image plus its natural size.
pub fn image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<(Image, Size), Error> {
    let dynamic = decode_image_from_bytes(bytes)?;
    let size = estimated_image_size(&dynamic, DEFAULT_IMAGE_DPI);
    let image = Image::from_dynamic_image(dynamic)?;
    Ok((image, size))
}

fn default_caption_spacing() -> Mm {
    mm_from_f64(DEFAULT_CAPTION_SPACING_MM)
}

/// An image with an optional caption paragraph stacked underneath.
///
/// Image and caption share one alignment, and the image can be rescaled to a
/// target width while keeping its aspect ratio.
pub struct CaptionedFigure {
    image: Image,
    caption: Option<Paragraph>,
    alignment: Alignment,
    natural_size: Size,
    requested_width: Option<Mm>,
    spacing: Mm,
}

impl CaptionedFigure {
    /// Creates a figure from encoded image bytes.
    pub fn from_bytes(
        bytes: impl AsRef<[u8]>,
        caption: impl Into<Option<Paragraph>>,
    ) -> Result<Self, Error> {
        let (image, natural_size) = image_from_bytes(bytes)?;
        let mut figure = Self {
            image,
            caption: caption.into(),
            alignment: Alignment::Left,
            natural_size,
            requested_width: None,
            spacing: default_caption_spacing(),
        };
        figure.apply_alignment();
        Ok(figure)
    }

    /// Sets the horizontal alignment used by both the image and the caption.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
        self.apply_alignment();
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.set_alignment(alignment);
        self
    }

    /// Constrains the rendered width while preserving the aspect ratio.
    pub fn set_width(&mut self, width: Option<Mm>) {
        self.requested_width = width;
        self.apply_width();
    }

    pub fn with_width(mut self, width: impl Into<Option<Mm>>) -> Self {
        self.set_width(width.into());
        self
    }

    /// Sets the gap between the image and the caption.
    pub fn set_spacing(&mut self, spacing: Mm) {
        self.spacing = spacing;
    }

    pub fn with_spacing(mut self, spacing: Mm) -> Self {
        self.set_spacing(spacing);
        self
    }

    fn apply_alignment(&mut self) {
        self.image.set_alignment(self.alignment);
        if let Some(caption) = &mut self.caption {
            caption.set_alignment(self.alignment);
        }
    }

    fn apply_width(&mut self) {
        if let Some(width) = self.requested_width {
            let natural = mm_to_f64(self.natural_size.width);
            if natural > f64::EPSILON {
                let scale = mm_to_f64(width) / natural;
                self.image.set_scale(Scale::new(scale, scale));
            }
        } else {
            self.image.set_scale(Scale::new(1.0, 1.0));
        }
    }
}

impl Element for CaptionedFigure {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.apply_alignment();
        self.apply_width();

        let mut result = RenderResult::default();
        let image_result = self.image.render(context, area.clone(), style)?;
        result.size = result.size.stack_vertical(image_result.size);
        result.has_more |= image_result.has_more;

        if let Some(caption) = &mut self.caption {
            let spacing = self.spacing;
            area.add_offset(Position::new(0, image_result.size.height + spacing));
            if mm_to_f64(spacing) > 0.0 {
                result.size = result.size.stack_vertical(Size::new(0, spacing));
            }

            let caption_result = caption.render(context, area, style)?;
            result.size = result.size.stack_vertical(caption_result.size);
            result.has_more |= caption_result.has_more;
        }

        Ok(result)
    }
}

/// A bold section title with a horizontal rule drawn underneath.
pub struct SectionHeading {
    text: String,
    font_size: u8,
    rule_gap: Mm,
    spacing: Mm,
}

impl SectionHeading {
    pub fn new(text: impl Into<String>, font_size: u8) -> Self {
        Self {
            text: text.into(),
            font_size,
            rule_gap: mm_from_f64(DEFAULT_RULE_GAP_MM),
            spacing: mm_from_f64(DEFAULT_HEADING_SPACING_MM),
        }
    }

    /// Sets the gap between the rule and the content below it.
    pub fn with_spacing(mut self, spacing: Mm) -> Self {
        self.spacing = spacing;
        self
    }
}

impl Element for SectionHeading {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut heading_style = style;
        heading_style.set_bold();
        heading_style.set_font_size(self.font_size);

        let line_height = heading_style.line_height(&context.font_cache);
        let rule_y = line_height + self.rule_gap;
        let total_height = rule_y + self.spacing;

        let mut result = RenderResult::default();
        if total_height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        if let Some(mut section) =
            area.text_section(&context.font_cache, Position::new(0, 0), heading_style)
        {
            section.print_str(&self.text, heading_style)?;
        } else {
            result.has_more = true;
            return Ok(result);
        }

        let width = area.size().width;
        area.draw_line(
            vec![Position::new(0, rule_y), Position::new(width, rule_y)],
            heading_style,
        );

        result.size = Size::new(width, total_height);
        Ok(result)
    }
}
