use std::fmt::Write as _;
use std::io::Write as _;

use thiserror::Error;

use crate::display::{is_monospace, DisplayCommand, PageGeometry, PrintDisplayList};
use crate::surface::FontSpec;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("no pages to export")]
    NoPages,
    #[error("failed to format PDF content: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("failed to write PDF body: {0}")]
    Write(#[from] std::io::Error),
}

/// Standard Type1 base family a font spec maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaseFamily {
    Courier,
    Helvetica,
    Times,
}

impl BaseFamily {
    const ALL: [BaseFamily; 3] = [BaseFamily::Courier, BaseFamily::Helvetica, BaseFamily::Times];

    fn of(family: &str) -> Self {
        let lowered = family.to_ascii_lowercase();
        if is_monospace(&lowered) {
            BaseFamily::Courier
        } else if lowered.contains("times") || (lowered.contains("serif") && !lowered.contains("sans")) {
            BaseFamily::Times
        } else {
            BaseFamily::Helvetica
        }
    }

    /// Base font names for regular, bold, italic and bold-italic, in that order.
    fn faces(&self) -> [&'static str; 4] {
        match self {
            BaseFamily::Courier => [
                "Courier",
                "Courier-Bold",
                "Courier-Oblique",
                "Courier-BoldOblique",
            ],
            BaseFamily::Helvetica => [
                "Helvetica",
                "Helvetica-Bold",
                "Helvetica-Oblique",
                "Helvetica-BoldOblique",
            ],
            BaseFamily::Times => [
                "Times-Roman",
                "Times-Bold",
                "Times-Italic",
                "Times-BoldItalic",
            ],
        }
    }

    fn index(&self) -> usize {
        match self {
            BaseFamily::Courier => 0,
            BaseFamily::Helvetica => 1,
            BaseFamily::Times => 2,
        }
    }
}

/// Returns the standard base font a run in `font` is written with.
pub fn base_font_name(font: &FontSpec) -> &'static str {
    BaseFamily::of(&font.family).faces()[face_index(font)]
}

fn face_index(font: &FontSpec) -> usize {
    match (font.is_bold(), font.italic) {
        (false, false) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (true, true) => 3,
    }
}

fn resource_name(font: &FontSpec) -> String {
    let family = BaseFamily::of(&font.family);
    format!("F{}", family.index() * 4 + face_index(font) + 1)
}

/// Writes recorded pages as a PDF 1.4 document. Device units are converted to points
/// with the geometry's resolution; text positions are the top of each run.
pub fn render_pdf_document(
    pages: &[PrintDisplayList],
    geometry: &PageGeometry,
) -> Result<Vec<u8>, PdfError> {
    if pages.is_empty() {
        return Err(PdfError::NoPages);
    }

    let (page_width, page_height) = geometry.paper.to_points(geometry.orientation);
    let mut builder = PdfBuilder::new();

    let mut font_resources = String::new();
    for family in BaseFamily::ALL {
        for (face, base_font) in family.faces().iter().enumerate() {
            let object = builder.add_object(format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>"
            ));
            write!(
                &mut font_resources,
                "/F{} {} 0 R ",
                family.index() * 4 + face + 1,
                object
            )?;
        }
    }

    // The page tree is written last, so its object number is known up front.
    let pages_object_number = builder.objects.len() + pages.len() * 2 + 1;
    let mut page_objects = Vec::with_capacity(pages.len());
    for page in pages {
        let content_stream = render_page_stream(page, geometry, page_height)?;
        let content_object = builder.add_stream(&content_stream);
        let page_object = builder.add_object(format!(
            "<< /Type /Page /Parent {parent} 0 R /MediaBox [0 0 {width} {height}] \
             /Resources << /Font << {fonts}>> >> /Contents {content} 0 R >>",
            parent = pages_object_number,
            width = fmt_float(page_width),
            height = fmt_float(page_height),
            fonts = font_resources,
            content = content_object
        ));
        page_objects.push(page_object);
    }

    let kids = page_objects
        .iter()
        .map(|obj| format!("{obj} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    let pages_object = builder.add_object(format!(
        "<< /Type /Pages /Count {count} /Kids [{kids}] >>",
        count = pages.len()
    ));
    debug_assert_eq!(pages_object, pages_object_number);
    builder.set_catalog(format!(
        "<< /Type /Catalog /Pages {pages} 0 R >>",
        pages = pages_object
    ));

    builder.finish()
}

fn render_page_stream(
    display_list: &PrintDisplayList,
    geometry: &PageGeometry,
    page_height: f32,
) -> Result<Vec<u8>, PdfError> {
    let mut stream = String::new();
    for command in &display_list.commands {
        match command {
            DisplayCommand::GlyphRun(run) => {
                let x = geometry.device_to_points(run.position.x);
                let top = geometry.device_to_points(run.position.y);
                let y = page_height - top - run.font.size_pt;
                writeln!(
                    &mut stream,
                    "BT\n/{font} {size} Tf\n1 0 0 1 {x} {y} Tm\n({text}) Tj\nET",
                    font = resource_name(&run.font),
                    size = fmt_float(run.font.size_pt),
                    x = fmt_float(x),
                    y = fmt_float(y),
                    text = pdf_escape_text(&run.text)
                )?;
            }
        }
    }
    Ok(stream.into_bytes())
}

fn fmt_float(value: f32) -> String {
    format!("{:.3}", value)
}

fn pdf_escape_text(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '(' | ')' | '\\' => {
                output.push('\\');
                output.push(ch);
            }
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            ch if ch.is_ascii() => output.push(ch),
            // Standard fonts only cover WinAnsi; anything else is emitted as '?'.
            ch => match winansi_byte(ch) {
                Some(byte) => {
                    let _ = write!(output, "\\{:03o}", byte);
                }
                None => output.push('?'),
            },
        }
    }
    output
}

fn winansi_byte(ch: char) -> Option<u8> {
    match ch as u32 {
        code @ 0xA0..=0xFF => Some(code as u8),
        0x20AC => Some(0x80),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95),
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        _ => None,
    }
}

struct PdfBuilder {
    objects: Vec<PdfObject>,
    catalog: Option<String>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
            catalog: None,
        }
    }

    fn add_object(&mut self, body: impl Into<String>) -> usize {
        let number = self.objects.len() + 1;
        self.objects.push(PdfObject {
            number,
            body: body.into(),
        });
        number
    }

    fn add_stream(&mut self, stream: &[u8]) -> usize {
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len());
        body.push_str(&String::from_utf8_lossy(stream));
        body.push_str("\nendstream");
        self.add_object(body)
    }

    fn set_catalog(&mut self, catalog: String) {
        self.catalog = Some(catalog);
    }

    fn finish(mut self) -> Result<Vec<u8>, PdfError> {
        if let Some(catalog) = self.catalog.take() {
            self.add_object(catalog);
        }

        let mut output = Vec::new();
        output.extend_from_slice(b"%PDF-1.4\n%\xFF\xFF\xFF\xFF\n");
        let mut offsets = Vec::with_capacity(self.objects.len());

        for object in &self.objects {
            offsets.push(output.len());
            writeln!(
                &mut output,
                "{} 0 obj\n{}\nendobj",
                object.number, object.body
            )?;
        }

        let xref_start = output.len();
        writeln!(
            &mut output,
            "xref\n0 {}\n0000000000 65535 f ",
            self.objects.len() + 1
        )?;
        for offset in &offsets {
            writeln!(&mut output, "{:010} 00000 n ", offset)?;
        }

        writeln!(
            &mut output,
            "trailer\n<< /Size {} /Root {} 0 R >>",
            self.objects.len() + 1,
            self.objects.len()
        )?;
        writeln!(&mut output, "startxref\n{}\n%%EOF", xref_start)?;

        Ok(output)
    }
}

struct PdfObject {
    number: usize,
    body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{GlyphRun, Point};
    use crate::job::{Orientation, PaperId, PaperSize};

    fn geometry() -> PageGeometry {
        PageGeometry {
            paper: PaperSize::standard(PaperId::A4).unwrap(),
            orientation: Orientation::Portrait,
            dpi: 72,
        }
    }

    fn page(runs: &[(&str, FontSpec)]) -> PrintDisplayList {
        let mut list = PrintDisplayList::default();
        for (idx, (text, font)) in runs.iter().enumerate() {
            list.push(DisplayCommand::GlyphRun(GlyphRun {
                text: text.to_string(),
                font: font.clone(),
                position: Point {
                    x: 36 + idx as i32 * 40,
                    y: 36,
                },
            }));
        }
        list
    }

    #[test]
    fn maps_families_to_standard_fonts() {
        assert_eq!(base_font_name(&FontSpec::new("Courier New", 12.0)), "Courier");
        assert_eq!(
            base_font_name(&FontSpec::new("Times New Roman", 12.0).bold().italic()),
            "Times-BoldItalic"
        );
        assert_eq!(
            base_font_name(&FontSpec::new("Arial", 12.0).italic()),
            "Helvetica-Oblique"
        );
        assert_eq!(
            base_font_name(&FontSpec::new("DejaVu Sans", 12.0).bold()),
            "Helvetica-Bold"
        );
    }

    #[test]
    fn empty_document_is_rejected() {
        assert!(matches!(
            render_pdf_document(&[], &geometry()),
            Err(PdfError::NoPages)
        ));
    }

    #[test]
    fn writes_runs_with_their_font_resources() {
        let pages = vec![page(&[
            ("plain", FontSpec::new("Courier New", 12.0)),
            ("strong", FontSpec::new("Courier New", 12.0).bold()),
        ])];
        let pdf = render_pdf_document(&pages, &geometry()).unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/BaseFont /Courier-Bold"));
        assert!(text.contains("/F1 12.000 Tf"));
        assert!(text.contains("/F2 12.000 Tf"));
        assert!(text.contains("(strong) Tj"));
        assert!(text.contains("/Type /Catalog"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn page_parent_points_at_page_tree() {
        let pages = vec![PrintDisplayList::default(), PrintDisplayList::default()];
        let pdf = render_pdf_document(&pages, &geometry()).unwrap();
        let text = String::from_utf8_lossy(&pdf);
        // 12 font objects, then (stream, page) per page, then the page tree.
        assert!(text.contains("/Parent 17 0 R"));
        assert!(text.contains("17 0 obj\n<< /Type /Pages /Count 2 /Kids [14 0 R 16 0 R] >>"));
    }

    #[test]
    fn escapes_text() {
        assert_eq!(pdf_escape_text("a(b)\\c"), "a\\(b\\)\\\\c");
        assert_eq!(pdf_escape_text("café"), "caf\\351");
        assert_eq!(pdf_escape_text("中"), "?");
    }
}
