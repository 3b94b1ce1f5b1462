use log::debug;

use crate::job::Margin;
use crate::markup::split_runs;
use crate::render::render_line;
use crate::surface::{enlarged_height, Extent, FontVariants, PageSurface, Resolution};

/// Options used by the document driver when laying out rich text.
/// 文件排版時所依據的選項。
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub font_family: String,
    pub font_size_pt: f32,
    /// Multiplier applied to the font's pixel size to obtain the base line height.
    pub line_spacing: f32,
    pub margins: Margin,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            font_family: "Courier New".to_string(),
            font_size_pt: 12.0,
            line_spacing: 1.2,
            margins: Margin::uniform(36.0),
        }
    }
}

/// Printable region of a page in device units, after applying margins.
/// 套用邊界後的可列印範圍（裝置單位）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintableArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PrintableArea {
    pub fn new(extent: Extent, margins: Margin, resolution: Resolution) -> Self {
        let to_x = |points: f32| (points * resolution.x as f32 / 72.0).round() as i32;
        let to_y = |points: f32| (points * resolution.y as f32 / 72.0).round() as i32;
        Self {
            left: to_x(margins.left),
            top: to_y(margins.top),
            right: (extent.width - to_x(margins.right)).max(0),
            bottom: (extent.height - to_y(margins.bottom)).max(0),
        }
    }
}

/// Summary produced after laying out a document.
/// 文件排版完成後的摘要資訊。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSummary {
    pub total_pages: u32,
    pub total_lines: usize,
    /// Lines that used the large style and therefore consumed extra height.
    pub enlarged_lines: usize,
}

/// Base line height in device units for a font size at a vertical resolution.
pub fn base_line_height(font_size_pt: f32, dpi_y: i32, line_spacing: f32) -> i32 {
    let pixels = font_size_pt * dpi_y as f32 / 72.0;
    (pixels * line_spacing).round().max(1.0) as i32
}

/// Splits a document into lines. `\r\n` and `\n` both terminate a line and a
/// trailing terminator does not add an empty line.
pub fn split_lines(text: &str) -> std::str::Lines<'_> {
    text.lines()
}

/// Lays out `text` on `surface`, one markup line at a time, starting new pages as needed.
/// 逐行將標記文字排版至 `surface`，必要時換頁。
///
/// Font variants are created once before the first line and released after the last.
/// A line that would cross the bottom margin moves to a new page unless it is the
/// first line of the current page. Empty documents still produce one blank page.
pub fn layout_document<S>(
    surface: &mut S,
    text: &str,
    options: &LayoutOptions,
) -> Result<LayoutSummary, S::Error>
where
    S: PageSurface,
{
    let resolution = surface.resolution();
    let area = PrintableArea::new(surface.page_extent(), options.margins, resolution);
    let line_height = base_line_height(options.font_size_pt, resolution.y, options.line_spacing);
    let fonts = FontVariants::create(surface, &options.font_family, options.font_size_pt)?;

    surface.start_page()?;
    let mut summary = LayoutSummary {
        total_pages: 1,
        total_lines: 0,
        enlarged_lines: 0,
    };
    let mut y = area.top;
    let mut lines_on_page = 0usize;

    for line in split_lines(text) {
        let enlarged = split_runs(line).large_seen;
        let expected_height = if enlarged {
            enlarged_height(line_height)
        } else {
            line_height
        };

        if lines_on_page > 0 && y + expected_height > area.bottom {
            surface.end_page()?;
            surface.start_page()?;
            summary.total_pages += 1;
            debug!(
                "page {} starts at line {}",
                summary.total_pages,
                summary.total_lines + 1
            );
            y = area.top;
            lines_on_page = 0;
        }

        let result = render_line(surface, line, area.left, y, &fonts, line_height);
        y += result.consumed_height;
        lines_on_page += 1;
        summary.total_lines += 1;
        if enlarged {
            summary.enlarged_lines += 1;
        }
    }

    surface.end_page()?;
    debug!(
        "laid out {} lines on {} pages ({} enlarged)",
        summary.total_lines, summary.total_pages, summary.enlarged_lines
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayError, DisplayListSurface, PageGeometry, PrintDisplayList};
    use crate::job::{Orientation, PaperId, PaperSize};

    // 60pt tall page at 72 dpi with a 12-unit line height: five lines per page.
    fn geometry() -> PageGeometry {
        let height_mm = (60.0 / 72.0) * 25.4;
        PageGeometry {
            paper: PaperSize::new(PaperId::Custom, 50.0, height_mm as f32),
            orientation: Orientation::Portrait,
            dpi: 72,
        }
    }

    fn options() -> LayoutOptions {
        LayoutOptions {
            font_family: "Courier New".into(),
            font_size_pt: 10.0,
            line_spacing: 1.2,
            margins: Margin::zero(),
        }
    }

    fn lay_out(text: &str) -> (LayoutSummary, Vec<PrintDisplayList>) {
        let mut surface = DisplayListSurface::new(geometry());
        let summary = layout_document(&mut surface, text, &options()).expect("layout");
        (summary, surface.into_pages())
    }

    fn ys(page: &PrintDisplayList) -> Vec<i32> {
        page.glyph_runs().map(|run| run.position.y).collect()
    }

    #[test]
    fn line_height_from_font_and_resolution() {
        assert_eq!(base_line_height(12.0, 600, 1.2), 120);
        assert_eq!(base_line_height(10.0, 72, 1.2), 12);
        assert_eq!(base_line_height(0.0, 72, 1.2), 1);
    }

    #[test]
    fn split_lines_handles_crlf() {
        let lines: Vec<&str> = split_lines("a\r\nb\n\nc\n").collect();
        assert_eq!(lines, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn paginates_into_multiple_pages() {
        let text = (0..12).map(|idx| format!("Line {idx}")).collect::<Vec<_>>().join("\n");
        let (summary, pages) = lay_out(&text);
        assert_eq!(summary.total_lines, 12);
        assert_eq!(summary.total_pages, 3);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].commands.len(), 5);
        assert_eq!(pages[1].commands.len(), 5);
        assert_eq!(pages[2].commands.len(), 2);
        assert_eq!(ys(&pages[1]), vec![0, 12, 24, 36, 48]);
    }

    #[test]
    fn empty_document_produces_single_blank_page() {
        let (summary, pages) = lay_out("");
        assert_eq!(summary.total_lines, 0);
        assert_eq!(summary.total_pages, 1);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn blank_lines_still_advance() {
        let (_, pages) = lay_out("a\n\nb");
        assert_eq!(ys(&pages[0]), vec![0, 24]);
    }

    #[test]
    fn enlarged_line_moves_to_next_page() {
        let (summary, pages) = lay_out("a\nb\nc\nd\n##e##");
        assert_eq!(summary.total_pages, 2);
        assert_eq!(summary.enlarged_lines, 1);
        let run = pages[1].glyph_runs().next().expect("large run");
        assert_eq!(run.text, "e");
        assert_eq!(run.position.y, 0);
        assert_eq!(run.font.size_pt, 15.0);
    }

    #[test]
    fn enlarged_line_advances_by_one_and_a_half() {
        let (_, pages) = lay_out("##Title##\nbody");
        assert_eq!(ys(&pages[0]), vec![0, 18]);
    }

    #[test]
    fn margins_offset_the_origin() {
        let mut surface = DisplayListSurface::new(PageGeometry {
            dpi: 144,
            ..geometry()
        });
        let options = LayoutOptions {
            margins: Margin {
                top: 6.0,
                bottom: 0.0,
                left: 9.0,
                right: 0.0,
            },
            ..options()
        };
        layout_document(&mut surface, "x", &options).unwrap();
        let pages = surface.into_pages();
        let run = pages[0].glyph_runs().next().unwrap();
        assert_eq!((run.position.x, run.position.y), (18, 12));
    }

    #[test]
    fn invalid_font_is_reported_before_any_page() {
        let mut surface = DisplayListSurface::new(geometry());
        let options = LayoutOptions {
            font_family: "  ".into(),
            ..options()
        };
        let err = layout_document(&mut surface, "text", &options).unwrap_err();
        assert!(matches!(err, DisplayError::InvalidFont { .. }));
        assert!(surface.into_pages().is_empty());
    }
}
