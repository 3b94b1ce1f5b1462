use std::fmt;

use log::warn;
use thiserror::Error;

use crate::job::{Orientation, PaperSize};
use crate::surface::{Extent, FontSource, FontSpec, PageSurface, Resolution, Surface};

/// Recorded draw commands for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintDisplayList {
    pub commands: Vec<DisplayCommand>,
}

impl PrintDisplayList {
    /// Append a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Returns true if the display list is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn glyph_runs(&self) -> impl Iterator<Item = &GlyphRun> {
        self.commands.iter().map(|command| match command {
            DisplayCommand::GlyphRun(run) => run,
        })
    }
}

/// Low-level drawing commands emitted by the line renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    GlyphRun(GlyphRun),
}

/// A run of text drawn in one font at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub text: String,
    pub font: FontSpec,
    pub position: Point,
}

/// 2D coordinate in device units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Paper, orientation and resolution of the pages a surface produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub dpi: i32,
}

impl PageGeometry {
    pub fn extent(&self) -> Extent {
        let (width_pt, height_pt) = self.paper.to_points(self.orientation);
        Extent {
            width: self.points_to_device(width_pt),
            height: self.points_to_device(height_pt),
        }
    }

    pub fn points_to_device(&self, points: f32) -> i32 {
        (points * self.dpi as f32 / 72.0).round() as i32
    }

    pub fn device_to_points(&self, units: i32) -> f32 {
        units as f32 * 72.0 / self.dpi.max(1) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    #[error("invalid font '{family}' at {size_pt}pt")]
    InvalidFont { family: String, size_pt: String },
    #[error("a page is already open")]
    PageAlreadyOpen,
    #[error("no page is open")]
    NoOpenPage,
}

/// Surface that records every draw into per-page display lists.
///
/// Text is measured with average advance widths rather than real glyph metrics.
#[derive(Debug)]
pub struct DisplayListSurface {
    geometry: PageGeometry,
    pages: Vec<PrintDisplayList>,
    current: Option<PrintDisplayList>,
    font: Option<FontSpec>,
}

impl DisplayListSurface {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: None,
            font: None,
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn pages(&self) -> &[PrintDisplayList] {
        &self.pages
    }

    /// Consumes the surface, returning finished pages. An open page is closed first.
    pub fn into_pages(mut self) -> Vec<PrintDisplayList> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        self.pages
    }
}

impl Surface for DisplayListSurface {
    type Font = FontSpec;

    fn select_font(&mut self, font: &Self::Font) {
        self.font = Some(font.clone());
    }

    fn measure_text(&mut self, text: &str) -> i32 {
        let Some(font) = self.font.as_ref() else {
            return 0;
        };
        let em = self.geometry.dpi as f32 * font.size_pt / 72.0;
        (text.chars().count() as f32 * em * average_advance(font)).round() as i32
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        let (Some(page), Some(font)) = (self.current.as_mut(), self.font.as_ref()) else {
            warn!("dropping text drawn outside a page or without a font: {text:?}");
            return;
        };
        page.push(DisplayCommand::GlyphRun(GlyphRun {
            text: text.to_string(),
            font: font.clone(),
            position: Point { x, y },
        }));
    }
}

impl FontSource for DisplayListSurface {
    type Error = DisplayError;

    fn create_font(&mut self, spec: &FontSpec) -> Result<Self::Font, Self::Error> {
        if spec.family.trim().is_empty() || !(spec.size_pt > 0.0) {
            return Err(DisplayError::InvalidFont {
                family: spec.family.clone(),
                size_pt: spec.size_pt.to_string(),
            });
        }
        Ok(spec.clone())
    }
}

impl PageSurface for DisplayListSurface {
    fn resolution(&self) -> Resolution {
        Resolution::uniform(self.geometry.dpi)
    }

    fn page_extent(&self) -> Extent {
        self.geometry.extent()
    }

    fn start_page(&mut self) -> Result<(), Self::Error> {
        if self.current.is_some() {
            return Err(DisplayError::PageAlreadyOpen);
        }
        self.current = Some(PrintDisplayList::default());
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), Self::Error> {
        let page = self.current.take().ok_or(DisplayError::NoOpenPage)?;
        self.pages.push(page);
        Ok(())
    }
}

/// Returns true for families whose glyphs share one advance width.
pub fn is_monospace(family: &str) -> bool {
    let family = family.to_ascii_lowercase();
    ["courier", "mono", "consolas", "fixed"]
        .iter()
        .any(|needle| family.contains(needle))
}

fn average_advance(font: &FontSpec) -> f32 {
    if is_monospace(&font.family) {
        0.6
    } else if font.is_bold() {
        0.525
    } else {
        0.5
    }
}
