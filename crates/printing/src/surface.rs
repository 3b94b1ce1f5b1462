use crate::markup::{StyleState, VariantKind};

/// Drawable target able to select a font, measure text and draw it.
///
/// Coordinates and widths are integer device units of the surface.
pub trait Surface {
    type Font;

    fn select_font(&mut self, font: &Self::Font);
    fn measure_text(&mut self, text: &str) -> i32;
    fn draw_text(&mut self, x: i32, y: i32, text: &str);
}

/// Surface that can materialise font handles from a [`FontSpec`].
///
/// Handles release their underlying resource when dropped.
pub trait FontSource: Surface {
    type Error;

    fn create_font(&mut self, spec: &FontSpec) -> Result<Self::Font, Self::Error>;
}

/// A page-oriented surface driven by the document layout.
pub trait PageSurface: FontSource {
    /// Dots per inch on each axis.
    fn resolution(&self) -> Resolution;
    /// Printable page extent in device units.
    fn page_extent(&self) -> Extent;
    fn start_page(&mut self) -> Result<(), Self::Error>;
    fn end_page(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub x: i32,
    pub y: i32,
}

impl Resolution {
    pub const fn uniform(dpi: i32) -> Self {
        Self { x: dpi, y: dpi }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// Typeface, size, weight and slant of one font variant.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_pt: f32,
    pub weight: FontWeight,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size_pt: f32) -> Self {
        Self {
            family: family.into(),
            size_pt,
            weight: FontWeight::Normal,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }
}

/// Multiplier applied to both the large variant's size and the line height.
pub const LARGE_SCALE: f32 = 1.5;

/// Height of a line that used the large style, truncated toward zero.
pub fn enlarged_height(line_height: i32) -> i32 {
    (line_height as f32 * LARGE_SCALE) as i32
}

/// The five font handles precomputed for a document.
#[derive(Debug, Clone, PartialEq)]
pub struct FontVariants<F> {
    pub normal: F,
    pub bold: F,
    pub italic: F,
    pub bold_italic: F,
    pub large: F,
}

impl FontVariants<FontSpec> {
    /// Describes the variant set for a base family and size. The large variant is bold and upright.
    pub fn specs(family: &str, size_pt: f32) -> Self {
        let base = FontSpec::new(family, size_pt);
        Self {
            normal: base.clone(),
            bold: base.clone().bold(),
            italic: base.clone().italic(),
            bold_italic: base.bold().italic(),
            large: FontSpec::new(family, size_pt * LARGE_SCALE).bold(),
        }
    }
}

impl<F> FontVariants<F> {
    /// Creates every variant on `source`. Handles created before a failure are dropped.
    pub fn create<S>(source: &mut S, family: &str, size_pt: f32) -> Result<Self, S::Error>
    where
        S: FontSource<Font = F>,
    {
        let specs = FontVariants::<FontSpec>::specs(family, size_pt);
        Ok(Self {
            normal: source.create_font(&specs.normal)?,
            bold: source.create_font(&specs.bold)?,
            italic: source.create_font(&specs.italic)?,
            bold_italic: source.create_font(&specs.bold_italic)?,
            large: source.create_font(&specs.large)?,
        })
    }

    pub fn get(&self, kind: VariantKind) -> &F {
        match kind {
            VariantKind::Normal => &self.normal,
            VariantKind::Bold => &self.bold,
            VariantKind::Italic => &self.italic,
            VariantKind::BoldItalic => &self.bold_italic,
            VariantKind::Large => &self.large,
        }
    }

    pub fn resolve(&self, style: StyleState) -> &F {
        self.get(style.variant())
    }
}
