use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::layout::LayoutOptions;

/// Opaque identifier for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrintJobId(u64);

impl PrintJobId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PrintJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrintJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "print-job-{}", self.0)
    }
}

/// Orientation of a print page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Orientation::Portrait),
            2 => Some(Orientation::Landscape),
            _ => None,
        }
    }

    pub const fn code(&self) -> i16 {
        match self {
            Orientation::Portrait => 1,
            Orientation::Landscape => 2,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        }
    }
}

/// Duplex (two-sided) printing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplexMode {
    Off,
    LongEdge,
    ShortEdge,
}

impl DuplexMode {
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(DuplexMode::Off),
            2 => Some(DuplexMode::LongEdge),
            3 => Some(DuplexMode::ShortEdge),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            DuplexMode::Off => "Single-sided",
            DuplexMode::LongEdge => "Duplex (Flip on Long Edge)",
            DuplexMode::ShortEdge => "Duplex (Flip on Short Edge)",
        }
    }
}

/// Print quality as stored in the device mode: a named level or an explicit DPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintQuality {
    Draft,
    Low,
    Medium,
    High,
    Dpi(u16),
}

impl PrintQuality {
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            -1 => Some(PrintQuality::Draft),
            -2 => Some(PrintQuality::Low),
            -3 => Some(PrintQuality::Medium),
            -4 => Some(PrintQuality::High),
            dpi if dpi > 0 => Some(PrintQuality::Dpi(dpi as u16)),
            _ => None,
        }
    }

    /// Device-mode code. Resolutions beyond the code range saturate at `i16::MAX`.
    pub fn code(&self) -> i16 {
        match self {
            PrintQuality::Draft => -1,
            PrintQuality::Low => -2,
            PrintQuality::Medium => -3,
            PrintQuality::High => -4,
            PrintQuality::Dpi(dpi) => i16::try_from(*dpi).unwrap_or(i16::MAX),
        }
    }
}

impl fmt::Display for PrintQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintQuality::Draft => f.write_str("Draft"),
            PrintQuality::Low => f.write_str("Low"),
            PrintQuality::Medium => f.write_str("Medium"),
            PrintQuality::High => f.write_str("High"),
            PrintQuality::Dpi(dpi) => write!(f, "{dpi} DPI"),
        }
    }
}

/// Paper tray or feed selected as the default source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSource {
    Upper,
    Lower,
    Middle,
    Manual,
    Envelope,
    EnvelopeManual,
    Auto,
    Tractor,
    SmallFormat,
    LargeFormat,
    LargeCapacity,
    Cassette,
    FormSource,
    Other(i16),
}

impl PaperSource {
    pub const fn from_code(code: i16) -> Self {
        match code {
            1 => PaperSource::Upper,
            2 => PaperSource::Lower,
            3 => PaperSource::Middle,
            4 => PaperSource::Manual,
            5 => PaperSource::Envelope,
            6 => PaperSource::EnvelopeManual,
            7 => PaperSource::Auto,
            8 => PaperSource::Tractor,
            9 => PaperSource::SmallFormat,
            10 => PaperSource::LargeFormat,
            11 => PaperSource::LargeCapacity,
            14 => PaperSource::Cassette,
            15 => PaperSource::FormSource,
            other => PaperSource::Other(other),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            PaperSource::Upper => "Upper Tray",
            PaperSource::Lower => "Lower Tray",
            PaperSource::Middle => "Middle Tray",
            PaperSource::Manual => "Manual Feed",
            PaperSource::Envelope => "Envelope Feed",
            PaperSource::EnvelopeManual => "Envelope Manual Feed",
            PaperSource::Auto => "Auto Select",
            PaperSource::Tractor => "Tractor Feed",
            PaperSource::SmallFormat => "Small Format",
            PaperSource::LargeFormat => "Large Format",
            PaperSource::LargeCapacity => "Large Capacity",
            PaperSource::Cassette => "Cassette",
            PaperSource::FormSource => "Form Source",
            PaperSource::Other(_) => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collate {
    Uncollated,
    Collated,
}

impl Collate {
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Collate::Uncollated),
            1 => Some(Collate::Collated),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Collate::Uncollated => "Uncollated",
            Collate::Collated => "Collated",
        }
    }
}

/// Device-mode fields reported by the spooler. Fields the driver does not expose are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSettings {
    pub paper_size: Option<i16>,
    /// Tenths of a millimetre.
    pub paper_width: Option<i16>,
    /// Tenths of a millimetre.
    pub paper_length: Option<i16>,
    pub orientation: Option<Orientation>,
    pub copies: Option<i16>,
    pub default_source: Option<PaperSource>,
    pub print_quality: Option<PrintQuality>,
    pub duplex: Option<DuplexMode>,
    pub collate: Option<Collate>,
}

impl DeviceSettings {
    /// Human-readable `(field, value)` pairs for every populated field.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(size) = self.paper_size {
            let label = PaperId::from_code(size)
                .map(|id| format!("{size} ({id:?})"))
                .unwrap_or_else(|| size.to_string());
            out.push(("paperSize", label));
        }
        if let Some(width) = self.paper_width {
            out.push(("paperWidth", width.to_string()));
        }
        if let Some(length) = self.paper_length {
            out.push(("paperLength", length.to_string()));
        }
        if let Some(orientation) = self.orientation {
            out.push(("orientation", orientation.name().to_string()));
        }
        if let Some(copies) = self.copies {
            out.push(("copies", copies.to_string()));
        }
        if let Some(source) = self.default_source {
            out.push(("defaultSource", source.name().to_string()));
        }
        if let Some(quality) = self.print_quality {
            out.push(("printQuality", quality.to_string()));
        }
        if let Some(duplex) = self.duplex {
            out.push(("duplex", duplex.name().to_string()));
        }
        if let Some(collate) = self.collate {
            out.push(("collate", collate.name().to_string()));
        }
        out
    }
}

/// Margin values expressed in points (1/72").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margin {
    pub const fn zero() -> Self {
        Self::uniform(0.0)
    }

    pub const fn uniform(points: f32) -> Self {
        Self {
            top: points,
            bottom: points,
            left: points,
            right: points,
        }
    }
}

/// Supported paper identifiers for quick selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperId {
    A4,
    Letter,
    Legal,
    A3,
    Custom,
}

impl PaperId {
    /// Maps a device-mode paper code to a known identifier.
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(PaperId::Letter),
            5 => Some(PaperId::Legal),
            8 => Some(PaperId::A3),
            9 => Some(PaperId::A4),
            _ => None,
        }
    }

    pub const fn code(&self) -> Option<i16> {
        match self {
            PaperId::Letter => Some(1),
            PaperId::Legal => Some(5),
            PaperId::A3 => Some(8),
            PaperId::A4 => Some(9),
            PaperId::Custom => None,
        }
    }
}

/// Represents a paper size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub id: PaperId,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PaperSize {
    pub const fn new(id: PaperId, width_mm: f32, height_mm: f32) -> Self {
        Self {
            id,
            width_mm,
            height_mm,
        }
    }

    /// Standard dimensions for a known paper; `Custom` has none.
    pub const fn standard(id: PaperId) -> Option<Self> {
        match id {
            PaperId::A4 => Some(Self::new(id, 210.0, 297.0)),
            PaperId::Letter => Some(Self::new(id, 215.9, 279.4)),
            PaperId::Legal => Some(Self::new(id, 215.9, 355.6)),
            PaperId::A3 => Some(Self::new(id, 297.0, 420.0)),
            PaperId::Custom => None,
        }
    }

    pub fn to_points(&self, orientation: Orientation) -> (f32, f32) {
        const MM_PER_INCH: f32 = 25.4;
        let width_in = self.width_mm / MM_PER_INCH;
        let height_in = self.height_mm / MM_PER_INCH;
        let width_pt = width_in * 72.0;
        let height_pt = height_in * 72.0;
        match orientation {
            Orientation::Portrait => (width_pt, height_pt),
            Orientation::Landscape => (height_pt, width_pt),
        }
    }
}

/// Spooler datatype used for raw submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawDataType {
    Raw,
    Text,
}

impl RawDataType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RawDataType::Raw => "RAW",
            RawDataType::Text => "TEXT",
        }
    }
}

/// Options for a raw byte-stream job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJobOptions {
    pub job_id: PrintJobId,
    pub document_name: String,
    /// Forces a datatype; when `None` it is chosen from the printer attributes.
    pub data_type: Option<RawDataType>,
}

impl Default for RawJobOptions {
    fn default() -> Self {
        Self {
            job_id: PrintJobId::new(),
            document_name: "Raw Print Job".to_string(),
            data_type: None,
        }
    }
}

/// Options for a rendered rich-text document job.
#[derive(Debug, Clone)]
pub struct DocumentJobOptions {
    pub job_id: PrintJobId,
    pub document_name: String,
    pub layout: LayoutOptions,
}

impl DocumentJobOptions {
    pub fn new(document_name: impl Into<String>, layout: LayoutOptions) -> Self {
        Self {
            job_id: PrintJobId::new(),
            document_name: document_name.into(),
            layout,
        }
    }
}
