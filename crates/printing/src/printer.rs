//! Printer metadata reported by the spooler, with its numeric codes decoded.

const STATUS_LABELS: &[(u32, &str)] = &[
    (0x0000_0001, "Paused"),
    (0x0000_0002, "Error"),
    (0x0000_0004, "Pending Deletion"),
    (0x0000_0008, "Paper Jam"),
    (0x0000_0010, "Paper Out"),
    (0x0000_0020, "Manual Feed"),
    (0x0000_0040, "Paper Problem"),
    (0x0000_0080, "Offline"),
    (0x0000_0100, "I/O Active"),
    (0x0000_0200, "Busy"),
    (0x0000_0400, "Printing"),
    (0x0000_0800, "Output Bin Full"),
    (0x0000_1000, "Not Available"),
    (0x0000_2000, "Waiting"),
    (0x0000_4000, "Processing"),
    (0x0000_8000, "Initializing"),
    (0x0001_0000, "Warming Up"),
    (0x0002_0000, "Toner Low"),
    (0x0004_0000, "No Toner"),
    (0x0008_0000, "Page Punt"),
    (0x0010_0000, "User Intervention Required"),
    (0x0020_0000, "Out of Memory"),
    (0x0040_0000, "Door Open"),
    (0x0080_0000, "Server Unknown"),
    (0x0100_0000, "Power Save"),
];

const ATTRIBUTE_LABELS: &[(u32, &str)] = &[
    (0x0000_0001, "Queued"),
    (0x0000_0002, "Direct"),
    (0x0000_0004, "Default"),
    (0x0000_0008, "Shared"),
    (0x0000_0010, "Network"),
    (0x0000_0020, "Hidden"),
    (0x0000_0040, "Local"),
    (0x0000_0080, "Enable DevQ"),
    (0x0000_0100, "Keep Printed Jobs"),
    (0x0000_0200, "Do Complete First"),
    (0x0000_0400, "Work Offline"),
    (0x0000_0800, "Enable BiDi"),
    (0x0000_1000, "Raw Only"),
    (0x0000_2000, "Published"),
];

const RAW_ONLY: u32 = 0x0000_1000;

/// Status bit set of a printer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrinterStatus(pub u32);

impl PrinterStatus {
    pub fn is_ready(&self) -> bool {
        self.0 == 0
    }

    /// One label per set bit, in bit order; `["Ready"]` when no bit is set.
    pub fn messages(&self) -> Vec<&'static str> {
        if self.is_ready() {
            return vec!["Ready"];
        }
        labels(self.0, STATUS_LABELS)
    }
}

/// Attribute bit set of a printer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrinterAttributes(pub u32);

impl PrinterAttributes {
    pub fn names(&self) -> Vec<&'static str> {
        labels(self.0, ATTRIBUTE_LABELS)
    }

    /// Raw-only queues accept the `RAW` datatype exclusively (typical of receipt printers).
    pub fn is_raw_only(&self) -> bool {
        self.0 & RAW_ONLY != 0
    }
}

fn labels(bits: u32, table: &[(u32, &'static str)]) -> Vec<&'static str> {
    table
        .iter()
        .filter(|(mask, _)| bits & mask != 0)
        .map(|(_, label)| *label)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceResolution {
    pub x: i32,
    pub y: i32,
}

/// Properties of one printer queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrinterInfo {
    pub name: String,
    pub is_default: bool,
    pub server_name: Option<String>,
    pub share_name: Option<String>,
    pub port_name: Option<String>,
    pub driver_name: Option<String>,
    pub comment: Option<String>,
    pub location: Option<String>,
    pub separator_file: Option<String>,
    pub print_processor: Option<String>,
    pub datatype: Option<String>,
    pub status: PrinterStatus,
    pub attributes: PrinterAttributes,
    pub priority: u32,
    pub default_priority: u32,
    pub start_time: u32,
    pub until_time: u32,
    pub jobs: u32,
    pub average_ppm: u32,
    pub paper_names: Vec<String>,
    pub resolutions: Vec<DeviceResolution>,
}

/// One paper the driver offers. Dimensions are tenths of a millimetre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperInfo {
    pub id: i16,
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub is_selected: bool,
}

/// Current paper selection plus every paper the driver offers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperSizeDetails {
    pub current_paper_size: Option<i16>,
    pub current_paper_width: Option<i16>,
    pub current_paper_length: Option<i16>,
    pub current_paper_name: Option<String>,
    pub available: Vec<PaperInfo>,
}

impl PaperSizeDetails {
    /// Builds the details, marking the entry whose id equals `current_paper_size`.
    pub fn new(
        current_paper_size: Option<i16>,
        current_paper_width: Option<i16>,
        current_paper_length: Option<i16>,
        papers: Vec<(i16, String, i32, i32)>,
    ) -> Self {
        let mut current_paper_name = None;
        let available = papers
            .into_iter()
            .map(|(id, name, width, height)| {
                let is_selected = current_paper_size == Some(id);
                if is_selected {
                    current_paper_name = Some(name.clone());
                }
                PaperInfo {
                    id,
                    name,
                    width,
                    height,
                    is_selected,
                }
            })
            .collect();

        Self {
            current_paper_size,
            current_paper_width,
            current_paper_length,
            current_paper_name,
            available,
        }
    }

    pub fn selected(&self) -> Option<&PaperInfo> {
        self.available.iter().find(|paper| paper.is_selected)
    }
}
