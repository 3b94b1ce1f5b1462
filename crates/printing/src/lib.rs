//! Printer bridge: inline markup line rendering, document layout, PDF export and the
//! job operations that drive platform printing collaborators.

pub mod codec;
pub mod controller;
pub mod display;
pub mod job;
pub mod layout;
pub mod markup;
pub mod pdf;
pub mod platform;
pub mod printer;
pub mod render;
pub mod surface;

pub use controller::{
    apply_device_settings, assign_default_printer, export_rich_text_pdf, open_printer_properties,
    paper_size_details, print_pdf, print_raw_data, print_rich_text_document, printer_inventory,
    resolve_printer, PdfExport, PrintJobError, PrintJobResult,
};
pub use display::{
    DisplayCommand, DisplayError, DisplayListSurface, GlyphRun, PageGeometry, Point,
    PrintDisplayList,
};
pub use job::{
    Collate, DeviceSettings, DocumentJobOptions, DuplexMode, Margin, Orientation, PaperId,
    PaperSize, PaperSource, PrintJobId, PrintQuality, RawDataType,
    RawJobOptions,
};
pub use layout::{layout_document, LayoutOptions, LayoutSummary, PrintableArea};
pub use markup::{split_runs, strip_markup, LineRuns, Marker, RunSegment, StyleState, VariantKind};
pub use pdf::{render_pdf_document, PdfError};
pub use platform::{
    DeviceModeStore, DocumentHandle, DocumentTarget, PdfDelegate, PrinterCatalog,
    PrinterDialogs, RawJobHandle, RawSpooler,
};
pub use printer::{PaperInfo, PaperSizeDetails, PrinterAttributes, PrinterInfo, PrinterStatus};
pub use render::{render_line, LineLayoutResult};
pub use surface::{
    enlarged_height, Extent, FontSource, FontSpec, FontVariants, PageSurface, Resolution, Surface,
};
