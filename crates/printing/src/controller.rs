use std::fmt::Display;
use std::io::{self, Write as _};

use log::{debug, warn};
use thiserror::Error;

use crate::display::{DisplayListSurface, PageGeometry};
use crate::job::{
    DeviceSettings, DocumentJobOptions, PrintQuality, RawDataType, RawJobOptions,
};
use crate::layout::{layout_document, LayoutOptions, LayoutSummary};
use crate::pdf::{render_pdf_document, PdfError};
use crate::platform::{
    DeviceModeStore, DocumentHandle, DocumentTarget, PdfDelegate, PrinterCatalog,
    PrinterDialogs, RawJobHandle, RawSpooler,
};
use crate::printer::{PaperSizeDetails, PrinterInfo};

/// Result produced after spooling a rich-text document.
/// 繪製文件送出列印後的結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJobResult {
    pub printer: String,
    pub summary: LayoutSummary,
}

/// A document rendered to PDF without touching a printer.
#[derive(Debug, Clone)]
pub struct PdfExport {
    pub pdf_data: Vec<u8>,
    pub summary: LayoutSummary,
}

/// Errors raised by the job operations.
/// 列印作業可能發生的錯誤。
#[derive(Debug, Error)]
pub enum PrintJobError {
    #[error("no printer name given and no default printer is configured")]
    NoDefaultPrinter,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("platform adapter failed: {0}")]
    Platform(String),
    #[error("printer accepted {written} of {expected} bytes")]
    IncompleteWrite { written: usize, expected: usize },
    #[error("layout failed: {0}")]
    Layout(String),
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] PdfError),
    #[error("temporary file error: {0}")]
    Io(#[from] io::Error),
}

fn platform<E: Display>(err: E) -> PrintJobError {
    PrintJobError::Platform(err.to_string())
}

/// Returns `requested` when it names a printer, otherwise the system default.
/// 未指定印表機時改用系統預設印表機。
pub fn resolve_printer<C>(catalog: &C, requested: Option<&str>) -> Result<String, PrintJobError>
where
    C: PrinterCatalog,
    C::Error: Display,
{
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => catalog
            .default_printer()
            .map_err(platform)?
            .filter(|name| !name.is_empty())
            .ok_or(PrintJobError::NoDefaultPrinter),
    }
}

/// Makes `printer` the system default.
/// 將指定印表機設為系統預設。
pub fn assign_default_printer<C>(catalog: &C, printer: &str) -> Result<(), PrintJobError>
where
    C: PrinterCatalog,
    C::Error: Display,
{
    let printer = printer.trim();
    if printer.is_empty() {
        return Err(PrintJobError::InvalidArgument("printer name is empty".into()));
    }
    catalog.set_default_printer(printer).map_err(platform)?;
    debug!("default printer is now '{printer}'");
    Ok(())
}

/// Every printer the catalog knows, with its properties. Printers whose properties
/// cannot be read are skipped.
pub fn printer_inventory<C>(catalog: &C) -> Result<Vec<PrinterInfo>, PrintJobError>
where
    C: PrinterCatalog,
    C::Error: Display,
{
    let names = catalog.printers().map_err(platform)?;
    let mut inventory = Vec::with_capacity(names.len());
    for name in names {
        match catalog.properties(&name) {
            Ok(info) => inventory.push(info),
            Err(err) => warn!("skipping printer '{name}': {err}"),
        }
    }
    Ok(inventory)
}

/// Sends `data` to the printer unmodified. Returns the number of bytes written.
/// 將原始位元組直接送至印表機。
///
/// The datatype comes from `options` when set; otherwise raw-only printers get `RAW`
/// and everything else `TEXT`. A job that accepts fewer bytes than supplied is
/// aborted and reported as [`PrintJobError::IncompleteWrite`].
pub fn print_raw_data<C, S>(
    catalog: &C,
    spooler: &S,
    printer: Option<&str>,
    data: &[u8],
    options: &RawJobOptions,
) -> Result<usize, PrintJobError>
where
    C: PrinterCatalog,
    C::Error: Display,
    S: RawSpooler,
    S::Error: Display,
{
    let printer = resolve_printer(catalog, printer)?;
    let data_type = match options.data_type {
        Some(data_type) => data_type,
        None => {
            let raw_only = catalog
                .properties(&printer)
                .map(|info| info.attributes.is_raw_only())
                .unwrap_or_else(|err| {
                    warn!("could not read attributes of '{printer}': {err}");
                    false
                });
            if raw_only {
                RawDataType::Raw
            } else {
                RawDataType::Text
            }
        }
    };

    debug!(
        "job {}: {} bytes to '{}' as {}",
        options.job_id,
        data.len(),
        printer,
        data_type.as_str()
    );
    let mut job = spooler
        .begin_raw_job(&printer, &options.document_name, data_type)
        .map_err(platform)?;
    let written = match job.write(data) {
        Ok(written) => written,
        Err(err) => {
            let message = err.to_string();
            job.abort(&message);
            return Err(PrintJobError::Platform(message));
        }
    };
    if written < data.len() {
        warn!(
            "job {}: short write to '{}' ({written} of {} bytes)",
            options.job_id,
            printer,
            data.len()
        );
        job.abort("short write");
        return Err(PrintJobError::IncompleteWrite {
            written,
            expected: data.len(),
        });
    }
    job.finish().map_err(platform)?;
    Ok(written)
}

/// Hands a PDF document to the delegate through a temporary `.pdf` file.
/// 透過暫存 PDF 檔案將文件交給外部程式列印。
///
/// The file is removed once the delegate returns, on success and failure alike.
pub fn print_pdf<C, D>(
    catalog: &C,
    delegate: &D,
    printer: Option<&str>,
    data: &[u8],
    copies: u32,
) -> Result<(), PrintJobError>
where
    C: PrinterCatalog,
    C::Error: Display,
    D: PdfDelegate,
    D::Error: Display,
{
    if data.is_empty() {
        return Err(PrintJobError::InvalidArgument("PDF data is empty".into()));
    }
    let printer = resolve_printer(catalog, printer)?;
    let copies = copies.max(1);

    let mut file = tempfile::Builder::new()
        .prefix("printbridge-")
        .suffix(".pdf")
        .tempfile()?;
    file.write_all(data)?;
    file.flush()?;

    debug!(
        "printing {} ({} bytes, {copies} copies) on '{printer}'",
        file.path().display(),
        data.len()
    );
    delegate
        .print_file(file.path(), &printer, copies)
        .map_err(platform)
}

/// Lays out `content` as markup lines directly on a printer document.
/// 將標記文字逐行排版並送至印表機。
///
/// The document is finished only when every page was laid out; any failure aborts it.
pub fn print_rich_text_document<C, T>(
    catalog: &C,
    target: &T,
    printer: Option<&str>,
    content: &str,
    options: &DocumentJobOptions,
) -> Result<PrintJobResult, PrintJobError>
where
    C: PrinterCatalog,
    C::Error: Display,
    T: DocumentTarget,
    T::Error: Display,
{
    let printer = resolve_printer(catalog, printer)?;
    let mut document = target
        .begin_document(&printer, options)
        .map_err(platform)?;

    let summary = match layout_document(&mut document, content, &options.layout) {
        Ok(summary) => summary,
        Err(err) => {
            let message = err.to_string();
            warn!("job {} aborted: {message}", options.job_id);
            document.abort(&message);
            return Err(PrintJobError::Platform(message));
        }
    };
    document.finish().map_err(platform)?;
    debug!(
        "job {}: '{}' spooled to '{}' ({} pages)",
        options.job_id, options.document_name, printer, summary.total_pages
    );

    Ok(PrintJobResult {
        printer,
        summary,
    })
}

/// Lays out `content` on a recording surface and writes the pages as PDF.
pub fn export_rich_text_pdf(
    content: &str,
    layout: &LayoutOptions,
    geometry: PageGeometry,
) -> Result<PdfExport, PrintJobError> {
    let mut surface = DisplayListSurface::new(geometry);
    let summary = layout_document(&mut surface, content, layout)
        .map_err(|err| PrintJobError::Layout(err.to_string()))?;
    let pdf_data = render_pdf_document(surface.pages(), &geometry)?;
    Ok(PdfExport { pdf_data, summary })
}

/// Applies the requested device-mode changes and returns the resulting settings.
/// `None` leaves the corresponding setting untouched.
pub fn apply_device_settings<M>(
    store: &M,
    printer: &str,
    paper_size: Option<i16>,
    quality: Option<PrintQuality>,
) -> Result<DeviceSettings, PrintJobError>
where
    M: DeviceModeStore,
    M::Error: Display,
{
    if printer.trim().is_empty() {
        return Err(PrintJobError::InvalidArgument("printer name is empty".into()));
    }
    if let Some(code) = paper_size {
        store.set_paper_size(printer, code).map_err(platform)?;
    }
    if let Some(quality) = quality {
        store.set_print_quality(printer, quality).map_err(platform)?;
    }
    store.device_settings(printer).map_err(platform)
}

/// Current paper selection of `printer` and every paper its driver offers.
pub fn paper_size_details<M>(store: &M, printer: &str) -> Result<PaperSizeDetails, PrintJobError>
where
    M: DeviceModeStore,
    M::Error: Display,
{
    if printer.trim().is_empty() {
        return Err(PrintJobError::InvalidArgument("printer name is empty".into()));
    }
    store.paper_size_details(printer).map_err(platform)
}

pub fn open_printer_properties<P>(dialogs: &P, printer: &str) -> Result<(), PrintJobError>
where
    P: PrinterDialogs,
    P::Error: Display,
{
    if printer.trim().is_empty() {
        return Err(PrintJobError::InvalidArgument("printer name is empty".into()));
    }
    dialogs.open_properties(printer).map_err(platform)
}
