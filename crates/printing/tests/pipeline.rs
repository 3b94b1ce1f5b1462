use std::sync::{Arc, Mutex};

use printbridge_printing::{
    export_rich_text_pdf, print_raw_data, print_rich_text_document, DocumentHandle,
    DocumentJobOptions, DocumentTarget, Extent, FontSource, FontSpec, LayoutOptions, Margin,
    Orientation, PageGeometry, PageSurface, PaperId, PaperSize,
    PrintJobError, PrinterAttributes, PrinterCatalog, PrinterInfo, RawDataType, RawJobHandle,
    RawJobOptions, RawSpooler, Resolution, Surface,
};

#[derive(Debug, Clone, PartialEq)]
struct Draw {
    x: i32,
    y: i32,
    text: String,
    font: FontSpec,
}

#[derive(Debug, Clone, Default)]
struct RecordedDocument {
    name: String,
    pages: Vec<Vec<Draw>>,
    finished: bool,
}

#[derive(Debug, Clone, Default)]
struct RecordedRaw {
    data_type: Option<RawDataType>,
    bytes: Vec<u8>,
    finished: bool,
}

#[derive(Clone, Default)]
struct RecordingAdapter {
    default_printer: Option<String>,
    raw_only: bool,
    write_limit: Option<usize>,
    documents: Arc<Mutex<Vec<RecordedDocument>>>,
    raw_jobs: Arc<Mutex<Vec<RecordedRaw>>>,
}

impl PrinterCatalog for RecordingAdapter {
    type Error = String;

    fn printers(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.default_printer.iter().cloned().collect())
    }

    fn properties(&self, printer: &str) -> Result<PrinterInfo, Self::Error> {
        let attributes = if self.raw_only { 0x0000_1000 } else { 0 };
        Ok(PrinterInfo {
            name: printer.to_string(),
            attributes: PrinterAttributes(attributes),
            ..PrinterInfo::default()
        })
    }

    fn default_printer(&self) -> Result<Option<String>, Self::Error> {
        Ok(self.default_printer.clone())
    }

    fn set_default_printer(&self, _printer: &str) -> Result<(), Self::Error> {
        Err("read-only catalog".into())
    }
}

struct RecordingRawJob {
    job: RecordedRaw,
    limit: Option<usize>,
    sink: Arc<Mutex<Vec<RecordedRaw>>>,
}

impl RawJobHandle for RecordingRawJob {
    type Error = String;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let accepted = self.limit.unwrap_or(data.len()).min(data.len());
        self.job.bytes.extend_from_slice(&data[..accepted]);
        Ok(accepted)
    }

    fn finish(mut self) -> Result<(), Self::Error> {
        self.job.finished = true;
        self.sink.lock().unwrap().push(self.job);
        Ok(())
    }

    fn abort(self, _reason: &str) {
        self.sink.lock().unwrap().push(self.job);
    }
}

impl RawSpooler for RecordingAdapter {
    type Error = String;
    type JobHandle = RecordingRawJob;

    fn begin_raw_job(
        &self,
        _printer: &str,
        _document_name: &str,
        data_type: RawDataType,
    ) -> Result<Self::JobHandle, Self::Error> {
        Ok(RecordingRawJob {
            job: RecordedRaw {
                data_type: Some(data_type),
                ..RecordedRaw::default()
            },
            limit: self.write_limit,
            sink: self.raw_jobs.clone(),
        })
    }
}

/// Surface whose glyphs are exactly one point-size wide.
struct RecordingDocument {
    record: RecordedDocument,
    font: Option<FontSpec>,
    sink: Arc<Mutex<Vec<RecordedDocument>>>,
}

impl Surface for RecordingDocument {
    type Font = FontSpec;

    fn select_font(&mut self, font: &Self::Font) {
        self.font = Some(font.clone());
    }

    fn measure_text(&mut self, text: &str) -> i32 {
        let size = self.font.as_ref().map_or(0.0, |font| font.size_pt);
        text.chars().count() as i32 * size.round() as i32
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        let font = self.font.clone().expect("font selected before drawing");
        if let Some(page) = self.record.pages.last_mut() {
            page.push(Draw {
                x,
                y,
                text: text.to_string(),
                font,
            });
        }
    }
}

impl FontSource for RecordingDocument {
    type Error = String;

    fn create_font(&mut self, spec: &FontSpec) -> Result<Self::Font, Self::Error> {
        Ok(spec.clone())
    }
}

impl PageSurface for RecordingDocument {
    fn resolution(&self) -> Resolution {
        Resolution::uniform(72)
    }

    fn page_extent(&self) -> Extent {
        Extent {
            width: 600,
            height: 800,
        }
    }

    fn start_page(&mut self) -> Result<(), Self::Error> {
        self.record.pages.push(Vec::new());
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl DocumentHandle for RecordingDocument {
    fn finish(mut self) -> Result<(), Self::Error> {
        self.record.finished = true;
        self.sink.lock().unwrap().push(self.record);
        Ok(())
    }

    fn abort(self, _reason: &str) {
        self.sink.lock().unwrap().push(self.record);
    }
}

impl DocumentTarget for RecordingAdapter {
    type Error = String;
    type Document = RecordingDocument;

    fn begin_document(
        &self,
        _printer: &str,
        options: &DocumentJobOptions,
    ) -> Result<Self::Document, Self::Error> {
        Ok(RecordingDocument {
            record: RecordedDocument {
                name: options.document_name.clone(),
                ..RecordedDocument::default()
            },
            font: None,
            sink: self.documents.clone(),
        })
    }
}

fn layout_options() -> LayoutOptions {
    LayoutOptions {
        font_family: "Courier New".into(),
        font_size_pt: 10.0,
        line_spacing: 1.2,
        margins: Margin::zero(),
    }
}

fn adapter() -> RecordingAdapter {
    RecordingAdapter {
        default_printer: Some("Kitchen".into()),
        ..RecordingAdapter::default()
    }
}

const MENU: &str = "##Menu##\n**Soup** 4.50\n*fresh* bread";

#[test]
fn rich_text_document_draws_styled_runs() {
    let adapter = adapter();
    let options = DocumentJobOptions::new("Menu", layout_options());
    let result = print_rich_text_document(&adapter, &adapter, None, MENU, &options)
        .expect("document printed");

    assert_eq!(result.printer, "Kitchen");
    assert_eq!(result.summary.total_pages, 1);
    assert_eq!(result.summary.enlarged_lines, 1);

    let documents = adapter.documents.lock().unwrap();
    assert_eq!(documents.len(), 1);
    assert!(documents[0].finished);
    assert_eq!(documents[0].name, "Menu");

    let draws: Vec<(i32, i32, &str)> = documents[0].pages[0]
        .iter()
        .map(|draw| (draw.x, draw.y, draw.text.as_str()))
        .collect();
    assert_eq!(
        draws,
        vec![
            (0, 0, "Menu"),
            (0, 18, "Soup"),
            (40, 18, " 4.50"),
            (0, 30, "fresh"),
            (50, 30, " bread"),
        ]
    );

    let fonts = &documents[0].pages[0];
    assert_eq!(fonts[0].font, FontSpec::new("Courier New", 15.0).bold());
    assert_eq!(fonts[1].font, FontSpec::new("Courier New", 10.0).bold());
    assert_eq!(fonts[2].font, FontSpec::new("Courier New", 10.0));
    assert_eq!(fonts[3].font, FontSpec::new("Courier New", 10.0).italic());
}

#[test]
fn missing_default_printer_fails_before_spooling() {
    let adapter = RecordingAdapter::default();
    let options = DocumentJobOptions::new("Menu", layout_options());
    let err = print_rich_text_document(&adapter, &adapter, None, MENU, &options).unwrap_err();
    assert!(matches!(err, PrintJobError::NoDefaultPrinter));
    assert!(adapter.documents.lock().unwrap().is_empty());
}

#[test]
fn raw_data_to_receipt_printer() {
    let adapter = RecordingAdapter {
        raw_only: true,
        ..adapter()
    };
    let written = print_raw_data(&adapter, &adapter, None, b"\x1b@Total 9.99\n", &RawJobOptions::default())
        .expect("raw job");
    assert_eq!(written, 13);

    let jobs = adapter.raw_jobs.lock().unwrap();
    assert_eq!(jobs[0].data_type, Some(RawDataType::Raw));
    assert_eq!(jobs[0].bytes, b"\x1b@Total 9.99\n");
    assert!(jobs[0].finished);
}

#[test]
fn partial_raw_write_is_reported() {
    let adapter = RecordingAdapter {
        write_limit: Some(4),
        ..adapter()
    };
    let err = print_raw_data(&adapter, &adapter, Some("Kitchen"), b"0123456789", &RawJobOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        PrintJobError::IncompleteWrite {
            written: 4,
            expected: 10
        }
    ));
    let jobs = adapter.raw_jobs.lock().unwrap();
    assert_eq!(jobs[0].data_type, Some(RawDataType::Text));
    assert!(!jobs[0].finished);
}

#[test]
fn exported_pdf_uses_variant_fonts() {
    let geometry = PageGeometry {
        paper: PaperSize::standard(PaperId::A4).expect("A4 is standard"),
        orientation: Orientation::Portrait,
        dpi: 72,
    };
    let export = export_rich_text_pdf(MENU, &layout_options(), geometry).expect("export");
    assert_eq!(export.summary.total_pages, 1);
    assert_eq!(export.summary.total_lines, 3);

    let pdf = String::from_utf8_lossy(&export.pdf_data);
    assert!(pdf.starts_with("%PDF-1.4"));
    assert!(pdf.contains("/BaseFont /Courier-Bold "));
    assert!(pdf.contains("/F2 15.000 Tf"));
    assert!(pdf.contains("/F3 10.000 Tf"));
    assert!(pdf.contains("(Menu) Tj"));
    assert!(pdf.contains("( bread) Tj"));
    assert!(pdf.trim_end().ends_with("%%EOF"));
}
