use std::path::Path;

use crate::job::{DeviceSettings, DocumentJobOptions, PrintQuality, RawDataType};
use crate::printer::{PaperSizeDetails, PrinterInfo};
use crate::surface::PageSurface;

/// Printer discovery and default-printer management.
/// 印表機探索與預設印表機管理。
pub trait PrinterCatalog {
    type Error;

    fn printers(&self) -> Result<Vec<String>, Self::Error>;
    fn properties(&self, printer: &str) -> Result<PrinterInfo, Self::Error>;
    fn default_printer(&self) -> Result<Option<String>, Self::Error>;
    fn set_default_printer(&self, printer: &str) -> Result<(), Self::Error>;
}

/// Device-mode query and mutation.
/// 裝置模式的查詢與修改。
pub trait DeviceModeStore {
    type Error;

    fn device_settings(&self, printer: &str) -> Result<DeviceSettings, Self::Error>;
    fn paper_size_details(&self, printer: &str) -> Result<PaperSizeDetails, Self::Error>;
    fn set_paper_size(&self, printer: &str, paper_code: i16) -> Result<(), Self::Error>;
    fn set_print_quality(&self, printer: &str, quality: PrintQuality) -> Result<(), Self::Error>;
}

/// Handle to an open raw job; consumed by `finish` or `abort`.
/// 原始資料列印作業的控制物件。
pub trait RawJobHandle {
    type Error;

    /// Writes bytes to the job, returning how many the spooler accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;
    fn finish(self) -> Result<(), Self::Error>;
    fn abort(self, reason: &str);
}

/// Raw byte-stream submission to the spooler.
/// 將原始位元組串流送入列印佇列。
pub trait RawSpooler {
    type Error;
    type JobHandle: RawJobHandle<Error = Self::Error>;

    fn begin_raw_job(
        &self,
        printer: &str,
        document_name: &str,
        data_type: RawDataType,
    ) -> Result<Self::JobHandle, Self::Error>;
}

/// An open rendered document. Pages are drawn through the [`PageSurface`] methods.
/// 已開啟的繪製文件，透過 [`PageSurface`] 繪製頁面。
pub trait DocumentHandle: PageSurface {
    fn finish(self) -> Result<(), Self::Error>;
    fn abort(self, reason: &str);
}

/// Opens rendered documents on a printer.
/// 在印表機上開啟可繪製的文件。
pub trait DocumentTarget {
    type Error;
    type Document: DocumentHandle<Error = Self::Error>;

    fn begin_document(
        &self,
        printer: &str,
        options: &DocumentJobOptions,
    ) -> Result<Self::Document, Self::Error>;
}

/// Hands a PDF file to whatever application is registered to print it.
/// 將 PDF 檔案交給系統註冊的應用程式列印。
pub trait PdfDelegate {
    type Error;

    fn print_file(&self, path: &Path, printer: &str, copies: u32) -> Result<(), Self::Error>;
}

/// System dialogs.
pub trait PrinterDialogs {
    type Error;

    fn open_properties(&self, printer: &str) -> Result<(), Self::Error>;
}

#[cfg(test)]
pub use mock::*;
