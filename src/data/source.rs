//! Where the raw reference documents come from: the published URLs, or local
//! files for offline use and fixtures.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::data::config::SourceConfig;
use crate::data::table::RawTable;
use crate::error::AppError;

/// The three external feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    PriceLevel,
    Wage,
    Canasta,
}

impl SourceId {
    pub const ALL: [SourceId; 3] = [SourceId::PriceLevel, SourceId::Wage, SourceId::Canasta];

    pub fn display_name(self) -> &'static str {
        match self {
            SourceId::PriceLevel => "basic food basket (price level)",
            SourceId::Wage => "domestic-worker wage scale",
            SourceId::Canasta => "childcare cost series",
        }
    }

    /// Format the published document uses.
    pub fn default_format(self) -> PayloadFormat {
        match self {
            SourceId::PriceLevel | SourceId::Canasta => PayloadFormat::Spreadsheet,
            SourceId::Wage => PayloadFormat::Html,
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Spreadsheet,
    Csv,
    Html,
}

impl PayloadFormat {
    /// Guess from a file extension; unknown extensions yield `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(PayloadFormat::Spreadsheet),
            "csv" => Some(PayloadFormat::Csv),
            "html" | "htm" | "txt" => Some(PayloadFormat::Html),
            _ => None,
        }
    }
}

/// Raw document bytes plus how to read them.
#[derive(Debug, Clone)]
pub struct Payload {
    pub format: PayloadFormat,
    pub bytes: Vec<u8>,
    /// URL or path, for messages.
    pub origin: String,
}

impl Payload {
    pub fn table(&self) -> Result<RawTable, AppError> {
        match self.format {
            PayloadFormat::Spreadsheet => RawTable::from_spreadsheet(&self.bytes),
            PayloadFormat::Csv => RawTable::from_csv(&self.bytes),
            PayloadFormat::Html => Err(AppError::fetch(format!(
                "{} is an HTML page, expected a spreadsheet or CSV.",
                self.origin
            ))),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Something that can produce the raw document for a feed.
pub trait DataSource {
    fn fetch(&self, id: SourceId) -> Result<Payload, AppError>;
}

/// Downloads the published documents. One attempt per fetch, no retry.
pub struct HttpSource {
    client: Client,
    urls: HashMap<SourceId, String>,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("crianza/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::fetch(format!("Failed to build HTTP client: {e}")))?;

        let urls = HashMap::from([
            (SourceId::PriceLevel, config.cba_url.clone()),
            (SourceId::Wage, config.wage_url.clone()),
            (SourceId::Canasta, config.canasta_url.clone()),
        ]);

        Ok(Self { client, urls })
    }

    pub fn url(&self, id: SourceId) -> Option<&str> {
        self.urls.get(&id).map(String::as_str)
    }
}

impl DataSource for HttpSource {
    fn fetch(&self, id: SourceId) -> Result<Payload, AppError> {
        let url = self
            .url(id)
            .ok_or_else(|| AppError::fetch(format!("No URL configured for the {id}.")))?;

        info!(source = %id, url, "downloading");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::fetch(format!("Request for the {id} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "Request for the {id} failed with status {}.",
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| AppError::fetch(format!("Failed to read the {id} response: {e}")))?;
        debug!(source = %id, bytes = bytes.len(), "downloaded");

        Ok(Payload {
            format: id.default_format(),
            bytes: bytes.to_vec(),
            origin: url.to_string(),
        })
    }
}

/// Reads documents from local paths, one per feed.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    paths: HashMap<SourceId, PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, id: SourceId, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(id, path.into());
        self
    }

    pub fn has(&self, id: SourceId) -> bool {
        self.paths.contains_key(&id)
    }

    pub fn path(&self, id: SourceId) -> Option<&Path> {
        self.paths.get(&id).map(PathBuf::as_path)
    }
}

impl DataSource for FileSource {
    fn fetch(&self, id: SourceId) -> Result<Payload, AppError> {
        let path = self
            .path(id)
            .ok_or_else(|| AppError::fetch(format!("No local file configured for the {id}.")))?;

        debug!(source = %id, path = %path.display(), "reading local file");
        let bytes = std::fs::read(path)
            .map_err(|e| AppError::fetch(format!("Failed to read {}: {e}", path.display())))?;

        Ok(Payload {
            format: PayloadFormat::from_path(path).unwrap_or_else(|| id.default_format()),
            bytes,
            origin: path.display().to_string(),
        })
    }
}

/// Local file where one is configured, HTTP otherwise.
pub struct LayeredSource {
    files: FileSource,
    http: HttpSource,
}

impl LayeredSource {
    pub fn new(files: FileSource, http: HttpSource) -> Self {
        Self { files, http }
    }
}

impl DataSource for LayeredSource {
    fn fetch(&self, id: SourceId) -> Result<Payload, AppError> {
        if self.files.has(id) {
            self.files.fetch(id)
        } else {
            self.http.fetch(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn format_from_extension() {
        assert_eq!(PayloadFormat::from_path(Path::new("serie.XLS")), Some(PayloadFormat::Spreadsheet));
        assert_eq!(PayloadFormat::from_path(Path::new("a/b/canasta.csv")), Some(PayloadFormat::Csv));
        assert_eq!(PayloadFormat::from_path(Path::new("escala.htm")), Some(PayloadFormat::Html));
        assert_eq!(PayloadFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn file_source_reads_configured_path() {
        let path = std::env::temp_dir().join(format!("crianza-source-{}.csv", std::process::id()));
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let source = FileSource::new().with_path(SourceId::Canasta, &path);
        let payload = source.fetch(SourceId::Canasta).unwrap();
        assert_eq!(payload.format, PayloadFormat::Csv);
        assert_eq!(payload.table().unwrap().cell(1, 1).as_number(), Some(2.0));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unconfigured_or_missing_files_are_fetch_errors() {
        let source = FileSource::new().with_path(SourceId::Wage, "/definitely/not/here.html");
        assert_eq!(source.fetch(SourceId::Wage).unwrap_err().kind(), ErrorKind::Fetch);
        assert_eq!(source.fetch(SourceId::PriceLevel).unwrap_err().kind(), ErrorKind::Fetch);
    }

    #[test]
    fn html_payload_is_not_a_table() {
        let payload = Payload {
            format: PayloadFormat::Html,
            bytes: b"<p>hi</p>".to_vec(),
            origin: "page".to_string(),
        };
        assert!(payload.table().is_err());
        assert_eq!(payload.text(), "<p>hi</p>");
    }

    #[test]
    fn http_source_maps_urls() {
        let source = HttpSource::new(&SourceConfig::default()).unwrap();
        assert_eq!(source.url(SourceId::Wage), Some(crate::data::config::DEFAULT_WAGE_URL));
    }
}
