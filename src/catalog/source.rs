//! Catalog sources
//!
//! Every place entries and category names come from sits behind
//! `CatalogSource`. Static sources (bundled, file) return the whole
//! collection and leave filtering to the projection; the HTTP source lets the
//! catalog API filter by category and sort.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};

use super::store::parse_entries;
use crate::domain::{CatalogEntry, RawEntry, SortKey};
use crate::error::LoadError;

/// Catalog compiled into the binary
const BUNDLED_CATALOG: &str = include_str!("../../data/tools.json");

/// Default request timeout for the HTTP source
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Server-side parameters of an entries fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    /// Category to restrict to; `None` is "All"
    pub category: Option<String>,
    /// Ordering; `None` lets the source pick its default
    pub sort: Option<SortKey>,
}

impl FetchRequest {
    pub fn new(category: Option<String>, sort: Option<SortKey>) -> Self {
        Self { category, sort }
    }
}

/// Where catalog entries and category names come from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short name for logs and the status bar
    fn name(&self) -> &str;

    /// Fetch entries for `request`
    async fn fetch_entries(&self, request: &FetchRequest) -> Result<Vec<CatalogEntry>, LoadError>;

    /// Category names, without the "All" wildcard
    async fn list_categories(&self) -> Result<Vec<String>, LoadError>;

    /// Whether category and sort changes need a refetch
    fn filters_server_side(&self) -> bool {
        false
    }
}

fn distinct_categories(entries: &[CatalogEntry]) -> Vec<String> {
    let mut categories: Vec<String> = entries.iter().map(|e| e.category.clone()).collect();
    categories.sort();
    categories.dedup();
    categories
}

/// Catalog compiled into the binary
#[derive(Debug, Default, Clone)]
pub struct BundledSource;

impl BundledSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogSource for BundledSource {
    fn name(&self) -> &str {
        "bundled"
    }

    async fn fetch_entries(&self, _request: &FetchRequest) -> Result<Vec<CatalogEntry>, LoadError> {
        parse_entries(BUNDLED_CATALOG)
    }

    async fn list_categories(&self) -> Result<Vec<String>, LoadError> {
        Ok(distinct_categories(&parse_entries(BUNDLED_CATALOG)?))
    }
}

/// JSON array of catalog records on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<CatalogEntry>, LoadError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::Unreachable(format!("{}: {}", self.path.display(), e))
            } else {
                LoadError::Io(e)
            }
        })?;
        let entries = parse_entries(&content)?;
        debug!("Read {} entries from {}", entries.len(), self.path.display());
        Ok(entries)
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_entries(&self, _request: &FetchRequest) -> Result<Vec<CatalogEntry>, LoadError> {
        self.read().await
    }

    async fn list_categories(&self) -> Result<Vec<String>, LoadError> {
        Ok(distinct_categories(&self.read().await?))
    }
}

/// Catalog API client
///
/// `GET {base}/api/tools?sort_by=..&category=..` and
/// `GET {base}/api/tools/categories`. No auth, no pagination.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
}

impl HttpSource {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LoadError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| LoadError::Unreachable(format!("invalid base url '{}': {}", base_url, e)))?;
        // Url::join drops the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Unreachable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// URL of the entries endpoint for `request`
    pub fn tools_url(&self, request: &FetchRequest) -> Result<Url, LoadError> {
        let mut url = self
            .base_url
            .join("api/tools")
            .map_err(|e| LoadError::Unreachable(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("sort_by", request.sort.unwrap_or(SortKey::Score).as_str());
            if let Some(category) = &request.category {
                pairs.append_pair("category", category);
            }
        }
        Ok(url)
    }

    /// URL of the categories endpoint
    pub fn categories_url(&self) -> Result<Url, LoadError> {
        self.base_url
            .join("api/tools/categories")
            .map_err(|e| LoadError::Unreachable(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_entries(&self, request: &FetchRequest) -> Result<Vec<CatalogEntry>, LoadError> {
        let url = self.tools_url(request)?;
        debug!("GET {}", url);
        let raw: Vec<RawEntry> = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_entry(i))
            .collect::<Result<Vec<_>, _>>()?;
        info!("Fetched {} entries from catalog API", entries.len());
        Ok(entries)
    }

    async fn list_categories(&self) -> Result<Vec<String>, LoadError> {
        let url = self.categories_url()?;
        debug!("GET {}", url);
        let categories: Vec<String> = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(categories)
    }

    fn filters_server_side(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_bundled_source_loads() {
        let source = BundledSource::new();
        let entries = source.fetch_entries(&FetchRequest::default()).await.unwrap();
        assert!(!entries.is_empty());
        let categories = source.list_categories().await.unwrap();
        assert!(categories.contains(&"AI Chatbots".to_string()));
        assert!(!categories.iter().any(|c| c == "All"));
    }

    #[tokio::test]
    async fn test_file_source_reads_entries() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Alpha", "category": "B"}}, {{"name": "Beta", "category": "A"}}]"#
        )
        .unwrap();

        let source = FileSource::new(file.path());
        let entries = source.fetch_entries(&FetchRequest::default()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(source.list_categories().await.unwrap(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_file_source_missing_is_unreachable() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("missing.json"));
        let err = source.fetch_entries(&FetchRequest::default()).await.unwrap_err();
        assert!(matches!(err, LoadError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_file_source_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let source = FileSource::new(file.path());
        let err = source.fetch_entries(&FetchRequest::default()).await.unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn test_tools_url_with_category() {
        let source = HttpSource::new("http://127.0.0.1:8000", DEFAULT_TIMEOUT).unwrap();
        let request = FetchRequest::new(Some("AI Chatbots".to_string()), Some(SortKey::Stars));
        let url = source.tools_url(&request).unwrap();
        assert_eq!(url.path(), "/api/tools");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("sort_by".to_string(), "stars".to_string()),
                ("category".to_string(), "AI Chatbots".to_string()),
            ]
        );
    }

    #[test]
    fn test_tools_url_all_omits_category() {
        let source = HttpSource::new("http://127.0.0.1:8000/", DEFAULT_TIMEOUT).unwrap();
        let url = source.tools_url(&FetchRequest::default()).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/tools?sort_by=score");
    }

    #[test]
    fn test_base_url_with_prefix_path() {
        let source = HttpSource::new("http://example.com/catalog", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            source.categories_url().unwrap().as_str(),
            "http://example.com/catalog/api/tools/categories"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpSource::new("not a url", DEFAULT_TIMEOUT),
            Err(LoadError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn test_http_source_unreachable() {
        // Nothing listens on port 1
        let source = HttpSource::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = source.fetch_entries(&FetchRequest::default()).await.unwrap_err();
        assert!(matches!(err, LoadError::Unreachable(_)));
    }

    /// Serve canned responses keyed by request path; returns the base URL
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let path = target.split('?').next().unwrap_or("/");
                let (status, body) = routes
                    .iter()
                    .find(|(route, _, _)| *route == path)
                    .map(|(_, status, body)| (*status, *body))
                    .unwrap_or((404, "[]"));
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_http_source_fetches_entries_and_categories() {
        let base = serve(vec![
            (
                "/api/tools",
                200,
                r#"[{"id": 1, "name": "Alpha", "category": "AI Chatbots", "pricing": "free", "stars": 10, "score": 3.5},
                   {"id": 2, "name": "Beta", "category": "AI Coding Assistance"}]"#,
            ),
            ("/api/tools/categories", 200, r#"["AI Chatbots", "AI Coding Assistance"]"#),
        ])
        .await;
        let source = HttpSource::new(&base, DEFAULT_TIMEOUT).unwrap();

        let request = FetchRequest::new(Some("AI Chatbots".to_string()), Some(SortKey::Stars));
        let entries = source.fetch_entries(&request).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id.as_str(), "1");
        assert_eq!(entries[0].pricing, crate::domain::Pricing::Free);
        assert_eq!(entries[0].score, 3.5);
        assert_eq!(entries[1].name, "Beta");

        let categories = source.list_categories().await.unwrap();
        assert_eq!(categories, vec!["AI Chatbots", "AI Coding Assistance"]);
    }

    #[tokio::test]
    async fn test_http_source_maps_error_status() {
        let base = serve(vec![
            ("/api/tools", 503, r#"{"detail": "down"}"#),
            ("/api/tools/categories", 500, r#"{"detail": "boom"}"#),
        ])
        .await;
        let source = HttpSource::new(&base, DEFAULT_TIMEOUT).unwrap();

        let err = source.fetch_entries(&FetchRequest::default()).await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 503, .. }), "got {:?}", err);

        let err = source.list_categories().await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 500, .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_http_source_malformed_body() {
        let base = serve(vec![("/api/tools", 200, r#"{"not": "a list"}"#)]).await;
        let source = HttpSource::new(&base, DEFAULT_TIMEOUT).unwrap();
        let err = source.fetch_entries(&FetchRequest::default()).await.unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)), "got {:?}", err);
    }

    #[test]
    fn test_filters_server_side() {
        let http = HttpSource::new("http://127.0.0.1:8000", DEFAULT_TIMEOUT).unwrap();
        assert!(http.filters_server_side());
        assert!(!BundledSource::new().filters_server_side());
    }
}
