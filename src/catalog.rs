// Loading the listings catalog (once, at startup) and read-only queries on it

use reqwest::Client;
use serde_json::Value;
use std::path::PathBuf;

use crate::{error::CatalogError, models::Listing};

const FEATURED_PREVIEW_SIZE: usize = 3;

/// Where the catalog JSON lives: a URL or a file on disk.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Http { client: Client, url: String },
    File(PathBuf),
}

impl CatalogSource {
    /// `http://` and `https://` locations are fetched, anything else is a path.
    pub fn from_location(location: &str, client: Client) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            CatalogSource::Http { client, url: location.to_string() }
        } else {
            CatalogSource::File(PathBuf::from(location))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Http { url, .. } => url.clone(),
            CatalogSource::File(path) => path.display().to_string(),
        }
    }

    /// Fetches and parses every listing. One attempt, no retries.
    pub async fn fetch_all(&self) -> Result<Vec<Listing>, CatalogError> {
        let bytes = match self {
            CatalogSource::Http { client, url } => {
                tracing::debug!(url = %url, "Fetching catalog over HTTP");
                client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .bytes()
                    .await?
                    .to_vec()
            }
            CatalogSource::File(path) => {
                tracing::debug!(path = %path.display(), "Reading catalog file");
                tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
                    path: path.clone(),
                    source,
                })?
            }
        };
        parse_catalog(&bytes)
    }
}

/// Parses `{ "listings": [...] }`. A missing or non-array `listings` is an empty catalog.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Listing>, CatalogError> {
    let document: Value = serde_json::from_slice(bytes)?;
    let items = match document {
        Value::Object(mut map) => match map.remove("listings") {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    let listings = items
        .into_iter()
        .map(serde_json::from_value::<Listing>)
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(position) = listings
        .iter()
        .position(|l| !l.price.is_finite() || l.price < 0.0)
    {
        return Err(CatalogError::InvalidPrice { position });
    }
    Ok(listings)
}

/// Distinct values offered in the filter dropdowns, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub kinds: Vec<String>,
    pub areas: Vec<String>,
}

fn push_distinct(values: &mut Vec<String>, candidate: Option<&str>) {
    if let Some(candidate) = candidate.filter(|c| !c.is_empty()) {
        if !values.iter().any(|v| v == candidate) {
            values.push(candidate.to_string());
        }
    }
}

/// The loaded catalog. Immutable after startup and shared by every request.
#[derive(Debug, Clone)]
pub struct Catalog {
    listings: Vec<Listing>,
    available: bool,
}

impl Catalog {
    pub fn new(listings: Vec<Listing>) -> Self {
        Catalog { listings, available: true }
    }

    /// Empty catalog standing in for one that failed to load.
    pub fn unavailable() -> Self {
        Catalog { listings: Vec::new(), available: false }
    }

    /// Loads the catalog, degrading any failure to an empty, unavailable catalog.
    pub async fn load(source: &CatalogSource) -> Self {
        match source.fetch_all().await {
            Ok(listings) => {
                tracing::info!(
                    source = %source.describe(),
                    count = listings.len(),
                    "Catalog loaded"
                );
                Catalog::new(listings)
            }
            Err(e) => {
                tracing::warn!(
                    source = %source.describe(),
                    error = %e,
                    "Catalog unavailable, serving an empty listing set"
                );
                Catalog::unavailable()
            }
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn get(&self, position: usize) -> Option<&Listing> {
        self.listings.get(position)
    }

    /// Home page preview: the first featured listings, or the first listings
    /// when nothing is featured.
    pub fn featured_preview(&self) -> Vec<(usize, &Listing)> {
        let featured: Vec<(usize, &Listing)> = self
            .listings
            .iter()
            .enumerate()
            .filter(|(_, l)| l.featured.is_on())
            .take(FEATURED_PREVIEW_SIZE)
            .collect();
        if !featured.is_empty() {
            return featured;
        }
        self.listings
            .iter()
            .enumerate()
            .take(FEATURED_PREVIEW_SIZE)
            .collect()
    }

    pub fn filter_options(&self) -> FilterOptions {
        let mut options = FilterOptions::default();
        for listing in &self.listings {
            push_distinct(&mut options.statuses, listing.status.as_deref());
            push_distinct(&mut options.kinds, listing.kind.as_deref());
            push_distinct(&mut options.areas, listing.area.as_deref());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use std::io::Write;
    use tokio::net::TcpListener;

    const SAMPLE: &str = r#"{
        "listings": [
            { "title": "A", "status": "للبيع", "type": "شقة", "area": "جونية", "price": 100 },
            { "title": "B", "status": "للإيجار", "type": "شقة", "area": "جبيل", "price": 200, "featured": true },
            { "title": "C", "status": "للبيع", "type": "أرض", "area": "جونية", "price": 300 },
            { "title": "D", "status": "للبيع", "type": "فيلا", "area": "", "price": 400, "featured": 1 }
        ]
    }"#;

    fn titles(found: &[(usize, &Listing)]) -> Vec<String> {
        found.iter().map(|(_, l)| l.title().to_string()).collect()
    }

    #[test]
    fn missing_or_non_array_listings_is_empty() {
        assert!(parse_catalog(br#"{}"#).unwrap().is_empty());
        assert!(parse_catalog(br#"{ "listings": null }"#).unwrap().is_empty());
        assert!(parse_catalog(br#"{ "listings": { "a": 1 } }"#).unwrap().is_empty());
        assert!(parse_catalog(br#"[1, 2]"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(matches!(parse_catalog(b"not json"), Err(CatalogError::Parse(_))));
        assert!(matches!(
            parse_catalog(br#"{ "listings": [ { "title": "no price" } ] }"#),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            parse_catalog(br#"{ "listings": [ { "price": 1 }, { "price": -5 } ] }"#),
            Err(CatalogError::InvalidPrice { position: 1 })
        ));
    }

    #[test]
    fn one_bad_field_does_not_cost_the_catalog() {
        let listings = parse_catalog(
            br#"{ "listings": [
                { "title": "Good", "price": 100, "images": ["a.jpg"] },
                { "title": 12, "price": 200, "images": "x.jpg", "features": ["a", 3], "floor": [1] }
            ] }"#,
        )
        .unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].title(), "Good");
        assert_eq!(listings[1].title(), "12");
        assert!(listings[1].images.is_none());
        assert_eq!(listings[1].features, Some(vec!["a".to_string()]));
        assert!(listings[1].floor.is_none());
    }

    #[test]
    fn featured_preview_prefers_featured_listings() {
        let catalog = Catalog::new(parse_catalog(SAMPLE.as_bytes()).unwrap());
        assert_eq!(titles(&catalog.featured_preview()), vec!["B", "D"]);
    }

    #[test]
    fn featured_preview_falls_back_to_first_three() {
        let listings = parse_catalog(
            br#"{ "listings": [
                { "title": "1", "price": 1 }, { "title": "2", "price": 2 },
                { "title": "3", "price": 3 }, { "title": "4", "price": 4 }
            ] }"#,
        )
        .unwrap();
        let catalog = Catalog::new(listings);
        assert_eq!(titles(&catalog.featured_preview()), vec!["1", "2", "3"]);
    }

    #[test]
    fn filter_options_are_distinct_in_catalog_order() {
        let catalog = Catalog::new(parse_catalog(SAMPLE.as_bytes()).unwrap());
        let options = catalog.filter_options();
        assert_eq!(options.statuses, vec!["للبيع", "للإيجار"]);
        assert_eq!(options.kinds, vec!["شقة", "أرض", "فيلا"]);
        assert_eq!(options.areas, vec!["جونية", "جبيل"]);
    }

    #[test]
    fn location_picks_the_source_kind() {
        let client = Client::new();
        assert!(matches!(
            CatalogSource::from_location("https://example.com/listings.json", client.clone()),
            CatalogSource::Http { .. }
        ));
        assert!(matches!(
            CatalogSource::from_location("data/listings.json", client),
            CatalogSource::File(_)
        ));
    }

    #[tokio::test]
    async fn loads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = Catalog::load(&CatalogSource::File(file.path().to_path_buf())).await;
        assert!(catalog.is_available());
        assert_eq!(catalog.listings().len(), 4);
        assert_eq!(catalog.get(2).map(Listing::title), Some("C"));
    }

    #[tokio::test]
    async fn missing_file_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = CatalogSource::File(dir.path().join("nope.json"));

        assert!(matches!(source.fetch_all().await, Err(CatalogError::Io { .. })));
        let catalog = Catalog::load(&source).await;
        assert!(!catalog.is_available());
        assert!(catalog.listings().is_empty());
    }

    #[tokio::test]
    async fn loads_over_http_and_degrades_on_error_status() {
        let app = Router::new()
            .route("/data/listings.json", get(|| async { SAMPLE }))
            .route(
                "/broken.json",
                get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::new();
        let ok = CatalogSource::from_location(&format!("http://{}/data/listings.json", addr), client.clone());
        let catalog = Catalog::load(&ok).await;
        assert!(catalog.is_available());
        assert_eq!(catalog.listings().len(), 4);

        let broken = CatalogSource::from_location(&format!("http://{}/broken.json", addr), client);
        assert!(matches!(broken.fetch_all().await, Err(CatalogError::Http(_))));
        assert!(!Catalog::load(&broken).await.is_available());
    }
}
