//! Data loader
//!
//! Fetches the fixed set of JSON resources in parallel from a directory or an
//! HTTP base URL. Required resources (characters, series) report failures to
//! the caller; optional ones fall back to empty defaults with a warning.
//! No retries: a failed resource stays failed until the next load.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{
    ArcDefinition, Character, KeyedList, LinkEntry, OfficialAccount, Series, SiteData,
    SynopsisEntry,
};
use crate::{Error, Result};

/// Where the data files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local directory containing the JSON files
    Directory(PathBuf),
    /// Base URL; file names are joined onto it
    Http(Url),
}

impl DataSource {
    /// Parse a config value: `http(s)://...` is a URL, anything else a path
    /// (relative paths resolve against `root`)
    pub fn parse(value: &str, root: &Path) -> Result<Self> {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            let with_slash = if value.ends_with('/') {
                value.to_string()
            } else {
                format!("{}/", value)
            };
            let url = Url::parse(&with_slash)
                .map_err(|e| Error::Config(format!("invalid data_source URL {}: {}", value, e)))?;
            Ok(DataSource::Http(url))
        } else {
            let path = PathBuf::from(value);
            if path.is_absolute() {
                Ok(DataSource::Directory(path))
            } else {
                Ok(DataSource::Directory(root.join(path)))
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Directory(path) => write!(f, "{}", path.display()),
            DataSource::Http(url) => write!(f, "{}", url),
        }
    }
}

/// The JSON resources a page view consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Characters,
    Series,
    Arcs,
    Links,
    Synopsis,
    OfficialLinks,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Characters,
        Resource::Series,
        Resource::Arcs,
        Resource::Links,
        Resource::Synopsis,
        Resource::OfficialLinks,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Resource::Characters => "characters.json",
            Resource::Series => "series.json",
            Resource::Arcs => "arcList.json",
            Resource::Links => "links.json",
            Resource::Synopsis => "synopsis.json",
            Resource::OfficialLinks => "officialLinks.json",
        }
    }

    /// Without these the listing, detail and pickup views cannot render
    pub fn is_required(&self) -> bool {
        matches!(self, Resource::Characters | Resource::Series)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Why a resource failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Non-success status (a missing file counts as 404)
    Status(u16),
    /// Body is not the expected JSON shape
    Parse(String),
    /// Network or filesystem failure
    Transport(String),
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadErrorKind::Status(code) => write!(f, "status {}", code),
            LoadErrorKind::Parse(msg) => write!(f, "parse error: {}", msg),
            LoadErrorKind::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

/// Load failure for one resource
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load {resource}: {kind}")]
pub struct LoadError {
    pub resource: Resource,
    pub kind: LoadErrorKind,
}

/// Result of one load pass
///
/// `data` always holds something usable: failed resources are empty.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub data: SiteData,
    pub failures: Vec<LoadError>,
}

impl LoadOutcome {
    /// Failure of a specific resource, if any
    pub fn failure(&self, resource: Resource) -> Option<&LoadError> {
        self.failures.iter().find(|f| f.resource == resource)
    }

    /// First failure among the required resources
    pub fn required_failure(&self) -> Option<&LoadError> {
        self.failures.iter().find(|f| f.resource.is_required())
    }

    /// The data, or the failure that makes it unusable for listing pages
    pub fn required(&self) -> std::result::Result<&SiteData, &LoadError> {
        match self.required_failure() {
            Some(failure) => Err(failure),
            None => Ok(&self.data),
        }
    }
}

/// Fetches and decodes the data files
#[derive(Debug, Clone)]
pub struct Loader {
    source: DataSource,
    client: reqwest::Client,
}

impl Loader {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Load every resource in parallel
    ///
    /// Returns once all fetches settled. Failures are logged here; optional
    /// resources are never surfaced as errors to the pages that only need them
    /// as enrichment.
    pub async fn load(&self) -> LoadOutcome {
        info!("Loading site data from {}", self.source);

        let (characters, series, arcs, links, synopsis, official_links) = tokio::join!(
            self.fetch_json::<Vec<Character>>(Resource::Characters),
            self.fetch_json::<KeyedList<Series>>(Resource::Series),
            self.fetch_json::<KeyedList<ArcDefinition>>(Resource::Arcs),
            self.fetch_json::<KeyedList<LinkEntry>>(Resource::Links),
            self.fetch_json::<KeyedList<SynopsisEntry>>(Resource::Synopsis),
            self.fetch_json::<KeyedList<Vec<OfficialAccount>>>(Resource::OfficialLinks),
        );

        let mut failures = Vec::new();
        let mut data = SiteData {
            characters: settle(characters, &mut failures),
            series: settle(series, &mut failures),
            arcs: settle(arcs, &mut failures),
            links: settle(links, &mut failures),
            synopsis: settle(synopsis, &mut failures),
            official_links: settle(official_links, &mut failures),
        };

        let dropped = data.dedup_characters();
        if !dropped.is_empty() {
            warn!("Ignoring duplicate character codes: {}", dropped.join(", "));
        }

        info!(
            "Loaded {} characters, {} series, {} arcs ({} resources failed)",
            data.characters.len(),
            data.series.len(),
            data.arcs.len(),
            failures.len()
        );

        LoadOutcome { data, failures }
    }

    /// Fetch and decode one resource
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        resource: Resource,
    ) -> std::result::Result<T, LoadError> {
        let bytes = self
            .fetch_bytes(resource.file_name())
            .await
            .map_err(|kind| LoadError { resource, kind })?;

        serde_json::from_slice(&bytes).map_err(|e| LoadError {
            resource,
            kind: LoadErrorKind::Parse(e.to_string()),
        })
    }

    async fn fetch_bytes(&self, file_name: &str) -> std::result::Result<Vec<u8>, LoadErrorKind> {
        match &self.source {
            DataSource::Directory(dir) => {
                let path = dir.join(file_name);
                debug!("Reading {}", path.display());
                tokio::fs::read(&path).await.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        LoadErrorKind::Status(StatusCode::NOT_FOUND.as_u16())
                    } else {
                        LoadErrorKind::Transport(e.to_string())
                    }
                })
            }
            DataSource::Http(base) => {
                let url = base
                    .join(file_name)
                    .map_err(|e| LoadErrorKind::Transport(e.to_string()))?;
                debug!("Fetching {}", url);
                let response = self
                    .client
                    .get(url)
                    .header(reqwest::header::CACHE_CONTROL, "no-cache")
                    .send()
                    .await
                    .map_err(|e| LoadErrorKind::Transport(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LoadErrorKind::Status(status.as_u16()));
                }

                response
                    .bytes()
                    .await
                    .map(|b| b.to_vec())
                    .map_err(|e| LoadErrorKind::Transport(e.to_string()))
            }
        }
    }
}

fn settle<T: Default>(
    result: std::result::Result<T, LoadError>,
    failures: &mut Vec<LoadError>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            if e.resource.is_required() {
                error!("{}", e);
            } else {
                warn!("{} (using empty default)", e);
            }
            failures.push(e);
            T::default()
        }
    }
}
