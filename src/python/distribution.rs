//! Installed distributions discovered from `*.dist-info` and `*.egg-info`
//! entries on the interpreter's import paths.

use anyhow::{Context, Result, bail};
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::{package::normalize_name, runtime::Runtime};

/// Core metadata fields read from `METADATA` / `PKG-INFO`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub home_page: Option<String>,
    /// `Project-URL` entries as `(label, url)`.
    pub project_urls: Vec<(String, String)>,
}

impl Metadata {
    /// Parse the header block of a core metadata file. The body (the
    /// long description after the first blank line) is ignored.
    pub fn parse(text: &str) -> Self {
        let mut metadata = Metadata::default();

        for line in text.lines() {
            if line.trim().is_empty() {
                break;
            }
            // Continuation lines belong to multi-line fields we don't read
            if line.starts_with([' ', '\t']) {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() || value == "UNKNOWN" {
                continue;
            }

            match key.trim().to_ascii_lowercase().as_str() {
                "name" => metadata.name = Some(value.to_string()),
                "version" => metadata.version = Some(value.to_string()),
                "home-page" => metadata.home_page = Some(value.to_string()),
                "project-url" => {
                    let (label, url) = value.split_once(',').unwrap_or(("", value));
                    metadata
                        .project_urls
                        .push((label.trim().to_string(), url.trim().to_string()));
                }
                _ => {}
            }
        }

        metadata
    }
}

/// One installed distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// The `*.dist-info` / `*.egg-info` entry.
    pub metadata_path: PathBuf,
    pub name: String,
    pub version: String,
    pub home_page: Option<String>,
    pub project_urls: Vec<(String, String)>,
}

impl Distribution {
    pub fn load<R: Runtime>(runtime: &R, metadata_path: &Path) -> Result<Self> {
        let metadata_file = if runtime.is_dir(metadata_path) {
            let file = if is_dist_info(metadata_path) {
                "METADATA"
            } else {
                "PKG-INFO"
            };
            metadata_path.join(file)
        } else {
            // Legacy single-file `*.egg-info`
            metadata_path.to_path_buf()
        };

        let text = runtime.read_to_string(&metadata_file)?;
        let metadata = Metadata::parse(&text);

        let Some(name) = metadata.name else {
            bail!("no Name field in {}", metadata_file.display());
        };

        Ok(Self {
            metadata_path: metadata_path.to_path_buf(),
            name,
            version: metadata.version.unwrap_or_default(),
            home_page: metadata.home_page,
            project_urls: metadata.project_urls,
        })
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Directory the distribution's files are laid out relative to.
    pub fn root(&self) -> Option<&Path> {
        self.metadata_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }

    /// Read a file stored next to the metadata, e.g. `top_level.txt`.
    pub fn read_text<R: Runtime>(&self, runtime: &R, file: &str) -> Result<String> {
        if !runtime.is_dir(&self.metadata_path) {
            bail!("{} has no metadata directory", self.name);
        }
        runtime
            .read_to_string(&self.metadata_path.join(file))
            .with_context(|| format!("{} of {}", file, self.name))
    }

    /// Where the package's source lives: its git URL for GitHub projects,
    /// otherwise its home page.
    pub fn source_url(&self) -> Option<String> {
        let home_page = self.home_page.clone().or_else(|| {
            self.project_urls
                .iter()
                .find(|(label, url)| {
                    url.contains("github.com")
                        || ["homepage", "repository", "source"]
                            .contains(&label.to_ascii_lowercase().as_str())
                })
                .map(|(_, url)| url.clone())
        })?;

        if home_page.contains("github.com") && !home_page.ends_with(".git") {
            Some(format!("{}.git", home_page.trim_end_matches('/')))
        } else {
            Some(home_page)
        }
    }
}

fn is_dist_info(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "dist-info")
}

fn is_metadata_entry(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "dist-info" || ext == "egg-info")
}

/// All distributions on `site_paths`, first occurrence of each name wins.
///
/// Unreadable paths and broken metadata are skipped.
#[tracing::instrument(skip(runtime))]
pub fn find_distributions<R: Runtime>(runtime: &R, site_paths: &[PathBuf]) -> Vec<Distribution> {
    let mut seen = HashSet::new();
    let mut distributions = Vec::new();

    for site_path in site_paths {
        if !runtime.is_dir(site_path) {
            continue;
        }
        let mut entries = match runtime.read_dir(site_path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping {:?}: {:#}", site_path, e);
                continue;
            }
        };
        entries.sort();

        for entry in entries.iter().filter(|p| is_metadata_entry(p)) {
            match Distribution::load(runtime, entry) {
                Ok(dist) => {
                    if seen.insert(dist.normalized_name()) {
                        distributions.push(dist);
                    }
                }
                Err(e) => debug!("Skipping distribution at {:?}: {:#}", entry, e),
            }
        }
    }

    debug!("Found {} distribution(s)", distributions.len());
    distributions
}
