use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use super::config::Config;
use crate::{
    package::{normalize_name, project_of},
    python::find_distributions,
    runtime::Runtime,
};

/// Information about an installed package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    /// Git URL or home page, when the metadata names one
    pub source: Option<String>,
}

/// Installed packages sorted by name. Only project packages unless `all`.
pub fn list_packages<R: Runtime>(runtime: &R, site_paths: &[PathBuf], all: bool) -> Vec<PackageInfo> {
    let mut packages: Vec<_> = find_distributions(runtime, site_paths)
        .into_iter()
        .filter(|dist| all || project_of(&dist.normalized_name()).is_some())
        .map(|dist| PackageInfo {
            source: dist.source_url(),
            name: dist.name,
            version: dist.version,
        })
        .collect();
    packages.sort_by_key(|pkg| normalize_name(&pkg.name));
    packages
}

fn render(packages: &[PackageInfo]) -> String {
    let header = ("Package", "Version", "Source");
    let name_width = packages
        .iter()
        .map(|p| p.name.len())
        .chain([header.0.len()])
        .max()
        .unwrap_or_default();
    let version_width = packages
        .iter()
        .map(|p| p.version.len())
        .chain([header.1.len()])
        .max()
        .unwrap_or_default();

    let mut lines = vec![format!(
        "{:name_width$}  {:version_width$}  {}",
        header.0, header.1, header.2
    )];
    lines.push(format!(
        "{}  {}  {}",
        "-".repeat(name_width),
        "-".repeat(version_width),
        "-".repeat(header.2.len())
    ));
    for pkg in packages {
        let line = format!(
            "{:name_width$}  {:version_width$}  {}",
            pkg.name,
            pkg.version,
            pkg.source.as_deref().unwrap_or_default()
        );
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// List installed packages
#[tracing::instrument(skip(config))]
pub fn list<R: Runtime>(config: &Config<R>, all: bool) -> Result<()> {
    let report = config.python.probe(&config.runtime, false)?;
    debug!("Listing packages from {:?}", report.site_paths);

    let packages = list_packages(&config.runtime, &report.site_paths, all);
    if packages.is_empty() {
        println!("No packages installed.");
        return Ok(());
    }

    debug!("Found {} package(s)", packages.len());
    println!("{}", render(&packages));
    Ok(())
}
