use log::{debug, warn};
use std::path::PathBuf;

use crate::{
    package::is_project_package,
    python::{Distribution, find_distributions},
    runtime::Runtime,
};

/// Resource directory every project package ships inside its module.
pub const MIM_RESOURCE_DIR: &str = ".mim";

type LocateFn<R> = fn(&R, &Distribution) -> Option<PathBuf>;

/// First line of `top_level.txt`, relative to the distribution root.
fn from_top_level<R: Runtime>(runtime: &R, dist: &Distribution) -> Option<PathBuf> {
    let top_level = dist.read_text(runtime, "top_level.txt").ok()?;
    let module = top_level.lines().next()?.trim();
    if module.is_empty() {
        return None;
    }
    let path = dist.root()?.join(module);
    runtime.exists(&path).then_some(path)
}

/// The distribution name used as a module name.
fn from_module_name<R: Runtime>(runtime: &R, dist: &Distribution) -> Option<PathBuf> {
    let path = dist.root()?.join(dist.name.replace('-', "_"));
    runtime.exists(&path).then_some(path)
}

fn from_root<R: Runtime>(_runtime: &R, dist: &Distribution) -> Option<PathBuf> {
    dist.root().map(|root| root.to_path_buf())
}

/// Directory the distribution's module is installed in.
pub fn locate_install_dir<R: Runtime>(runtime: &R, dist: &Distribution) -> Option<PathBuf> {
    let strategies: [LocateFn<R>; 3] = [from_top_level, from_module_name, from_root];
    strategies.iter().find_map(|locate| locate(runtime, dist))
}

/// Warn about installed project packages lacking their resource directory.
///
/// Returns the missing resource paths. Never fails: anything that cannot be
/// inspected is skipped.
#[tracing::instrument(skip(runtime))]
pub fn check_mim_resources<R: Runtime>(runtime: &R, site_paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut missing = Vec::new();

    for dist in find_distributions(runtime, site_paths) {
        if !is_project_package(&dist.normalized_name()) {
            continue;
        }

        let Some(install_dir) = locate_install_dir(runtime, &dist) else {
            warn!("Cannot locate files for {}, skipping", dist.name);
            continue;
        };

        let resources = install_dir.join(MIM_RESOURCE_DIR);
        if runtime.exists(&resources) {
            debug!("Found mim resources for {} at {:?}", dist.name, resources);
        } else {
            warn!(
                "mim resources not found: {}, you can try to install the latest {}.",
                resources.display(),
                dist.name
            );
            missing.push(resources);
        }
    }

    missing
}
