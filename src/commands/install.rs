use anyhow::{Result, bail};
use log::{debug, warn};

use super::{config::Config, resources::check_mim_resources};
use crate::{
    index::add_mmcv_find_links,
    package::{COMPANION_PACKAGE, add_mminstall_extras},
    python::TorchEnvironment,
    runtime::Runtime,
};

/// Arguments of `mim install` after mim's own options are separated from
/// the ones forwarded to pip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstallRequest {
    pub args: Vec<String>,
    pub index_url: Option<String>,
    pub yes: bool,
}

impl InstallRequest {
    /// `-i/--index-url/--pypi-url` and `-y/--yes` are recognised anywhere in
    /// `raw_args`, not only before the first package.
    pub fn new(raw_args: Vec<String>, index_url: Option<String>, yes: bool) -> Result<Self> {
        let mut request = Self {
            args: Vec::with_capacity(raw_args.len()),
            index_url,
            yes,
        };

        let mut raw_args = raw_args.into_iter();
        while let Some(arg) = raw_args.next() {
            match arg.as_str() {
                "-y" | "--yes" => request.yes = true,
                "-i" | "--index-url" | "--pypi-url" => {
                    let Some(value) = raw_args.next() else {
                        bail!("Option '{}' requires a value", arg);
                    };
                    request.index_url = Some(value);
                }
                _ => {
                    if let Some(value) = inline_index_url(&arg) {
                        request.index_url = Some(value.to_string());
                    } else {
                        request.args.push(arg);
                    }
                }
            }
        }

        Ok(request)
    }
}

/// Value of `--index-url=URL`, `--pypi-url=URL` or `-iURL`.
fn inline_index_url(arg: &str) -> Option<&str> {
    arg.strip_prefix("--index-url=")
        .or_else(|| arg.strip_prefix("--pypi-url="))
        .or_else(|| arg.strip_prefix("-i").filter(|value| !value.is_empty()))
}

/// Arguments passed to `pip install`.
pub fn build_install_args<R: Runtime>(
    runtime: &R,
    args: &[String],
    torch: Option<&TorchEnvironment>,
    index_url: Option<&str>,
) -> Vec<String> {
    let mut install_args = add_mminstall_extras(args);

    if let Some(torch) = torch {
        install_args = add_mmcv_find_links(runtime, install_args, torch);
    }

    if let Some(index_url) = index_url {
        install_args.push("-i".to_string());
        install_args.push(index_url.to_string());
    }

    install_args
}

/// Install packages with pip, returning pip's exit code.
#[tracing::instrument(skip(config))]
pub fn install<R: Runtime>(config: &Config<R>, request: InstallRequest) -> Result<i32> {
    if request.yes {
        warn!("The `--yes` option has been deprecated, will have no effect.");
    }

    let report = match config.python.probe(&config.runtime, true) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(
                "Could not inspect {}, skipping {} find links: {:#}",
                config.python.path().display(),
                COMPANION_PACKAGE,
                e
            );
            None
        }
    };

    let torch = report.as_ref().and_then(|report| report.torch.as_ref());
    if report.is_some() && torch.is_none() {
        warn!(
            "PyTorch is not installed for {}, skipping {} find links",
            config.python.path().display(),
            COMPANION_PACKAGE
        );
    }

    let install_args = build_install_args(
        &config.runtime,
        &request.args,
        torch,
        request.index_url.as_deref(),
    );
    let exit_code = config.python.pip(&config.runtime, "install", &install_args)?;

    match &report {
        Some(report) => {
            check_mim_resources(&config.runtime, &report.site_paths);
        }
        None => debug!("No import paths known, skipping resource check"),
    }

    Ok(exit_code)
}
