//! Inspect the target interpreter: torch build, accelerator and import paths.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Printed as a single JSON line on stdout. Torch is only imported when
/// `--torch` is passed, since importing it can take seconds.
const PROBE_SCRIPT: &str = r#"import json, sys
report = {
    "python": "%d.%d.%d" % tuple(sys.version_info[:3]),
    "site_paths": [p for p in sys.path if p],
    "torch": None,
}
if "--torch" in sys.argv[1:]:
    try:
        import torch
    except Exception:
        torch = None
    if torch is not None:
        device, device_version = "cpu", None
        try:
            import torch_npu
            if torch.npu.is_available():
                device, device_version = "ascend", torch_npu.__version__.split("+")[0]
        except Exception:
            pass
        if device == "cpu":
            mlu = getattr(torch, "is_mlu_available", None)
            if getattr(torch.version, "cuda", None):
                device, device_version = "cuda", torch.version.cuda
            elif mlu is not None and mlu():
                device = "mlu"
        report["torch"] = {
            "version": torch.__version__.split("+")[0],
            "device": device,
            "device_version": device_version,
        }
print(json.dumps(report))
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceKind {
    Cuda,
    Ascend,
    Cpu,
    Other(String),
}

impl From<&str> for DeviceKind {
    fn from(name: &str) -> Self {
        match name {
            "cuda" => DeviceKind::Cuda,
            "ascend" => DeviceKind::Ascend,
            "cpu" => DeviceKind::Cpu,
            other => DeviceKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub kind: DeviceKind,
    pub version: Option<String>,
}

/// Torch release and the accelerator it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorchEnvironment {
    pub version: String,
    pub device: Device,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub python: String,
    pub site_paths: Vec<PathBuf>,
    pub torch: Option<TorchEnvironment>,
}

#[derive(Deserialize)]
struct ProbePayload {
    python: String,
    #[serde(default)]
    site_paths: Vec<PathBuf>,
    #[serde(default)]
    torch: Option<TorchPayload>,
}

#[derive(Deserialize)]
struct TorchPayload {
    version: String,
    device: String,
    #[serde(default)]
    device_version: Option<String>,
}

impl From<ProbePayload> for ProbeReport {
    fn from(payload: ProbePayload) -> Self {
        Self {
            python: payload.python,
            site_paths: payload.site_paths,
            torch: payload.torch.map(|torch| TorchEnvironment {
                version: torch.version,
                device: Device {
                    kind: DeviceKind::from(torch.device.as_str()),
                    version: torch.device_version.filter(|v| !v.is_empty()),
                },
            }),
        }
    }
}

impl ProbeReport {
    /// Decode the probe output. Only the last non-empty line is JSON;
    /// anything printed before it (e.g. by `sitecustomize`) is ignored.
    pub fn parse(output: &str) -> Result<Self> {
        let line = output
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default();
        let payload: ProbePayload =
            serde_json::from_str(line).context("invalid interpreter probe payload")?;
        Ok(payload.into())
    }
}

#[tracing::instrument(skip(runtime))]
pub fn probe<R: Runtime>(runtime: &R, python: &Path, with_torch: bool) -> Result<ProbeReport> {
    let mut args = vec!["-c".to_string(), PROBE_SCRIPT.to_string()];
    if with_torch {
        args.push("--torch".to_string());
    }
    let output = runtime
        .capture(python, &args)
        .with_context(|| format!("failed to inspect interpreter {}", python.display()))?;
    ProbeReport::parse(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_parse_cuda_report() {
        let report = ProbeReport::parse(
            r#"{"python": "3.10.12", "site_paths": ["/usr/lib/python310.zip", "/venv/lib/python3.10/site-packages"], "torch": {"version": "2.1.2", "device": "cuda", "device_version": "11.8"}}"#,
        )
        .unwrap();

        assert_eq!(report.python, "3.10.12");
        assert_eq!(
            report.site_paths,
            vec![
                PathBuf::from("/usr/lib/python310.zip"),
                PathBuf::from("/venv/lib/python3.10/site-packages")
            ]
        );
        assert_eq!(
            report.torch,
            Some(TorchEnvironment {
                version: "2.1.2".into(),
                device: Device {
                    kind: DeviceKind::Cuda,
                    version: Some("11.8".into()),
                },
            })
        );
    }

    #[test]
    fn test_parse_without_torch() {
        let report = ProbeReport::parse(r#"{"python": "3.12.1", "site_paths": [], "torch": null}"#)
            .unwrap();
        assert!(report.torch.is_none());
        assert!(report.site_paths.is_empty());
    }

    #[test]
    fn test_parse_skips_leading_noise() {
        let output = "Welcome banner from sitecustomize\n{\"python\": \"3.11.0\", \"torch\": {\"version\": \"2.2.0\", \"device\": \"mlu\", \"device_version\": \"\"}}\n\n";
        let report = ProbeReport::parse(output).unwrap();
        let torch = report.torch.unwrap();
        assert_eq!(torch.device.kind, DeviceKind::Other("mlu".into()));
        assert_eq!(torch.device.version, None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ProbeReport::parse("").is_err());
        assert!(ProbeReport::parse("Traceback (most recent call last):").is_err());
    }

    #[test]
    fn test_probe_passes_torch_flag() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_capture()
            .withf(|program, args| {
                program == Path::new("/venv/bin/python")
                    && args.len() == 3
                    && args[0] == "-c"
                    && args[2] == "--torch"
            })
            .times(1)
            .returning(|_, _| {
                Ok(r#"{"python": "3.10.0", "site_paths": [], "torch": {"version": "2.1.3", "device": "cpu", "device_version": null}}"#.to_string())
            });

        let report = probe(&runtime, Path::new("/venv/bin/python"), true).unwrap();
        assert_eq!(report.torch.unwrap().device.kind, DeviceKind::Cpu);
    }

    #[test]
    fn test_probe_failure_is_reported() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_capture()
            .withf(|_, args| args.len() == 2)
            .returning(|_, _| Err(anyhow::anyhow!("exited with 1")));

        let err = probe(&runtime, Path::new("/venv/bin/python"), false).unwrap_err();
        assert!(format!("{err:#}").contains("/venv/bin/python"));
    }
}
