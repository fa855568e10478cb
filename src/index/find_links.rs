use log::{debug, warn};
use url::Url;

use crate::{
    package::COMPANION_PACKAGE,
    python::{Device, DeviceKind, TorchEnvironment},
    runtime::Runtime,
};

pub const DEFAULT_MMCV_BASE_URL: &str = "https://mmwheels.onedl.ai";
pub const MMCV_BASE_URL_ENV: &str = "MMCV_BASE_URL";

/// Base URL of the companion package index, honouring `MMCV_BASE_URL`.
///
/// An override that does not parse as an absolute URL is discarded with a warning.
/// Surrounding whitespace is dropped.
pub fn mmcv_base_url<R: Runtime>(runtime: &R) -> String {
    let base_url = match runtime.env_var(MMCV_BASE_URL_ENV) {
        Ok(url) => url.trim().to_string(),
        Err(_) => return DEFAULT_MMCV_BASE_URL.to_string(),
    };

    if base_url != DEFAULT_MMCV_BASE_URL {
        warn!(
            "Using the mmcv find base URL from environment variable `{}`: {}",
            MMCV_BASE_URL_ENV, base_url
        );
    }

    if let Err(err) = Url::parse(&base_url) {
        debug!("Failed to parse {}: {}", MMCV_BASE_URL_ENV, err);
        warn!("Invalid {}: {}. Using default.", MMCV_BASE_URL_ENV, base_url);
        return DEFAULT_MMCV_BASE_URL.to_string();
    }

    base_url
}

/// `host[:port]` to pass as `--trusted-host` when `base_url` is plain http.
pub fn trusted_host(base_url: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?;
    if url.scheme() != "http" {
        return None;
    }
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Path segment naming the accelerator build, e.g. `cu118`, `ascend800`, `cpu`.
pub fn device_segment(device: &Device) -> String {
    let version = device
        .version
        .as_deref()
        .map(|v| v.replace('.', ""))
        .unwrap_or_default();

    match device.kind {
        DeviceKind::Cuda if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) => {
            format!("cu{}", version)
        }
        DeviceKind::Ascend => format!("ascend{}", version),
        _ => "cpu".to_string(),
    }
}

/// Torch version pinned to `major.minor.0` with periods removed: `2.1.3` -> `210`.
pub fn torch_segment(torch_version: &str) -> String {
    let release = torch_version
        .split_once('+')
        .map_or(torch_version, |(release, _local)| release);
    let mut parts = release.trim().split('.');
    let major = parts.next().filter(|p| !p.is_empty()).unwrap_or("0");
    let minor = parts.next().filter(|p| !p.is_empty()).unwrap_or("0");
    format!("{}.{}.0", major, minor).replace('.', "")
}

/// Find link for the companion package matching `torch`.
pub fn mmcv_find_link(base_url: &str, torch: &TorchEnvironment) -> String {
    format!(
        "{}/{}-torch{}/simple/{}/index.html",
        base_url.trim_end_matches('/'),
        device_segment(&torch.device),
        torch_segment(&torch.version),
        COMPANION_PACKAGE
    )
}

/// Append `--trusted-host` (for plain http) and `-f <find link>` to `install_args`.
#[tracing::instrument(skip(runtime, install_args))]
pub fn add_mmcv_find_links<R: Runtime>(
    runtime: &R,
    mut install_args: Vec<String>,
    torch: &TorchEnvironment,
) -> Vec<String> {
    let base_url = mmcv_base_url(runtime);

    if let Some(host) = trusted_host(&base_url) {
        install_args.push("--trusted-host".to_string());
        install_args.push(host);
    }

    let find_link = mmcv_find_link(&base_url, torch);
    debug!("Using {} find link: {}", COMPANION_PACKAGE, find_link);
    install_args.push("-f".to_string());
    install_args.push(find_link);
    install_args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn torch(version: &str, kind: DeviceKind, device_version: Option<&str>) -> TorchEnvironment {
        TorchEnvironment {
            version: version.to_string(),
            device: Device {
                kind,
                version: device_version.map(str::to_string),
            },
        }
    }

    fn runtime_with_base_url(url: Option<&'static str>) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(MMCV_BASE_URL_ENV))
            .returning(move |_| url.map(str::to_string).ok_or(std::env::VarError::NotPresent));
        runtime
    }

    #[test]
    fn test_base_url_defaults_when_unset() {
        let runtime = runtime_with_base_url(None);
        assert_eq!(mmcv_base_url(&runtime), DEFAULT_MMCV_BASE_URL);
    }

    #[test_log::test]
    fn test_base_url_override() {
        let runtime = runtime_with_base_url(Some("http://10.0.0.5:8080/wheels"));
        assert_eq!(mmcv_base_url(&runtime), "http://10.0.0.5:8080/wheels");
    }

    #[test_log::test]
    fn test_base_url_without_scheme_falls_back() {
        let runtime = runtime_with_base_url(Some("mirror.local/wheels"));
        assert_eq!(mmcv_base_url(&runtime), DEFAULT_MMCV_BASE_URL);
    }

    #[test_log::test]
    fn test_base_url_with_surrounding_whitespace() {
        let runtime = runtime_with_base_url(Some(" http://10.0.0.5:8080/wheels\n"));
        assert_eq!(mmcv_base_url(&runtime), "http://10.0.0.5:8080/wheels");
    }

    #[test_log::test]
    fn test_base_url_not_absolute_falls_back() {
        for url in ["/srv/wheels", "", "http://", "https://exa mple.com"] {
            let runtime = runtime_with_base_url(Some(url));
            assert_eq!(mmcv_base_url(&runtime), DEFAULT_MMCV_BASE_URL, "{url:?}");
        }
    }

    #[test]
    fn test_trusted_host() {
        assert_eq!(trusted_host("http://10.0.0.5:8080/wheels").as_deref(), Some("10.0.0.5:8080"));
        assert_eq!(trusted_host("HTTP://Mirror.Local/mmcv").as_deref(), Some("mirror.local"));
        assert_eq!(trusted_host("http://[::1]:9000").as_deref(), Some("[::1]:9000"));
        assert_eq!(trusted_host("https://mmwheels.onedl.ai"), None);
        assert_eq!(trusted_host("file:///srv/wheels"), None);
    }

    #[test]
    fn test_device_segment() {
        let cases = [
            (DeviceKind::Cuda, Some("11.8"), "cu118"),
            (DeviceKind::Cuda, Some("121"), "cu121"),
            (DeviceKind::Cuda, Some("12.x"), "cpu"),
            (DeviceKind::Cuda, None, "cpu"),
            (DeviceKind::Ascend, Some("8.0.0"), "ascend800"),
            (DeviceKind::Ascend, None, "ascend"),
            (DeviceKind::Cpu, None, "cpu"),
            (DeviceKind::Other("mlu".into()), Some("1.0"), "cpu"),
        ];
        for (kind, version, expected) in cases {
            let device = Device {
                kind,
                version: version.map(str::to_string),
            };
            assert_eq!(device_segment(&device), expected, "{device:?}");
        }
    }

    #[test]
    fn test_torch_segment() {
        assert_eq!(torch_segment("2.1.3"), "210");
        assert_eq!(torch_segment("2.1.3+cu118"), "210");
        assert_eq!(torch_segment("1.13.1"), "1130");
        assert_eq!(torch_segment("2.4"), "240");
        assert_eq!(torch_segment("2"), "200");
    }

    #[test]
    fn test_cpu_find_link() {
        let link = mmcv_find_link(DEFAULT_MMCV_BASE_URL, &torch("2.1.3", DeviceKind::Cpu, None));
        assert_eq!(
            link,
            format!("{DEFAULT_MMCV_BASE_URL}/cpu-torch210/simple/onedl-mmcv/index.html")
        );
    }

    #[test]
    fn test_find_link_trims_trailing_slash() {
        let link = mmcv_find_link(
            "https://mirror.example.com/mmcv/",
            &torch("2.3.1+cu121", DeviceKind::Cuda, Some("12.1")),
        );
        assert_eq!(
            link,
            "https://mirror.example.com/mmcv/cu121-torch230/simple/onedl-mmcv/index.html"
        );
    }

    #[test]
    fn test_add_find_links_https() {
        let runtime = runtime_with_base_url(None);
        let args = add_mmcv_find_links(
            &runtime,
            vec!["mmdet[mminstall]".to_string()],
            &torch("2.1.3", DeviceKind::Cpu, None),
        );
        assert_eq!(
            args,
            vec![
                "mmdet[mminstall]".to_string(),
                "-f".to_string(),
                format!("{DEFAULT_MMCV_BASE_URL}/cpu-torch210/simple/onedl-mmcv/index.html"),
            ]
        );
    }

    #[test]
    fn test_add_find_links_trusts_padded_http_override() {
        let runtime = runtime_with_base_url(Some("  http://10.0.0.5:8080/wheels"));
        let args = add_mmcv_find_links(&runtime, vec![], &torch("2.1.3", DeviceKind::Cpu, None));
        assert_eq!(
            args,
            vec![
                "--trusted-host",
                "10.0.0.5:8080",
                "-f",
                "http://10.0.0.5:8080/wheels/cpu-torch210/simple/onedl-mmcv/index.html",
            ]
        );
    }

    #[test]
    fn test_add_find_links_trusts_plain_http_host() {
        let runtime = runtime_with_base_url(Some("http://10.0.0.5:8080"));
        let args = add_mmcv_find_links(
            &runtime,
            vec![],
            &torch("2.0.1", DeviceKind::Cuda, Some("11.7")),
        );
        assert_eq!(
            args,
            vec![
                "--trusted-host",
                "10.0.0.5:8080",
                "-f",
                "http://10.0.0.5:8080/cu117-torch200/simple/onedl-mmcv/index.html",
            ]
        );
    }
}
