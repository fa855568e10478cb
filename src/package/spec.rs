//! Rewriting of install arguments to request the `mminstall` extra.

use log::debug;

use super::table::is_project_package;

/// Extra carrying the bundled requirements of project packages.
pub const MMINSTALL_EXTRA: &str = "mminstall";

/// Characters that end the package name in a requirement specifier.
const NAME_TERMINATORS: &[char] = &['[', '=', '<', '>', '!', '~'];

/// Package name of a requirement token: everything before the first
/// extras bracket or version operator.
///
/// Markers (`;`) and direct references (`@`) are not split off, so such
/// tokens never match a known name and are passed through as-is.
pub fn package_name(token: &str) -> &str {
    let end = token.find(NAME_TERMINATORS).unwrap_or(token.len());
    token[..end].trim()
}

/// Add `[mminstall]` to every token naming a project package.
pub fn add_mminstall_extras<S: AsRef<str>>(install_args: &[S]) -> Vec<String> {
    install_args
        .iter()
        .map(|arg| rewrite_token(arg.as_ref()))
        .collect()
}

fn rewrite_token(arg: &str) -> String {
    if arg.starts_with('-') {
        return arg.to_string();
    }

    let name = package_name(arg);
    if !is_project_package(name) {
        return arg.to_string();
    }

    let rewritten = if !arg.contains('[') {
        // `name` is trimmed, so locate it rather than assume it starts the token
        let start = arg.find(name).unwrap_or(0);
        let rest = &arg[start + name.len()..];
        format!("{}{}[{}]{}", &arg[..start], name, MMINSTALL_EXTRA, rest)
    } else if !arg.contains(MMINSTALL_EXTRA) {
        match (arg.find('['), arg.find(']')) {
            (Some(open), Some(close)) if open < close => format!(
                "{}[{},{}]{}",
                &arg[..open],
                &arg[open + 1..close],
                MMINSTALL_EXTRA,
                &arg[close + 1..]
            ),
            _ => arg.to_string(),
        }
    } else {
        arg.to_string()
    };

    if rewritten != arg {
        debug!("Rewrote install argument {:?} -> {:?}", arg, rewritten);
    }
    rewritten
}
