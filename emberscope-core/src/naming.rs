//! Logical component names derived from file paths.
//!
//! A component is the group of files that share a name: a script and its
//! template under `components/`, a pod directory ending in `/component`, or
//! a private `-components` directory of an addon.

use emberscope_syntax::UNKNOWN;

const TREE_PREFIXES: &[&str] = &["app/", "addon/", "src/"];

/// Map `path` to its component name, stripping `root` first.
///
/// Returns `"<UNKNOWN>"` for files outside every component convention
/// (routes, controllers, `templates/`) and an empty string for an empty path.
pub fn extract_component_name(path: &str, root: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let stem = strip_extension(path);
    let relative = if root.is_empty() {
        stem.to_string()
    } else {
        stem.replacen(root, "", 1)
    };

    let Some(tail) = component_tail(&relative)
        .map(|tail| tail.trim_start_matches('/'))
        .filter(|tail| !tail.is_empty())
    else {
        return UNKNOWN.to_string();
    };
    TREE_PREFIXES
        .iter()
        .find_map(|prefix| tail.strip_prefix(prefix))
        .unwrap_or(tail)
        .to_string()
}

fn component_tail(relative: &str) -> Option<&str> {
    if let Some(pod) = relative.strip_suffix("/component") {
        Some(pod)
    } else if relative.contains("/components/") {
        relative.split("/components/").nth(1)
    } else if relative.contains("/-components") {
        relative.split("/-components").nth(1)
    } else {
        None
    }
}

/// Drop the extension of the last path segment only.
fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |idx| idx + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_component_layout() {
        assert_eq!(
            extract_component_name("app/components/foo-bar/index.js", "app"),
            "foo-bar/index"
        );
        assert_eq!(
            extract_component_name("/repo/app/components/user-card.hbs", "/repo"),
            "user-card"
        );
    }

    #[test]
    fn template_colocated_under_templates_components() {
        assert_eq!(
            extract_component_name("/repo/app/templates/components/user-card.hbs", "/repo"),
            "user-card"
        );
    }

    #[test]
    fn pod_layout() {
        assert_eq!(
            extract_component_name("/repo/app/pods/user-card/component.js", "/repo"),
            "pods/user-card"
        );
    }

    #[test]
    fn private_addon_components() {
        assert_eq!(
            extract_component_name("/repo/addon/-components/spinner.js", "/repo"),
            "spinner"
        );
    }

    #[test]
    fn non_components_are_unknown() {
        assert_eq!(extract_component_name("app/routes/x.js", "app"), UNKNOWN);
        assert_eq!(extract_component_name("/repo/app/templates/index.hbs", "/repo"), UNKNOWN);
        assert_eq!(extract_component_name("/repo/app/app.js", "/repo"), UNKNOWN);
    }

    #[test]
    fn empty_path_is_empty_name() {
        assert_eq!(extract_component_name("", "/repo"), "");
    }

    #[test]
    fn extension_only_stripped_from_file_name() {
        assert_eq!(strip_extension("a.b/components/x"), "a.b/components/x");
        assert_eq!(strip_extension("a/x.min.js"), "a/x.min");
        assert_eq!(strip_extension("a/.hidden"), "a/.hidden");
    }
}
