// Specifier resolution against the on-disk project layout.
//
// Relative specifiers are joined against the importing file's directory and
// probed for a script or markup sibling. Package-style specifiers that follow
// the addon conventions (`<pkg>/templates/components/...`, `<pkg>/mixins/...`)
// are mapped onto the package's `addon/` or `app/` tree. Everything else is an
// external reference and passes through untouched.

use std::path::Path;

use tracing::trace;

const TEMPLATES_COMPONENTS: &str = "/templates/components/";
const MIXINS: &str = "/mixins/";

/// Resolves module specifiers into concrete project paths by probing the
/// filesystem. A miss always degrades to an unresolved string, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    script_extension: String,
    markup_extension: String,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new("js", "hbs")
    }
}

impl PathResolver {
    pub fn new(script_extension: impl Into<String>, markup_extension: impl Into<String>) -> Self {
        Self {
            script_extension: script_extension.into(),
            markup_extension: markup_extension.into(),
        }
    }

    pub fn script_extension(&self) -> &str {
        &self.script_extension
    }

    pub fn markup_extension(&self) -> &str {
        &self.markup_extension
    }

    /// Resolve `specifier` as seen from `containing_file`.
    pub fn resolve(&self, specifier: &str, containing_file: &str) -> String {
        let resolved = if specifier.starts_with('.') {
            self.resolve_relative(specifier, containing_file)
        } else if specifier.contains(TEMPLATES_COMPONENTS) {
            self.resolve_convention(specifier, containing_file, true)
        } else if specifier.contains(MIXINS) {
            self.resolve_convention(specifier, containing_file, false)
        } else {
            specifier.to_string()
        };
        trace!(specifier, resolved = %resolved, "Resolved specifier");
        resolved
    }

    /// Whether `path` names a concrete script or markup file.
    pub fn is_concrete(&self, path: &str) -> bool {
        has_extension(path, &self.script_extension) || has_extension(path, &self.markup_extension)
    }

    fn resolve_relative(&self, specifier: &str, containing_file: &str) -> String {
        let containing = serialize_path(Path::new(containing_file));
        let dir = containing.rsplit_once('/').map_or("", |(dir, _)| dir);
        let joined = serialize_path(&path_clean::clean(Path::new(dir).join(specifier)));

        let script = format!("{joined}.{}", self.script_extension);
        if Path::new(&script).exists() {
            return script;
        }
        let markup = format!("{joined}.{}", self.markup_extension);
        if Path::new(&markup).exists() {
            return markup;
        }
        joined
    }

    /// Probe the `addon`/`app` trees of the package named by the first
    /// specifier segment. The last existing candidate wins.
    fn resolve_convention(
        &self,
        specifier: &str,
        containing_file: &str,
        with_app_tree: bool,
    ) -> String {
        let base = specifier.split('/').next().unwrap_or_default();
        if base.is_empty() {
            return specifier.to_string();
        }
        let rest = specifier.replacen(base, "", 1);
        let containing = serialize_path(Path::new(containing_file));
        let root = containing
            .find(base)
            .map_or(containing.as_str(), |idx| &containing[..idx]);

        let mut candidates = vec![
            format!("{root}{base}/addon{rest}.{}", self.script_extension),
        ];
        if with_app_tree {
            candidates.push(format!("{root}{base}/addon{rest}.{}", self.markup_extension));
            candidates.push(format!("{root}{base}/app{rest}.{}", self.script_extension));
            candidates.push(format!("{root}{base}/app{rest}.{}", self.markup_extension));
        }

        candidates
            .into_iter()
            .rev()
            .find(|candidate| Path::new(candidate).exists())
            .unwrap_or_else(|| specifier.to_string())
    }
}

/// Resolve with the default `js`/`hbs` extensions.
pub fn resolve_specifier(specifier: &str, containing_file: &str) -> String {
    PathResolver::default().resolve(specifier, containing_file)
}

/// Render a path with forward-slash separators regardless of platform.
pub fn serialize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn has_extension(path: &str, extension: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| !ext.contains('/') && ext == extension)
}
