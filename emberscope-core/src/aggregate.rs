//! Component aggregation: many file fact sheets in, one sorted and
//! cross-referenced component record out.
//!
//! Steps, in order:
//! 1. merge: concatenate every array field across the input sheets;
//! 2. turn template `properties` and `arguments` into bare property names;
//! 3. backfill a placeholder declaration for each name with none;
//! 4. sort declarations with a fixed total order;
//! 5. cross-reference template paths against the declarations.

use std::cmp::Ordering;

use emberscope_syntax::{ActionSignature, FileMeta, Modifier};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CrossReferencePolicy;

/// Name given to records built straight from an already merged sheet.
pub const UNNAMED_COMPONENT: &str = "<COMPONENT_NAME>";

const DEFAULT_TAG_NAME: &str = "div";
const UNDEFINED_SUFFIX: &str = "= undefined";

/// Every array field of both fact sheet kinds, concatenated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergedMeta {
    pub actions: Vec<ActionSignature>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub functions: Vec<String>,
    pub computeds: Vec<String>,
    pub props: Vec<String>,
    pub unknown_props: Vec<String>,
    pub tag_names: Vec<String>,
    pub attribute_bindings: Vec<String>,
    pub class_name_bindings: Vec<String>,
    pub class_names: Vec<String>,
    pub concatenated_properties: Vec<String>,
    pub merged_properties: Vec<String>,
    pub positional_params: Vec<String>,
    pub paths: Vec<String>,
    pub arguments: Vec<String>,
    pub properties: Vec<String>,
    pub components: Vec<String>,
    pub helpers: Vec<String>,
    pub links: Vec<String>,
    pub modifiers: Vec<Modifier>,
}

impl MergedMeta {
    /// Decode a sheet merged elsewhere, in the camelCase layout it serializes to.
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Concatenate `sheets` field by field, preserving input order.
    pub fn merge<'a>(sheets: impl IntoIterator<Item = &'a FileMeta>) -> Self {
        let mut merged = Self::default();
        for sheet in sheets {
            merged.absorb(sheet);
        }
        merged
    }

    fn absorb(&mut self, sheet: &FileMeta) {
        match sheet {
            FileMeta::Script(meta) => {
                self.actions.extend_from_slice(&meta.actions);
                self.imports.extend_from_slice(&meta.imports);
                self.exports.extend_from_slice(&meta.exports);
                self.functions.extend_from_slice(&meta.functions);
                self.computeds.extend_from_slice(&meta.computeds);
                self.props.extend_from_slice(&meta.props);
                self.unknown_props.extend_from_slice(&meta.unknown_props);
                self.tag_names.extend_from_slice(&meta.tag_names);
                self.attribute_bindings
                    .extend_from_slice(&meta.attribute_bindings);
                self.class_name_bindings
                    .extend_from_slice(&meta.class_name_bindings);
                self.class_names.extend_from_slice(&meta.class_names);
                self.concatenated_properties
                    .extend_from_slice(&meta.concatenated_properties);
                self.merged_properties
                    .extend_from_slice(&meta.merged_properties);
                self.positional_params
                    .extend_from_slice(&meta.positional_params);
            }
            FileMeta::Template(meta) => {
                self.paths.extend(meta.paths.to_vec());
                self.arguments.extend(meta.arguments.to_vec());
                self.properties.extend(meta.properties.to_vec());
                self.components.extend(meta.components.to_vec());
                self.helpers.extend(meta.helpers.to_vec());
                self.links.extend(meta.links.to_vec());
                self.modifiers.extend_from_slice(&meta.modifiers);
            }
        }
    }
}

/// The public shape of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Api {
    pub actions: Vec<ActionSignature>,
    pub tag_name: String,
    pub attribute_bindings: Vec<String>,
    pub merged_properties: Vec<String>,
    pub class_name_bindings: Vec<String>,
    pub concatenated_properties: Vec<String>,
    pub positional_params: Vec<String>,
    pub class_names: Vec<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            tag_name: DEFAULT_TAG_NAME.to_string(),
            attribute_bindings: Vec::new(),
            merged_properties: Vec::new(),
            class_name_bindings: Vec::new(),
            concatenated_properties: Vec::new(),
            positional_params: Vec::new(),
            class_names: Vec::new(),
        }
    }
}

/// Aggregated description of one logical component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInformation {
    pub name: String,
    pub js_props: Vec<String>,
    pub js_computeds: Vec<String>,
    pub js_func: Vec<String>,
    pub js_imports: Vec<String>,
    pub hbs_components: Vec<String>,
    pub hbs_props: Vec<String>,
    pub hbs_helpers: Vec<String>,
    pub api: Api,
}

/// Aggregate the fact sheets of one component, in the order given.
pub fn aggregate(
    name: &str,
    sheets: &[FileMeta],
    policy: CrossReferencePolicy,
) -> ComponentInformation {
    let merged = MergedMeta::merge(sheets);
    let mut info = extract_component_information(&merged, policy);
    info.name = name.to_string();
    info
}

/// Build a component record from a sheet merged elsewhere.
pub fn extract_component_information(
    meta: &MergedMeta,
    policy: CrossReferencePolicy,
) -> ComponentInformation {
    let mut info = ComponentInformation {
        name: UNNAMED_COMPONENT.to_string(),
        js_props: meta.props.clone(),
        js_computeds: meta.computeds.clone(),
        js_func: meta.functions.clone(),
        js_imports: meta.imports.clone(),
        hbs_components: meta.components.clone(),
        hbs_helpers: meta.helpers.clone(),
        api: Api {
            actions: meta.actions.clone(),
            tag_name: meta
                .tag_names
                .last()
                .cloned()
                .unwrap_or_else(|| DEFAULT_TAG_NAME.to_string()),
            attribute_bindings: meta.attribute_bindings.clone(),
            merged_properties: meta.merged_properties.clone(),
            class_name_bindings: meta.class_name_bindings.clone(),
            concatenated_properties: meta.concatenated_properties.clone(),
            positional_params: meta.positional_params.clone(),
            class_names: meta.class_names.clone(),
        },
        ..ComponentInformation::default()
    };

    let mut unknown_props = meta.unknown_props.clone();
    info.hbs_props.extend(meta.paths.iter().cloned());
    for property in &meta.properties {
        if let Some(local) = property.split('.').nth(1) {
            unknown_props.push(local.to_string());
        }
        info.hbs_props.push(property.clone());
    }
    for argument in &meta.arguments {
        let head = argument.split('.').next().unwrap_or_default();
        unknown_props.push(head.replacen('@', "", 1));
        info.hbs_props.push(argument.clone());
    }

    backfill_props(&mut info.js_props, &unknown_props);

    sort_declarations(&mut info.js_props);
    sort_declarations(&mut info.js_computeds);
    sort_functions(&mut info.js_func);
    info.api.actions.sort_by_key(ToString::to_string);
    info.api.attribute_bindings.sort();

    let references = std::mem::take(&mut info.hbs_props);
    let mut hbs_props = Vec::with_capacity(references.len());
    for name in references {
        hbs_props.push(cross_reference(name, &mut info, policy));
    }
    info.hbs_props = hbs_props;

    debug!(
        props = info.js_props.len(),
        computeds = info.js_computeds.len(),
        template_refs = info.hbs_props.len(),
        "Aggregated component"
    );
    info
}

/// Append `"<name> = <placeholder>"` for every referenced name that no
/// existing prop declares.
fn backfill_props(js_props: &mut Vec<String>, unknown_props: &[String]) {
    for raw in unknown_props.iter().filter(|raw| !raw.is_empty()) {
        let prop = raw.split('.').next().unwrap_or_default();
        let declared = format!("{prop} ");
        if js_props.iter().any(|p| p.starts_with(&declared)) {
            continue;
        }
        js_props.push(format!("{prop} = {}", infer_placeholder(raw)));
    }
}

/// Guess a value shape from how a property is referenced.
pub fn infer_placeholder(raw: &str) -> &'static str {
    let segments = raw.split('.').count();
    if raw.contains(".[]") || raw.ends_with(".length") {
        if segments == 2 { "[...]" } else { "undefined" }
    } else if raw.contains('{') {
        "{...}"
    } else if raw.contains(".@each") {
        if segments == 3 { "[{..}]" } else { "undefined" }
    } else if raw.contains('.') && !raw.contains('[') {
        "{...}"
    } else {
        "undefined"
    }
}

/// Text before the first space.
fn declared_name(entry: &str) -> &str {
    entry.split(' ').next().unwrap_or_default()
}

/// Text before the first `(`.
fn function_name(entry: &str) -> &str {
    entry.split('(').next().unwrap_or_default()
}

/// Ordering of prop and computed declarations: undefined placeholders,
/// then call-like values, then by first character, declared-name length
/// and declared name.
pub fn compare_declarations(a: &str, b: &str) -> Ordering {
    let key = |entry: &str| {
        let name = declared_name(entry);
        (
            !entry.ends_with(UNDEFINED_SUFFIX),
            !entry.contains('('),
            entry.chars().next(),
            name.chars().count(),
        )
    };
    key(a)
        .cmp(&key(b))
        .then_with(|| declared_name(a).cmp(declared_name(b)))
}

pub fn sort_declarations(entries: &mut [String]) {
    entries.sort_by(|a, b| compare_declarations(a, b));
}

/// Functions sort by name length, then name.
pub fn sort_functions(entries: &mut [String]) {
    entries.sort_by(|a, b| {
        let (a, b) = (function_name(a), function_name(b));
        a.chars()
            .count()
            .cmp(&b.chars().count())
            .then_with(|| a.cmp(b))
    });
}

fn cross_reference(
    name: String,
    info: &mut ComponentInformation,
    policy: CrossReferencePolicy,
) -> String {
    let head = name.split('.').next().unwrap_or_default();
    let matched = info
        .js_props
        .iter()
        .chain(&info.js_computeds)
        .find(|entry| declared_name(entry) == head)
        .or_else(|| info.js_func.iter().find(|entry| function_name(entry) == head));
    if let Some(declaration) = matched {
        return format!("{name} as this.{declaration}");
    }

    match policy {
        CrossReferencePolicy::Rewrite => name,
        CrossReferencePolicy::Annotate if name == "this" => name,
        CrossReferencePolicy::Annotate => {
            let scoped = name.starts_with('@') || name.starts_with("this.");
            let declared = if name.contains('.') && !scoped { head } else { &name };
            info.js_props
                .push(format!("{declared} = undefined // (used in template)"));
            format!("{name} as used in template")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberscope_syntax::{ScriptMeta, TemplateMeta};
    use proptest::prelude::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn script(props: &[&str]) -> FileMeta {
        FileMeta::Script(ScriptMeta {
            props: strings(props),
            ..ScriptMeta::default()
        })
    }

    fn template(source: &str) -> FileMeta {
        FileMeta::Template(emberscope_syntax::template::analyze_template(source).unwrap())
    }

    #[test]
    fn backfills_template_properties_before_defined_props() {
        let info = aggregate(
            "x",
            &[script(&["b = 1"]), template("{{this.a}}")],
            CrossReferencePolicy::Rewrite,
        );
        assert_eq!(info.name, "x");
        assert_eq!(info.js_props, vec!["a = undefined", "b = 1"]);
        assert_eq!(info.hbs_props, vec!["this.a"]);
    }

    #[test]
    fn merge_concatenates_in_input_order() {
        let merged = MergedMeta::merge(&[
            script(&["a = 1"]),
            template("{{@x}} {{y.z}}"),
            script(&["b = 2"]),
        ]);
        assert_eq!(merged.props, vec!["a = 1", "b = 2"]);
        assert_eq!(merged.arguments, vec!["@x"]);
        assert_eq!(merged.paths, vec!["y.z"]);
    }

    #[test]
    fn template_refs_list_paths_then_properties_then_arguments() {
        let info = extract_component_information(
            &MergedMeta {
                paths: strings(&["p"]),
                properties: strings(&["this.q"]),
                arguments: strings(&["@r"]),
                ..MergedMeta::default()
            },
            CrossReferencePolicy::Rewrite,
        );
        assert_eq!(info.name, UNNAMED_COMPONENT);
        assert_eq!(info.hbs_props, vec!["p", "this.q", "@r"]);
        assert_eq!(info.js_props, vec!["q = undefined", "r = undefined"]);
    }

    #[test]
    fn placeholder_inference() {
        assert_eq!(infer_placeholder("items.[]"), "[...]");
        assert_eq!(infer_placeholder("items.length"), "[...]");
        assert_eq!(infer_placeholder("a.b.length"), "undefined");
        assert_eq!(infer_placeholder("items.@each.done"), "[{..}]");
        assert_eq!(infer_placeholder("items.@each"), "undefined");
        assert_eq!(infer_placeholder("user.{name,age}"), "{...}");
        assert_eq!(infer_placeholder("user.name"), "{...}");
        assert_eq!(infer_placeholder("list[0]"), "undefined");
        assert_eq!(infer_placeholder("name"), "undefined");
    }

    #[test]
    fn backfill_skips_declared_and_repeated_names() {
        let mut props = strings(&["user = null"]);
        backfill_props(&mut props, &strings(&["user.name", "", "items.[]", "items.length"]));
        assert_eq!(props, vec!["user = null", "items = [...]"]);
    }

    #[test]
    fn declaration_order() {
        let mut entries = strings(&[
            "title = 'x'",
            "session = service(\"session\")",
            "b = undefined",
            "ab = 1",
            "a = 2",
            "t = 3",
        ]);
        sort_declarations(&mut entries);
        assert_eq!(
            entries,
            vec![
                "b = undefined",
                "session = service(\"session\")",
                "a = 2",
                "ab = 1",
                "t = 3",
                "title = 'x'",
            ]
        );
    }

    #[test]
    fn function_order() {
        let mut entries = strings(&["didRender()", "init()", "click(e)", "bar(a, b)"]);
        sort_functions(&mut entries);
        assert_eq!(entries, vec!["bar(a, b)", "init()", "click(e)", "didRender()"]);
    }

    #[test]
    fn api_defaults_and_last_tag_name_wins() {
        let info =
            extract_component_information(&MergedMeta::default(), CrossReferencePolicy::Rewrite);
        assert_eq!(info.api.tag_name, "div");

        let info = extract_component_information(
            &MergedMeta {
                tag_names: strings(&["span", "li"]),
                attribute_bindings: strings(&["title", "href"]),
                actions: vec![
                    ActionSignature::new("save", vec![]),
                    ActionSignature::new("cancel", vec!["e".into()]),
                ],
                ..MergedMeta::default()
            },
            CrossReferencePolicy::Rewrite,
        );
        assert_eq!(info.api.tag_name, "li");
        assert_eq!(info.api.attribute_bindings, vec!["href", "title"]);
        assert_eq!(info.api.actions[0].name, "cancel");
    }

    #[test]
    fn cross_reference_prefers_props_then_computeds_then_functions() {
        let meta = MergedMeta {
            props: strings(&["user = null"]),
            computeds: strings(&["user = alias('x')", "total = sum('a')"]),
            functions: strings(&["format(value)"]),
            paths: strings(&["user.name", "total", "format", "other"]),
            ..MergedMeta::default()
        };
        let info = extract_component_information(&meta, CrossReferencePolicy::Rewrite);
        assert_eq!(
            info.hbs_props,
            vec![
                "user.name as this.user = null",
                "total as this.total = sum('a')",
                "format as this.format(value)",
                "other",
            ]
        );
    }

    #[test]
    fn annotate_policy_marks_template_only_references() {
        let meta = MergedMeta {
            paths: strings(&["model.title", "model.body", "this"]),
            ..MergedMeta::default()
        };
        let info = extract_component_information(&meta, CrossReferencePolicy::Annotate);
        assert_eq!(
            info.hbs_props,
            vec![
                "model.title as used in template",
                "model.body as this.model = undefined // (used in template)",
                "this",
            ]
        );
        assert_eq!(info.js_props, vec!["model = undefined // (used in template)"]);
    }

    #[test]
    fn merged_meta_reads_camel_case_json() {
        let meta: MergedMeta = serde_json::from_str(
            r#"{"props": ["a = 1"], "tagNames": ["p"], "unknownProps": ["b"]}"#,
        )
        .unwrap();
        let info = extract_component_information(&meta, CrossReferencePolicy::Rewrite);
        assert_eq!(info.js_props, vec!["b = undefined", "a = 1"]);
        assert_eq!(info.api.tag_name, "p");
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("jsProps").is_some());
        assert_eq!(json["api"]["tagName"], "p");
    }

    #[test]
    fn merged_meta_from_json_rejects_malformed_input() {
        let meta = MergedMeta::from_json(r#"{"computeds": ["total = sum('a')"]}"#).unwrap();
        assert_eq!(meta.computeds, vec!["total = sum('a')"]);

        let err = MergedMeta::from_json(r#"{"props": "not a list"}"#).unwrap_err();
        assert!(matches!(err, crate::error::ExplorerError::Json(_)));
        assert!(MergedMeta::from_json("{").is_err());
    }

    #[test]
    fn template_meta_default_merges_to_nothing() {
        let merged = MergedMeta::merge(&[FileMeta::Template(TemplateMeta::default())]);
        assert_eq!(merged, MergedMeta::default());
    }

    fn declaration() -> impl Strategy<Value = String> {
        ("[a-c]{1,3}", prop_oneof![
            Just("undefined".to_string()),
            Just("1".to_string()),
            Just("alias('x')".to_string()),
            "[a-z]{0,3}".prop_map(|v| format!("'{v}'")),
        ])
            .prop_map(|(name, value)| format!("{name} = {value}"))
    }

    proptest! {
        #[test]
        fn declaration_sort_is_idempotent(
            mut entries in prop::collection::vec(declaration(), 0..20),
        ) {
            sort_declarations(&mut entries);
            let once = entries.clone();
            sort_declarations(&mut entries);
            prop_assert_eq!(once, entries);
        }

        #[test]
        fn declaration_order_is_total(a in declaration(), b in declaration(), c in declaration()) {
            prop_assert_eq!(compare_declarations(&a, &b), compare_declarations(&b, &a).reverse());
            if compare_declarations(&a, &b) != Ordering::Greater
                && compare_declarations(&b, &c) != Ordering::Greater
            {
                prop_assert_ne!(compare_declarations(&a, &c), Ordering::Greater);
            }
        }
    }
}
