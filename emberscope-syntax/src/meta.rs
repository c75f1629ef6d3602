// Fact sheets produced by the analyzers.
//
// One `ScriptMeta` per JavaScript module, one `TemplateMeta` per markup
// template. Field names serialize in camelCase to match what downstream
// renderers consume.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ordered_set::OrderedSet;

// ── Script fact sheet ──────────────────────────────────────────────

/// An entry of an `actions` map: method name plus parameter names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionSignature {
    pub name: String,
    pub params: Vec<String>,
}

impl ActionSignature {
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

impl fmt::Display for ActionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptMeta {
    pub actions: Vec<ActionSignature>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub functions: Vec<String>,
    pub computeds: Vec<String>,
    pub props: Vec<String>,
    /// Bare names referenced from call arguments and binding specs.
    pub unknown_props: Vec<String>,
    pub tag_names: Vec<String>,
    pub attribute_bindings: Vec<String>,
    pub class_name_bindings: Vec<String>,
    pub class_names: Vec<String>,
    pub concatenated_properties: Vec<String>,
    pub merged_properties: Vec<String>,
    pub positional_params: Vec<String>,
}

// ── Template fact sheet ────────────────────────────────────────────

/// An element modifier invocation such as `{{on "click" this.save}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub param: Option<String>,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{} {param}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateMeta {
    pub paths: OrderedSet,
    pub arguments: OrderedSet,
    pub properties: OrderedSet,
    pub components: OrderedSet,
    pub helpers: OrderedSet,
    pub links: OrderedSet,
    pub modifiers: Vec<Modifier>,
}

// ── Either kind ────────────────────────────────────────────────────

/// Fact sheet of a single file, tagged by the analyzer that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum FileMeta {
    #[serde(rename = "component")]
    Script(ScriptMeta),
    Template(TemplateMeta),
}

impl FileMeta {
    /// Named array fields in fixed presentation order, excluding
    /// `imports`, `exports` and the internal `unknownProps`.
    pub fn categories(&self) -> Vec<(&'static str, Vec<String>)> {
        match self {
            Self::Script(meta) => vec![
                (
                    "actions",
                    meta.actions.iter().map(ToString::to_string).collect(),
                ),
                ("tagNames", meta.tag_names.clone()),
                ("functions", meta.functions.clone()),
                ("computeds", meta.computeds.clone()),
                ("props", meta.props.clone()),
                ("attributeBindings", meta.attribute_bindings.clone()),
                ("classNameBindings", meta.class_name_bindings.clone()),
                ("classNames", meta.class_names.clone()),
                ("concatenatedProperties", meta.concatenated_properties.clone()),
                ("mergedProperties", meta.merged_properties.clone()),
                ("positionalParams", meta.positional_params.clone()),
            ],
            Self::Template(meta) => vec![
                ("arguments", meta.arguments.to_vec()),
                ("properties", meta.properties.to_vec()),
                ("paths", meta.paths.to_vec()),
                ("components", meta.components.to_vec()),
                ("helpers", meta.helpers.to_vec()),
                ("links", meta.links.to_vec()),
                (
                    "modifiers",
                    meta.modifiers.iter().map(ToString::to_string).collect(),
                ),
            ],
        }
    }

    pub fn imports(&self) -> &[String] {
        match self {
            Self::Script(meta) => &meta.imports,
            Self::Template(_) => &[],
        }
    }

    pub fn exports(&self) -> &[String] {
        match self {
            Self::Script(meta) => &meta.exports,
            Self::Template(_) => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Script(_) => "component",
            Self::Template(_) => "template",
        }
    }
}
