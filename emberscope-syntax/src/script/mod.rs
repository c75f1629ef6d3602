//! Source analyzer: structural facts of a JavaScript module.
//!
//! A single pre-order walk over the tree-sitter tree fills a [`ScriptMeta`]
//! owned by that call. Object-literal properties are only classified at scope
//! depth zero, i.e. outside any function, class or block body, which is where
//! `Component.extend({ ... })` style declarations live.

mod calls;
mod helpers;

use tracing::debug;
use tree_sitter::Node;

pub use calls::{CallShape, classify_call};

use crate::meta::{ActionSignature, ScriptMeta};
use crate::resolve::PathResolver;
use crate::{Result, SyntaxError};

use calls::describe_call;
use helpers::{
    child_by_field, first_error, has_token, key_name, named_children, node_text, param_names,
    string_value,
};

/// Node kinds that open a new lexical scope.
const SCOPE_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
    "class_declaration",
    "class",
    "statement_block",
    "for_statement",
    "for_in_statement",
    "switch_statement",
    "catch_clause",
];

/// Parse JavaScript source, failing on any syntax error in the tree.
pub fn parse_module(source: &str, path: &str) -> Result<tree_sitter::Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| SyntaxError::Language(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or_else(|| SyntaxError::Parse {
        path: path.to_string(),
        message: "tree-sitter parse returned None".to_string(),
    })?;

    if let Some(error) = first_error(tree.root_node()) {
        let at = error.start_position();
        return Err(SyntaxError::Parse {
            path: path.to_string(),
            message: format!(
                "unexpected syntax at line {}, column {}",
                at.row + 1,
                at.column + 1
            ),
        });
    }
    Ok(tree)
}

/// Analyze a module with the default `js`/`hbs` resolver.
pub fn analyze_module(source: &str, containing_path: &str) -> Result<ScriptMeta> {
    analyze_module_with(source, containing_path, &PathResolver::default())
}

/// Analyze a module, resolving its import and export specifiers with `resolver`.
pub fn analyze_module_with(
    source: &str,
    containing_path: &str,
    resolver: &PathResolver,
) -> Result<ScriptMeta> {
    let tree = parse_module(source, containing_path)?;
    let mut meta = extract_facts(&tree, source);

    for specifier in meta.imports.iter_mut().chain(meta.exports.iter_mut()) {
        *specifier = resolver.resolve(specifier, containing_path);
    }

    debug!(
        path = containing_path,
        imports = meta.imports.len(),
        computeds = meta.computeds.len(),
        props = meta.props.len(),
        "Analyzed module"
    );
    Ok(meta)
}

/// Walk an already-parsed tree without resolving specifiers.
pub fn extract_facts(tree: &tree_sitter::Tree, source: &str) -> ScriptMeta {
    let mut walker = ScriptWalker {
        source,
        meta: ScriptMeta::default(),
    };
    let root = tree.root_node();
    walker.visit_program(root);
    walker.meta
}

struct ScriptWalker<'s> {
    source: &'s str,
    meta: ScriptMeta,
}

impl ScriptWalker<'_> {
    fn visit_program(&mut self, program: Node<'_>) {
        if let Some(source) = reexport_source(program, self.source) {
            self.meta.exports.push(source);
        }
        self.visit_children(program, 0);
    }

    fn visit(&mut self, node: Node<'_>, depth: usize) {
        match node.kind() {
            "import_statement" => {
                if let Some(source) = child_by_field(node, "source") {
                    self.meta
                        .imports
                        .push(string_value(source, self.source).to_string());
                }
            }
            "export_statement" => {
                let named = named_children(node)
                    .iter()
                    .any(|child| child.kind() == "export_clause");
                if let (true, Some(source)) = (named, child_by_field(node, "source")) {
                    self.meta
                        .exports
                        .push(string_value(source, self.source).to_string());
                }
            }
            "object" => self.visit_object(node),
            "pair" if depth == 0 && is_in_object(node) => {
                if let (Some(key), Some(value)) =
                    (child_by_field(node, "key"), child_by_field(node, "value"))
                {
                    let key = key_name(key, self.source);
                    self.classify_property(&key, value);
                }
            }
            "shorthand_property_identifier" if depth == 0 && is_in_object(node) => {
                let key = node_text(node, self.source).to_string();
                self.classify_property(&key, node);
            }
            _ => {}
        }

        let depth = if SCOPE_KINDS.contains(&node.kind()) {
            depth + 1
        } else {
            depth
        };
        self.visit_children(node, depth);
    }

    fn visit_children(&mut self, node: Node<'_>, depth: usize) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child, depth);
        }
    }

    /// Object methods are recorded as functions at any depth.
    fn visit_object(&mut self, object: Node<'_>) {
        for method in named_children(object)
            .into_iter()
            .filter(|child| child.kind() == "method_definition")
        {
            if let Some(signature) = method_signature(method, self.source) {
                self.meta.functions.push(signature.to_string());
            }
        }
    }

    fn classify_property(&mut self, key: &str, value: Node<'_>) {
        let source = self.source;
        match key {
            "actions" => {
                if value.kind() == "object" {
                    self.meta.actions = action_signatures(value, source);
                }
                return;
            }
            "classNames" => {
                if value.kind() == "array" {
                    self.meta.class_names = literal_elements(value, source);
                }
                return;
            }
            "tagName" if value.kind() == "string" => {
                self.meta.tag_names = vec![string_value(value, source).to_string()];
                return;
            }
            "attributeBindings" | "classNameBindings" => {
                let values = literal_elements(value, source);
                for binding in &values {
                    let local = binding.split(':').next().unwrap_or_default();
                    self.meta.unknown_props.push(local.to_string());
                }
                if key == "attributeBindings" {
                    self.meta.attribute_bindings = values;
                } else {
                    self.meta.class_name_bindings = values;
                }
                return;
            }
            "concatenatedProperties" => {
                self.meta.concatenated_properties = literal_elements(value, source);
                return;
            }
            "mergedProperties" => {
                self.meta.merged_properties = literal_elements(value, source);
                return;
            }
            "positionalParams" => {
                self.meta.positional_params = literal_elements(value, source);
                return;
            }
            _ => {}
        }

        if value.kind() == "call_expression" {
            if let Some(tag) = tagged_template_tag(value, source) {
                self.meta.props.push(format!("{key} = {tag}`...`"));
            } else {
                let shape = classify_call(value, source);
                let declaration =
                    describe_call(key, value, shape, source, &mut self.meta.unknown_props);
                self.meta.computeds.push(declaration);
            }
            return;
        }

        if let Some(rendered) = render_value(value, source) {
            self.meta.props.push(format!("{key} = {rendered}"));
        }
    }
}

/// A module that is exactly one import followed by a default export
/// re-exports the imported module.
fn reexport_source(program: Node<'_>, source: &str) -> Option<String> {
    let body = named_children(program);
    let [import, export] = body.as_slice() else {
        return None;
    };
    if import.kind() != "import_statement"
        || export.kind() != "export_statement"
        || !has_token(*export, "default")
    {
        return None;
    }
    child_by_field(*import, "source").map(|s| string_value(s, source).to_string())
}

fn is_in_object(node: Node<'_>) -> bool {
    node.parent().is_some_and(|parent| parent.kind() == "object")
}

fn method_signature(method: Node<'_>, source: &str) -> Option<ActionSignature> {
    let name = key_name(child_by_field(method, "name")?, source);
    let params = child_by_field(method, "parameters")
        .map(|params| param_names(params, source))
        .unwrap_or_default();
    Some(ActionSignature::new(name, params))
}

fn action_signatures(actions: Node<'_>, source: &str) -> Vec<ActionSignature> {
    named_children(actions)
        .into_iter()
        .filter_map(|member| match member.kind() {
            "method_definition" => method_signature(member, source),
            "pair" => {
                let key = key_name(child_by_field(member, "key")?, source);
                let value = child_by_field(member, "value")?;
                if !matches!(
                    value.kind(),
                    "function_expression" | "function" | "arrow_function"
                ) {
                    return None;
                }
                let params = child_by_field(value, "parameters")
                    .map(|params| param_names(params, source))
                    .or_else(|| {
                        child_by_field(value, "parameter")
                            .map(|param| vec![node_text(param, source).to_string()])
                    })
                    .unwrap_or_default();
                Some(ActionSignature::new(key, params))
            }
            _ => None,
        })
        .collect()
}

/// Literal values of an array's elements, in source order. Non-literal
/// elements are skipped; a non-array value yields nothing.
fn literal_elements(value: Node<'_>, source: &str) -> Vec<String> {
    if value.kind() != "array" {
        return Vec::new();
    }
    named_children(value)
        .into_iter()
        .filter_map(|element| match element.kind() {
            "string" => Some(string_value(element, source).to_string()),
            "number" | "true" | "false" | "null" => Some(node_text(element, source).to_string()),
            _ => None,
        })
        .collect()
}

/// `tag` of a tagged template such as ``htmlSafe`...` ``.
fn tagged_template_tag<'a>(call: Node<'_>, source: &'a str) -> Option<&'a str> {
    let arguments = child_by_field(call, "arguments")?;
    if arguments.kind() != "template_string" {
        return None;
    }
    child_by_field(call, "function").map(|tag| node_text(tag, source))
}

/// Render a non-call property value, or `None` for unrecognized kinds.
fn render_value(value: Node<'_>, source: &str) -> Option<String> {
    let rendered = match value.kind() {
        "number" | "true" | "false" => node_text(value, source).to_string(),
        "null" => "null".to_string(),
        "string" => format!("\"{}\"", string_value(value, source)),
        "object" => "{ ... }".to_string(),
        "array" => "[ ... ]".to_string(),
        "identifier" | "undefined" | "shorthand_property_identifier" => {
            node_text(value, source).to_string()
        }
        "arrow_function" => "() => {}".to_string(),
        "ternary_expression" => "X ? Y : Z".to_string(),
        _ => return None,
    };
    Some(rendered)
}
