//! Markup analyzer: referenced names of a Glimmer template.
//!
//! The template is parsed into an [`ast`] tree and walked once in document
//! order. Every path expression is classified by its scope (`@` arguments,
//! `this` properties) or its shape; invocation heads additionally feed the
//! helper, component and link categories. A post-pass removes names that
//! landed in more than one category.

pub mod ast;
mod parser;

use tracing::debug;

use crate::Result;
use crate::meta::{Modifier, TemplateMeta};

use ast::{AttrValue, Block, Call, ConcatPart, Element, Expression, PathExpression, Statement};

pub use parser::parse;

/// Block helper whose first positional param names a route.
const LINK_BLOCK: &str = "link-to";

/// Helper invoked with a literal name to render a component dynamically.
const COMPONENT_HELPER: &str = "component";

/// Built-in keywords never reported as paths or properties.
const IGNORED: &[&str] = &["hasBlock", "if", "else", "component", "yield", "hash", "unless"];

/// Analyze a template and return its fact sheet.
///
/// Malformed markup (unclosed or mismatched elements and blocks, unterminated
/// mustaches) is reported as [`crate::SyntaxError::Template`].
pub fn analyze_template(template: &str) -> Result<TemplateMeta> {
    let body = parse(template)?;
    let mut walker = TemplateWalker::default();
    walker.visit_statements(&body);
    let meta = walker.finish();
    debug!(
        paths = meta.paths.len(),
        components = meta.components.len(),
        helpers = meta.helpers.len(),
        "Analyzed template"
    );
    Ok(meta)
}

#[derive(Default)]
struct TemplateWalker {
    meta: TemplateMeta,
}

impl TemplateWalker {
    fn visit_statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            match statement {
                Statement::Mustache(mustache) => self.visit_invocation(&mustache.call),
                Statement::Block(block) => self.visit_block(block),
                Statement::Element(element) => self.visit_element(element),
                Statement::Text(_) | Statement::Comment(_) | Statement::MustacheComment(_) => {}
            }
        }
    }

    fn visit_block(&mut self, block: &Block) {
        if let Some(head) = block.call.path.as_path() {
            if head.original == LINK_BLOCK {
                if let Some(route) = block.call.params.first().and_then(Expression::original) {
                    self.meta.links.insert(route);
                }
            } else if is_plain_name(head) && head.original != COMPONENT_HELPER {
                self.meta.helpers.insert(head.original.as_str());
            } else if is_dashed_name(head) {
                self.meta.components.insert(head.original.as_str());
            }
        }
        self.visit_call(&block.call);
        self.visit_statements(&block.program);
        if let Some(inverse) = &block.inverse {
            self.visit_statements(inverse);
        }
    }

    fn visit_element(&mut self, element: &Element) {
        if element.tag.starts_with(|c: char| c.is_uppercase()) {
            self.meta.components.insert(element.tag.as_str());
        }
        for attribute in &element.attributes {
            match &attribute.value {
                AttrValue::Text(_) => {}
                AttrValue::Mustache(mustache) => self.visit_invocation(&mustache.call),
                AttrValue::Concat(parts) => {
                    for part in parts {
                        if let ConcatPart::Mustache(mustache) = part {
                            self.visit_invocation(&mustache.call);
                        }
                    }
                }
            }
        }
        for modifier in &element.modifiers {
            self.meta.modifiers.push(Modifier {
                name: modifier.path.original().unwrap_or_default(),
                param: modifier.params.first().and_then(Expression::original),
            });
            self.visit_call(modifier);
        }
        self.visit_statements(&element.children);
    }

    /// A mustache or sub-expression.
    fn visit_invocation(&mut self, call: &Call) {
        if let Some(head) = call.path.as_path() {
            if head.original == COMPONENT_HELPER {
                if let Some(Expression::Literal(ast::Literal::String(name))) = call.params.first() {
                    self.meta.components.insert(name.as_str());
                }
            } else if is_plain_name(head) {
                self.meta.helpers.insert(head.original.as_str());
            }
        }
        self.visit_call(call);
    }

    fn visit_call(&mut self, call: &Call) {
        self.visit_expression(&call.path);
        for param in &call.params {
            self.visit_expression(param);
        }
        for pair in &call.hash {
            self.visit_expression(&pair.value);
        }
    }

    fn visit_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Path(path) => self.visit_path(path),
            Expression::SubExpression(call) => self.visit_invocation(call),
            Expression::Literal(_) => {}
        }
    }

    fn visit_path(&mut self, path: &PathExpression) {
        let name = path.original.as_str();
        if path.data {
            self.meta.arguments.insert(name);
        } else if path.this {
            self.meta.properties.insert(name);
        } else if name.contains('/') {
            self.meta.components.insert(name);
        } else if name.contains('-') && !name.contains('.') {
            self.meta.helpers.insert(name);
        } else {
            self.meta.paths.insert(name);
        }
    }

    fn finish(self) -> TemplateMeta {
        let mut meta = self.meta;
        let TemplateMeta {
            arguments,
            properties,
            components,
            helpers,
            links,
            ..
        } = &meta;
        let claimed: Vec<String> = [arguments, properties, components, helpers, links]
            .into_iter()
            .flat_map(|set| set.iter().map(str::to_string))
            .collect();
        meta.paths
            .retain(|path| !IGNORED.contains(&path) && !claimed.iter().any(|c| c == path));

        let components = meta.components.clone();
        meta.helpers.retain(|helper| !components.contains(helper));
        meta.properties.retain(|property| !IGNORED.contains(&property));
        meta
    }
}

/// A scope-free head with no member access or dash: `if`, `concat`, `t`.
fn is_plain_name(path: &PathExpression) -> bool {
    !path.data && !path.this && !path.original.contains(['.', '-'])
}

fn is_dashed_name(path: &PathExpression) -> bool {
    !path.data && !path.this && path.original.contains('-') && !path.original.contains('.')
}
