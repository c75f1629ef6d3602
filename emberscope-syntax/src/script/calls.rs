// Classification of call-valued properties.
//
// Framework idioms are recognized purely by callee shape: an injected
// service, a chained call such as `computed(...).readOnly()`, a plain call,
// or anything else. Each shape renders a one-line declaration for the
// `computeds` list and harvests string arguments as referenced names.

use tree_sitter::Node;

use crate::UNKNOWN;

use super::helpers::{child_by_field, named_children, node_text, string_value};

const FUNCTION_PLACEHOLDER: &str = "fn() {...}";

/// Recognized callee shapes of a call expression.
#[derive(Debug, Clone, Copy)]
pub enum CallShape<'t> {
    /// `service()` or `service("name")`.
    Service { argument: Option<Node<'t>> },
    /// `inner(...).method(...)`; `inner` is `None` when the receiver is not a call.
    Chained {
        inner: Option<Node<'t>>,
        method: Node<'t>,
    },
    /// `name(...)`.
    Plain { callee: Node<'t> },
    /// Any other callee expression.
    Opaque,
}

/// Classify the callee of `call`, a `call_expression` node.
pub fn classify_call<'t>(call: Node<'t>, source: &str) -> CallShape<'t> {
    let Some(callee) = child_by_field(call, "function") else {
        return CallShape::Opaque;
    };
    match callee.kind() {
        "identifier" if node_text(callee, source) == "service" => CallShape::Service {
            argument: call_arguments(call).into_iter().next(),
        },
        "identifier" => CallShape::Plain { callee },
        "member_expression" => {
            let Some(method) = child_by_field(callee, "property") else {
                return CallShape::Opaque;
            };
            let inner = child_by_field(callee, "object")
                .filter(|object| object.kind() == "call_expression");
            CallShape::Chained { inner, method }
        }
        _ => CallShape::Opaque,
    }
}

/// Render `call` as `"<key> = <description>"`, appending every string
/// argument it passes to `unknown_props`.
pub fn describe_call(
    key: &str,
    call: Node<'_>,
    shape: CallShape<'_>,
    source: &str,
    unknown_props: &mut Vec<String>,
) -> String {
    match shape {
        CallShape::Service { argument } => {
            let name = argument
                .filter(|arg| arg.kind() == "string")
                .map_or(key, |arg| string_value(arg, source));
            format!("{key} = service(\"{name}\")")
        }
        CallShape::Chained { inner, method } => {
            let mut rendered = Vec::new();
            let inner_name = match inner {
                Some(inner) => {
                    let args = call_arguments(inner);
                    collect_string_args(&args, source, &mut rendered, unknown_props);
                    callee_name(inner, source)
                }
                None => UNKNOWN.to_string(),
            };
            let outer_args = call_arguments(call);
            collect_string_args(&outer_args, source, &mut rendered, unknown_props);
            push_function_placeholder(&outer_args, &mut rendered);
            format!(
                "{key} = {inner_name}({}).{}()",
                rendered.join(", "),
                node_text(method, source)
            )
        }
        CallShape::Plain { callee } => {
            let mut rendered = Vec::new();
            let args = call_arguments(call);
            collect_string_args(&args, source, &mut rendered, unknown_props);
            push_function_placeholder(&args, &mut rendered);
            format!("{key} = {}({})", node_text(callee, source), rendered.join(", "))
        }
        CallShape::Opaque => {
            let mut rendered = Vec::new();
            let args = call_arguments(call);
            collect_string_args(&args, source, &mut rendered, unknown_props);
            push_function_placeholder(&args, &mut rendered);
            format!("{key} = {UNKNOWN}({})", rendered.join(", "))
        }
    }
}

/// Argument nodes of a call, empty for tagged templates.
fn call_arguments(call: Node<'_>) -> Vec<Node<'_>> {
    child_by_field(call, "arguments")
        .filter(|args| args.kind() == "arguments")
        .map(named_children)
        .unwrap_or_default()
}

fn callee_name(call: Node<'_>, source: &str) -> String {
    child_by_field(call, "function")
        .map_or_else(|| UNKNOWN.to_string(), |callee| node_text(callee, source).to_string())
}

fn collect_string_args(
    args: &[Node<'_>],
    source: &str,
    rendered: &mut Vec<String>,
    unknown_props: &mut Vec<String>,
) {
    for arg in args.iter().filter(|arg| arg.kind() == "string") {
        let value = string_value(*arg, source);
        unknown_props.push(value.to_string());
        rendered.push(format!("'{value}'"));
    }
}

fn push_function_placeholder(args: &[Node<'_>], rendered: &mut Vec<String>) {
    if args
        .last()
        .is_some_and(|last| matches!(last.kind(), "function_expression" | "function"))
    {
        rendered.push(FUNCTION_PLACEHOLDER.to_string());
    }
}
