use tree_sitter::Node;

/// Extract the source text for a tree-sitter node.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

/// Find a child by field name.
pub fn child_by_field<'a>(node: Node<'a>, field: &str) -> Option<Node<'a>> {
    node.child_by_field_name(field)
}

/// Named children of a node, skipping comments.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Whether the node has an anonymous child token of the given kind.
pub fn has_token(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == kind)
}

/// The value of a string literal node, without its quotes.
pub fn string_value<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    let text = node_text(node, source);
    if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// The name of a property key: identifiers as written, string keys unquoted.
pub fn key_name(node: Node<'_>, source: &str) -> String {
    match node.kind() {
        "string" => string_value(node, source).to_string(),
        _ => node_text(node, source).to_string(),
    }
}

/// Render a formal parameter list as the bare names it binds.
pub fn param_names(params: Node<'_>, source: &str) -> Vec<String> {
    named_children(params)
        .into_iter()
        .map(|param| param_name(param, source))
        .collect()
}

fn param_name(param: Node<'_>, source: &str) -> String {
    match param.kind() {
        "identifier" => node_text(param, source).to_string(),
        "assignment_pattern" => child_by_field(param, "left")
            .map(|left| param_name(left, source))
            .unwrap_or_default(),
        "rest_pattern" => named_children(param)
            .first()
            .map(|inner| format!("...{}", param_name(*inner, source)))
            .unwrap_or_default(),
        _ => node_text(param, source).to_string(),
    }
}

/// First ERROR or MISSING node in the tree, depth first.
pub fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}
