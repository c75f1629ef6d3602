//! Hierarchical component graph for visualization.
//!
//! Shape: root → component → file → category → entry. Import and export
//! entries that point at a file of another scanned component carry that
//! file's path and a child naming the owning component, so renderers can
//! drill down.

use std::collections::HashMap;

use emberscope_syntax::FileMeta;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One file of a logical component, with its fact sheet when analysis succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFile {
    /// Path relative to the scanned root.
    pub name: String,
    pub path: String,
    pub meta: Option<FileMeta>,
}

/// Files sharing one component name, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFiles {
    pub name: String,
    pub paths: Vec<ComponentFile>,
}

impl ComponentFiles {
    /// Fact sheets of the files that were analyzed, in file order.
    pub fn sheets(&self) -> Vec<FileMeta> {
        self.paths.iter().filter_map(|file| file.meta.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub children: Vec<GraphNode>,
}

impl GraphNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            children: Vec::new(),
        }
    }

    fn branch(name: impl Into<String>, children: Vec<GraphNode>) -> Self {
        Self {
            name: name.into(),
            path: None,
            children,
        }
    }

    pub fn find(&self, name: &str) -> Option<&GraphNode> {
        self.children.iter().find(|child| child.name == name)
    }
}

/// Build the graph of `components`, wrapped in a single root named `root_name`.
pub fn build_graph(components: &[ComponentFiles], root_name: &str) -> Vec<GraphNode> {
    let owners: HashMap<&str, &str> = components
        .iter()
        .flat_map(|component| {
            component
                .paths
                .iter()
                .map(move |file| (file.path.as_str(), component.name.as_str()))
        })
        .collect();

    let children = components
        .iter()
        .map(|component| {
            let files = component
                .paths
                .iter()
                .map(|file| file_node(file, &owners))
                .collect();
            GraphNode::branch(component.name.as_str(), files)
        })
        .collect::<Vec<_>>();

    debug!(components = children.len(), "Built component graph");
    vec![GraphNode::branch(root_name, children)]
}

fn file_node(file: &ComponentFile, owners: &HashMap<&str, &str>) -> GraphNode {
    let mut node = GraphNode {
        name: file.name.clone(),
        path: Some(file.path.clone()),
        children: Vec::new(),
    };
    let Some(meta) = &file.meta else {
        return node;
    };

    for (category, entries) in meta.categories() {
        if !entries.is_empty() {
            node.children.push(GraphNode::branch(
                category,
                entries.into_iter().map(GraphNode::leaf).collect(),
            ));
        }
    }
    for (category, entries) in [("imports", meta.imports()), ("exports", meta.exports())] {
        if !entries.is_empty() {
            let leaves = entries
                .iter()
                .map(|entry| reference_node(entry, owners))
                .collect();
            node.children.push(GraphNode::branch(category, leaves));
        }
    }
    node
}

fn reference_node(entry: &str, owners: &HashMap<&str, &str>) -> GraphNode {
    match owners.get(entry) {
        Some(owner) => GraphNode {
            name: entry.to_string(),
            path: Some(entry.to_string()),
            children: vec![GraphNode::leaf(*owner)],
        },
        None => GraphNode::leaf(entry),
    }
}

/// Fill every owner annotation under `imports`/`exports` with a copy of the
/// owning component's file subtrees.
///
/// Copies come from the input graph, so spliced subtrees are never spliced
/// again and import cycles terminate after one level.
pub fn collapse_references(graph: &[GraphNode]) -> Vec<GraphNode> {
    let components: HashMap<&str, &GraphNode> = graph
        .iter()
        .flat_map(|root| root.children.iter())
        .map(|component| (component.name.as_str(), component))
        .collect();

    graph
        .iter()
        .map(|root| {
            let mut root = root.clone();
            for file in root.children.iter_mut().flat_map(|c| c.children.iter_mut()) {
                for category in file
                    .children
                    .iter_mut()
                    .filter(|c| c.name == "imports" || c.name == "exports")
                {
                    for reference in category.children.iter_mut().filter(|r| r.path.is_some()) {
                        for owner in &mut reference.children {
                            if let Some(component) = components.get(owner.name.as_str()) {
                                owner.children.clone_from(&component.children);
                            }
                        }
                    }
                }
            }
            root
        })
        .collect()
}
