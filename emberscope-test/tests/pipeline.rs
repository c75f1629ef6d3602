use emberscope_core::config::{CrossReferencePolicy, ExplorerConfig};
use emberscope_core::discovery::discover_files;
use emberscope_core::graph::GraphNode;
use emberscope_test::TestProject;

// ── Discovery and grouping ───────────────────────────────────────

#[tokio::test]
async fn ember_app_groups_components_in_discovery_order() {
    let project = TestProject::ember_app();
    let explorer = project.scan().await;

    assert!(explorer.found());
    let names: Vec<_> = explorer.components().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["x-button", "broken", "user-card", "pods/avatar-image"]);

    let x_button = &explorer.components()[0];
    let files: Vec<_> = x_button.paths.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        files,
        vec![
            "addon/components/x-button.js",
            "addon/templates/components/x-button.hbs",
            "app/components/x-button.js",
        ]
    );
}

#[tokio::test]
async fn ignored_entries_never_reach_analysis() {
    let project = TestProject::ember_app();
    let listing = discover_files(project.path(), &ExplorerConfig::default().discovery).unwrap();

    assert!(listing.found);
    assert!(listing.files.iter().all(|f| !f.contains("node_modules")));
    assert!(listing.files.iter().all(|f| !f.ends_with(".css")));
    assert!(listing.files.contains(&project.file("app/routes/index.js")));
    assert_eq!(listing.files.len(), 8);
}

#[tokio::test]
async fn missing_root_scans_to_nothing() {
    let project = TestProject::empty();
    let missing = project.path().join("nope");
    let explorer = emberscope_core::explorer::Explorer::scan(
        &missing,
        ExplorerConfig::default(),
        &emberscope_core::progress::NoopReporter,
    )
    .await
    .unwrap();
    assert!(!explorer.found());
    assert!(explorer.components().is_empty());
}

// ── Partial failure ──────────────────────────────────────────────

#[tokio::test]
async fn unparsable_file_is_reported_and_kept_without_facts() {
    let project = TestProject::ember_app();
    let explorer = project.scan().await;

    assert_eq!(explorer.errors().len(), 1);
    let (path, error) = &explorer.errors()[0];
    assert_eq!(path, &project.file("app/components/broken.hbs"));
    assert!(error.is_syntax());

    let broken = explorer.component_information("broken").unwrap();
    assert_eq!(broken.api.tag_name, "div");
    assert!(broken.js_props.is_empty());
}

// ── Aggregation ──────────────────────────────────────────────────

#[tokio::test]
async fn classic_component_merges_script_and_template() {
    let project = TestProject::ember_app();
    let explorer = project.scan().await;
    let info = explorer.component_information("user-card").unwrap();

    assert_eq!(info.name, "user-card");
    assert_eq!(info.api.tag_name, "article");
    assert_eq!(info.api.class_names, vec!["user-card"]);
    assert_eq!(info.api.actions.len(), 1);
    assert_eq!(info.api.actions[0].name, "select");
    assert_eq!(info.hbs_components, vec!["AvatarImage"]);
    assert_eq!(info.hbs_helpers, vec!["if", "t"]);
    assert!(info.js_props.contains(&"showAvatar = undefined".to_string()));
    assert!(info.js_props.contains(&"user = null".to_string()));
    assert!(info.js_props.contains(&"layout = layout".to_string()));
    assert_eq!(info.js_props[0], "showAvatar = undefined");
    assert_eq!(info.js_computeds.len(), 1);
    assert!(info.js_computeds[0].starts_with("fullName = "));
    assert!(info.js_imports.contains(&"@ember/component".to_string()));
}

#[tokio::test]
async fn addon_and_app_files_merge_into_one_component() {
    let project = TestProject::ember_app();
    let explorer = project.scan().await;
    let info = explorer.component_information("x-button").unwrap();

    assert_eq!(info.api.tag_name, "button");
    assert_eq!(info.api.attribute_bindings, vec!["disabled"]);
    assert!(info.js_props.contains(&"disabled = false".to_string()));
    assert!(info.js_imports.contains(&"@ember/component".to_string()));
    assert_eq!(info.hbs_props, vec!["model.title"]);
}

#[tokio::test]
async fn annotate_policy_from_config_file() {
    let project = TestProject::ember_app();
    project.write(
        "emberscope.toml",
        "[aggregate]\ncross_reference = \"annotate\"\n",
    );
    let explorer = project.scan().await;
    assert_eq!(
        explorer.config().aggregate.cross_reference,
        CrossReferencePolicy::Annotate
    );

    let info = explorer.component_information("x-button").unwrap();
    assert_eq!(info.hbs_props, vec!["model.title as used in template"]);
    assert!(
        info.js_props
            .contains(&"model = undefined // (used in template)".to_string())
    );
}

#[tokio::test]
async fn unknown_component_has_no_information() {
    let project = TestProject::ember_app();
    let explorer = project.scan().await;
    assert!(explorer.component_information("user-list").is_none());
}

// ── Graph ────────────────────────────────────────────────────────

fn component<'a>(graph: &'a [GraphNode], name: &str) -> &'a GraphNode {
    graph[0].find(name).unwrap()
}

#[tokio::test]
async fn graph_links_imports_to_their_owner() {
    let project = TestProject::ember_app();
    let graph = project.scan().await.graph();

    assert_eq!(graph.len(), 1);
    assert_eq!(graph[0].name, "<ROOT>");
    assert_eq!(graph[0].children.len(), 4);

    let script = component(&graph, "user-card")
        .find("app/components/user-card.js")
        .unwrap();
    assert_eq!(
        script.path.as_deref(),
        Some(project.file("app/components/user-card.js").as_str())
    );
    let imports = script.find("imports").unwrap();
    let layout = imports
        .find(&project.file("app/templates/components/user-card.hbs"))
        .unwrap();
    assert_eq!(layout.children.len(), 1);
    assert_eq!(layout.children[0].name, "user-card");
    assert!(layout.children[0].children.is_empty());

    let external = imports.find("@ember/component").unwrap();
    assert!(external.path.is_none());
}

#[tokio::test]
async fn collapsed_graph_splices_owner_files() {
    let project = TestProject::ember_app();
    project.write(
        "emberscope.toml",
        "[graph]\nroot_name = \"app\"\ncollapse_references = true\n",
    );
    let graph = project.scan().await.graph();
    assert_eq!(graph[0].name, "app");

    let owner = &component(&graph, "user-card")
        .find("app/components/user-card.js")
        .unwrap()
        .find("imports")
        .unwrap()
        .find(&project.file("app/templates/components/user-card.hbs"))
        .unwrap()
        .children[0];
    let spliced: Vec<_> = owner.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        spliced,
        vec![
            "app/components/user-card.js",
            "app/templates/components/user-card.hbs",
        ]
    );
}

#[tokio::test]
async fn graph_serializes_without_empty_paths() {
    let project = TestProject::ember_app();
    let graph = project.scan().await.graph();
    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(json[0]["name"], "<ROOT>");
    assert!(json[0].get("path").is_none());
}
