use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::json;

use emberscope_core::aggregate::ComponentInformation;
use emberscope_core::explorer::Explorer;

use super::Outcome;

#[derive(Args, Debug)]
pub struct ComponentArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Component to show; lists every component when omitted
    #[arg(long)]
    pub name: Option<String>,

    /// Output format: text, json
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

pub async fn run(args: ComponentArgs, quiet: bool) -> anyhow::Result<Outcome> {
    let dir = super::resolve_dir(&args.dir)?;
    let config = super::load_config(&dir)?;
    let explorer = Explorer::scan(&dir, config, &super::reporter(quiet))
        .await
        .context("Failed to scan project")?;
    let outcome = Outcome::from_failures(explorer.errors().len());

    let Some(name) = &args.name else {
        let names: Vec<_> = explorer.components().iter().map(|c| c.name.as_str()).collect();
        if args.format == "json" {
            super::print_json(&json!(names))?;
        } else {
            for name in names {
                println!("{name}");
            }
        }
        return Ok(outcome);
    };

    let info = explorer
        .component_information(name)
        .with_context(|| format!("No component named {name} in {}", dir.display()))?;
    if args.format == "json" {
        super::print_json(&serde_json::to_value(&info)?)?;
    } else {
        print!("{}", render_text(&info));
    }
    Ok(outcome)
}

fn render_text(info: &ComponentInformation) -> String {
    let mut out = format!("Component {}\n", info.name);
    out.push_str(&format!("  tagName: {}\n", info.api.tag_name));

    let actions: Vec<String> = info.api.actions.iter().map(ToString::to_string).collect();
    let sections: [(&str, &[String]); 13] = [
        ("Props", &info.js_props),
        ("Computeds", &info.js_computeds),
        ("Functions", &info.js_func),
        ("Actions", &actions),
        ("Imports", &info.js_imports),
        ("Template references", &info.hbs_props),
        ("Components", &info.hbs_components),
        ("Helpers", &info.hbs_helpers),
        ("Class names", &info.api.class_names),
        ("Attribute bindings", &info.api.attribute_bindings),
        ("Class name bindings", &info.api.class_name_bindings),
        ("Concatenated properties", &info.api.concatenated_properties),
        ("Positional params", &info.api.positional_params),
    ];
    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("\n  {title} ({}):\n", entries.len()));
        for entry in entries {
            out.push_str(&format!("    {entry}\n"));
        }
    }
    if !info.api.merged_properties.is_empty() {
        out.push_str(&format!(
            "\n  Merged properties: {}\n",
            info.api.merged_properties.join(", ")
        ));
    }
    out
}
