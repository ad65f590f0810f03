//! Context command implementation
//!
//! Boots the registry the way a server process started in the current
//! directory would, and prints the detected deployment context together with
//! the template flags.

use std::path::PathBuf;

use console::Style;
use serde::Serialize;

use crate::cli::ContextArgs;
use crate::commands::helpers::{open_project, resolve_root_path, yes_no};
use crate::context::DetectionRule;
use crate::error::Result;
use crate::runtime::HubRuntime;

#[derive(Serialize)]
struct ContextReport {
    context: String,
    rule: Option<DetectionRule>,
    flags: serde_json::Value,
}

/// Run context command
pub fn run(root: Option<PathBuf>, args: ContextArgs) -> Result<()> {
    let project = open_project(root)?;
    let process_dir = resolve_root_path(None)?;
    let runtime = HubRuntime::boot_with(&project.registry, &project.config, &process_dir);
    let template = runtime.template_context();

    if args.json {
        let report = ContextReport {
            context: runtime.deployment().to_string(),
            rule: runtime.detection().map(|d| d.rule),
            flags: template.to_json()?,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let label = Style::new().bold();
    let flags = template.flags();
    println!(
        "{} {}",
        label.apply_to("Deployment context:"),
        Style::new().cyan().bold().apply_to(runtime.deployment())
    );
    if let Some(detection) = runtime.detection() {
        println!("{} {}", label.apply_to("Decided by:"), detection.rule);
    }
    println!("{} {}", label.apply_to("Base template:"), flags.base_template);
    println!("{} {}", label.apply_to("Chrome:"), flags.chrome);

    println!();
    println!("{}", label.apply_to("Modules:"));
    for card in &flags.modules {
        println!(
            "  {:<20} active={:<4} available={:<4} {}",
            card.key,
            yes_no(card.active),
            yes_no(card.available),
            card.url.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
