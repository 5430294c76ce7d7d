//! Reconcile command handler.
//!
//! Replays the registry file into a [`Platform`], runs one pass against
//! the directory snapshot, and writes the registry back through the
//! batched host calls. `--dry-run` stops after planning.

use std::sync::Arc;

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};
use tracing::debug;

use homelink_config::ConfigFile;
use homelink_core::{AccessoryBinding, CredentialStore, PassReport, Platform, PlatformAccessory};

use crate::cli::{GlobalOpts, ReconcileArgs};
use crate::error::CliError;
use crate::output;
use crate::registry::FileRegistry;

use super::{load_config, open_directory};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ActionRow {
    #[tabled(rename = "Action")]
    action: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Variant")]
    variant: String,
    #[tabled(rename = "Identity")]
    identity: String,
}

impl ActionRow {
    fn bound(action: &'static str, binding: &AccessoryBinding) -> Self {
        Self {
            action,
            name: binding.accessory.display_name.clone(),
            variant: binding.variant.to_string(),
            identity: binding.accessory.id.to_string(),
        }
    }

    fn cached(action: &'static str, accessory: &PlatformAccessory) -> Self {
        Self {
            action,
            name: accessory.display_name.clone(),
            variant: "-".into(),
            identity: accessory.id.to_string(),
        }
    }
}

fn action_rows(report: &PassReport) -> Vec<ActionRow> {
    let plan = &report.plan;
    plan.create
        .iter()
        .map(|b| ActionRow::bound("add", b))
        .chain(plan.external.iter().map(|b| ActionRow::bound("publish", b)))
        .chain(plan.deregister.iter().map(|a| ActionRow::cached("unregister", a)))
        .chain(plan.stale.iter().map(|a| ActionRow::cached("remove", a)))
        .chain(plan.reuse.iter().map(|b| ActionRow::bound("keep", b)))
        .collect()
}

// ── Summary ─────────────────────────────────────────────────────────

fn summary(report: &PassReport, color: bool) -> String {
    let plan = &report.plan;
    let verb = if report.applied { "Applied" } else { "Planned" };
    let counts = format!(
        "{} added, {} kept, {} published, {} unregistered, {} removed across {} location(s)",
        plan.create.len(),
        plan.reuse.len(),
        plan.external.len(),
        plan.deregister.len(),
        plan.stale.len(),
        report.locations.len(),
    );
    let hidden = report.hidden.len() + plan.duplicates.len();

    if color {
        let mut line = format!("{} {counts}", format!("{verb}:").bold().green());
        if hidden > 0 {
            line.push_str(&format!(", {}", format!("{hidden} hidden").yellow()));
        }
        line
    } else if hidden > 0 {
        format!("{verb}: {counts}, {hidden} hidden")
    } else {
        format!("{verb}: {counts}")
    }
}

fn detail(report: &PassReport, color: bool) -> String {
    let rows = action_rows(report);
    if rows.is_empty() {
        return summary(report, color);
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    format!("{table}\n{}", summary(report, color))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ReconcileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (config_path, config) = load_config(global)?;
    let directory = open_directory(&args.directory, &config).await?;
    let registry = Arc::new(FileRegistry::open(&args.registry, args.storage).await?);

    let platform = Platform::new(config, directory, registry.clone());
    for accessory in registry.accessories().await {
        platform.configure_accessory(accessory).await;
    }

    let result = if args.dry_run {
        platform.plan_pass().await
    } else {
        let store: Arc<dyn CredentialStore> = Arc::new(ConfigFile::new(&config_path));
        platform.did_finish_launching(Some(store)).await
    };
    platform.shutdown().await;
    let report = result.map_err(|e| CliError::from_core(e, &config_path))?;

    debug!(
        applied = report.applied,
        registry = registry.accessories().await.len(),
        published = registry.published().await.len(),
        "reconcile finished"
    );

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| detail(r, color),
        |r| {
            r.bindings()
                .map(|b| b.accessory.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
