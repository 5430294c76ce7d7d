//! Devices command handler.
//!
//! Lists every device a pass would see, with the decision the engine made
//! for it. Never writes the registry.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use homelink_api::RemoteDevice;
use homelink_core::{
    AccessoryBinding, AccessoryId, AccessoryVariant, HiddenDevice, PassReport, Platform,
};

use crate::cli::{DevicesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::registry::FileRegistry;

use super::{load_config, open_directory};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceEntry {
    location: String,
    device_id: String,
    name: String,
    device_type: String,
    variant: Option<AccessoryVariant>,
    status: String,
    identity: AccessoryId,
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Variant")]
    variant: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Identity")]
    identity: String,
}

impl From<&DeviceEntry> for DeviceRow {
    fn from(e: &DeviceEntry) -> Self {
        Self {
            location: e.location.clone(),
            name: e.name.clone(),
            device_type: e.device_type.clone(),
            variant: e.variant.map_or_else(|| "-".into(), |v| v.to_string()),
            status: e.status.clone(),
            identity: e.identity.to_string(),
        }
    }
}

// ── Entry assembly ──────────────────────────────────────────────────

struct EntryBuilder {
    location_names: HashMap<String, String>,
}

impl EntryBuilder {
    fn new(report: &PassReport) -> Self {
        Self {
            location_names: report
                .locations
                .iter()
                .map(|l| (l.id.clone(), l.name.clone()))
                .collect(),
        }
    }

    fn entry(
        &self,
        device: &RemoteDevice,
        variant: Option<AccessoryVariant>,
        identity: AccessoryId,
        status: String,
    ) -> DeviceEntry {
        DeviceEntry {
            location: self
                .location_names
                .get(&device.location_id)
                .cloned()
                .unwrap_or_else(|| device.location_id.clone()),
            device_id: device.id.clone(),
            name: device.name.clone(),
            device_type: device.device_type.to_string(),
            variant,
            status,
            identity,
        }
    }

    fn bound(&self, binding: &AccessoryBinding, status: &str) -> DeviceEntry {
        self.entry(
            &binding.device,
            Some(binding.variant),
            binding.accessory.id,
            status.into(),
        )
    }

    fn hidden(&self, hidden: &HiddenDevice) -> DeviceEntry {
        self.entry(
            &hidden.device,
            hidden.variant,
            hidden.id,
            format!("hidden ({})", hidden.reason),
        )
    }
}

fn entries(report: &PassReport) -> Vec<DeviceEntry> {
    let builder = EntryBuilder::new(report);
    let plan = &report.plan;

    let mut out: Vec<DeviceEntry> = plan
        .reuse
        .iter()
        .map(|b| builder.bound(b, "registered"))
        .chain(plan.create.iter().map(|b| builder.bound(b, "new")))
        .chain(plan.external.iter().map(|b| builder.bound(b, "external")))
        .chain(report.hidden.iter().map(|h| builder.hidden(h)))
        .chain(plan.duplicates.iter().map(|h| builder.hidden(h)))
        .collect();
    out.sort_by(|a, b| a.location.cmp(&b.location).then_with(|| a.name.cmp(&b.name)));
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (config_path, config) = load_config(global)?;
    let directory = open_directory(&args.directory, &config).await?;

    let registry = match args.registry {
        Some(path) => FileRegistry::open(&path, None).await?,
        None => FileRegistry::detached(),
    };
    let cached = registry.accessories().await;
    let platform = Platform::new(config, directory, Arc::new(registry));
    for accessory in cached {
        platform.configure_accessory(accessory).await;
    }

    let report = platform
        .plan_pass()
        .await
        .map_err(|e| CliError::from_core(e, &config_path))?;

    let data = entries(&report);
    let out = output::render_list(
        &global.output,
        &data,
        |e| DeviceRow::from(e),
        |e| e.identity.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
