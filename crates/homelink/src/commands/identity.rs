//! Identity command handler.

use serde::Serialize;

use homelink_core::{AccessoryId, IdentityResolver, MacAddress, Role};

use crate::cli::{GlobalOpts, IdentityArgs};
use crate::error::CliError;
use crate::output;

use super::load_config;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentityView {
    device_id: String,
    role: Role,
    debug: bool,
    identity: AccessoryId,
    mac: MacAddress,
    artifact: String,
}

fn detail(v: &IdentityView) -> String {
    [
        format!("Device:    {}", v.device_id),
        format!("Role:      {}", v.role),
        format!("Debug:     {}", v.debug),
        format!("Identity:  {}", v.identity),
        format!("MAC:       {}", v.mac),
        format!("Artifact:  {}", v.artifact),
    ]
    .join("\n")
}

pub fn handle(args: &IdentityArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (_, mut config) = load_config(global)?;
    config.debug |= args.debug;
    let identity =
        IdentityResolver::new(config.identity_prefix()).resolve(&args.device_id, args.role);
    let mac = MacAddress::derive_from(&identity);

    let view = IdentityView {
        device_id: args.device_id.clone(),
        role: args.role,
        debug: config.debug,
        identity,
        artifact: format!("AccessoryInfo.{}.json", mac.compact_upper()),
        mac,
    };

    let out = output::render_single(&global.output, &view, detail, |v| v.identity.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
