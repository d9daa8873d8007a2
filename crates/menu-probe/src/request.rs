//! `request` subcommand.

use std::{fs, path::Path};

use anchor_geom::PlacementPolicy;
use anchor_measure::Strategy;
use anchored_menu::{HostKind, OpenMenuOptions};
use serde::Serialize;
use tracing::warn;

use crate::{
    cli::RequestArgs,
    error::{Error, Result},
};

/// Settings a provider and host would act on for a request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolved {
    /// Anchor id.
    id: String,
    /// Solver policy.
    policy: PlacementPolicy,
    /// Host layer after fallback.
    host: Option<HostKind>,
    /// Measurement strategy.
    measurement: Strategy,
    /// Stable-mode attempt budget.
    measurement_tries: u32,
    /// Whether the open skips the one-frame deferral.
    immediate: bool,
}

/// Parse, validate and resolve the request in `json`.
pub fn resolve(json: &str) -> Result<String> {
    let opts = OpenMenuOptions::from_json(json)?;
    opts.validate()?;
    let host = opts.host.as_deref().map(|name| {
        HostKind::parse(name).unwrap_or_else(|| {
            warn!(host = name, "unknown host; falling back to view");
            HostKind::View
        })
    });
    Ok(serde_json::to_string_pretty(&Resolved {
        policy: opts.policy(),
        host,
        measurement: opts.measurement,
        measurement_tries: opts.measurement_tries,
        immediate: opts.immediate,
        id: opts.id,
    })?)
}

/// Read a file, keeping the path in the error.
pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the `request` subcommand.
pub fn run(args: &RequestArgs) -> Result<()> {
    println!("{}", resolve(&read(&args.path)?)?);
    Ok(())
}
