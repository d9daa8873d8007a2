//! Command-line interface definitions for menu-probe.

use std::path::PathBuf;

use anchor_geom::{Align, MenuSize, Placement, PlacementPolicy, Rect, StyleMargins, Viewport};
use anchor_measure::{DEFAULT_TRIES, Strategy};
use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `menu-probe` binary.
#[derive(Parser, Debug)]
#[command(
    name = "menu-probe",
    about = "Solve, replay, and inspect anchored menu placements",
    version
)]
pub struct Cli {
    /// Logging controls shared across workspace binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Which probe to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level probe commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a menu position and print it as JSON.
    Solve(SolveArgs),
    /// Feed scripted samples through the measurement stabilizer.
    Replay(ReplayArgs),
    /// Parse an open request and print the resolved settings.
    Request(RequestArgs),
}

/// Arguments for the `solve` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    /// Anchor rectangle in viewport coordinates.
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_rect)]
    pub anchor: Rect,

    /// Margin declarations on the anchored element, as style JSON,
    /// e.g. '{"marginVertical":4}'. Removed from the anchor before solving.
    #[arg(long, value_name = "JSON", value_parser = parse_style)]
    pub anchor_style: Option<StyleMargins>,

    /// Menu content size; omit while the size is unknown.
    #[arg(long, value_name = "W,H", value_parser = parse_size)]
    pub menu: Option<MenuSize>,

    /// Viewport size.
    #[arg(long, value_name = "W,H", value_parser = parse_size, default_value = "360,760")]
    pub viewport: MenuSize,

    /// Preferred side: auto, top or bottom. Unknown values mean auto.
    #[arg(long, default_value = "auto")]
    pub placement: String,

    /// Horizontal alignment: start, center or end.
    #[arg(long, default_value = "start")]
    pub align: String,

    /// Gap between anchor and menu.
    #[arg(long, default_value_t = 8.0, allow_negative_numbers = true)]
    pub offset: f64,

    /// Minimum distance from the viewport edges.
    #[arg(long, default_value_t = 8.0, allow_negative_numbers = true)]
    pub margin: f64,

    /// Lay out right-to-left.
    #[arg(long)]
    pub rtl: bool,

    /// Do not swap start/end alignment in right-to-left layouts.
    #[arg(long)]
    pub no_rtl_aware: bool,

    /// Include the chosen side and fit diagnostics in the output.
    #[arg(long)]
    pub explain: bool,
}

impl SolveArgs {
    /// Placement policy described by the flags.
    pub fn policy(&self) -> PlacementPolicy {
        PlacementPolicy::default()
            .placement(Placement::parse(&self.placement))
            .align(Align::parse(&self.align))
            .offset(self.offset)
            .margin(self.margin)
            .rtl_aware(!self.no_rtl_aware)
    }

    /// Viewport described by the flags.
    pub fn viewport(&self) -> Viewport {
        Viewport::from(self.viewport)
    }
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// JSON file holding an array of samples; each entry is a rectangle
    /// object or `null` for a failed reading.
    #[arg(value_name = "PATH")]
    pub samples: PathBuf,

    /// Measurement strategy: stable or fast.
    #[arg(long, default_value = "stable")]
    pub strategy: String,

    /// Stable-mode attempt budget.
    #[arg(long, default_value_t = DEFAULT_TRIES)]
    pub tries: u32,

    /// Simulate an element that is no longer mounted.
    #[arg(long)]
    pub unmounted: bool,
}

impl ReplayArgs {
    /// Strategy named by the flags.
    pub fn strategy(&self) -> Strategy {
        Strategy::parse(&self.strategy)
    }
}

/// Arguments for the `request` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// JSON file holding an open request.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Split a comma-separated list of exactly `n` numbers.
fn parse_numbers(s: &str, n: usize) -> Result<Vec<f64>, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number {p:?}: {e}"))
        })
        .collect::<Result<_, _>>()?;
    if parts.len() != n {
        return Err(format!("expected {n} comma-separated numbers, got {}", parts.len()));
    }
    Ok(parts)
}

/// Parse `X,Y,W,H`.
pub fn parse_rect(s: &str) -> Result<Rect, String> {
    let v = parse_numbers(s, 4)?;
    Ok(Rect::new(v[0], v[1], v[2], v[3]))
}

/// Parse `W,H`.
pub fn parse_size(s: &str) -> Result<MenuSize, String> {
    let v = parse_numbers(s, 2)?;
    Ok(MenuSize::new(v[0], v[1]))
}

/// Parse margin style JSON.
pub fn parse_style(s: &str) -> Result<StyleMargins, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid style: {e}"))
}
