//! `solve` subcommand.

use anchor_geom::{LayoutDirection, Margins, Side, adjust_for_margins, solve};
use serde::Serialize;
use tracing::debug;

use crate::{cli::SolveArgs, error::Result};

/// Solver output with diagnostics, printed under `--explain`.
#[derive(Debug, Serialize)]
struct Explained {
    /// Distance from the viewport's top edge.
    top: f64,
    /// Distance from the viewport's left edge.
    left: f64,
    /// `above` or `below`.
    side: &'static str,
    /// Whether the menu fits above the anchor.
    fits_above: bool,
    /// Whether the menu fits below the anchor.
    fits_below: bool,
}

/// Solve the placement described by `args` and render it as JSON.
pub fn render(args: &SolveArgs) -> Result<String> {
    let policy = args.policy();
    policy.validate()?;
    let direction = if args.rtl {
        LayoutDirection::Rtl
    } else {
        LayoutDirection::Ltr
    };
    let anchor = match args.anchor_style.as_ref().map(Margins::from_style) {
        Some(m) if !m.is_zero() => {
            debug!(?m, "removing anchor margins");
            adjust_for_margins(Some(args.anchor), Some(&m)).unwrap_or(args.anchor)
        }
        _ => args.anchor,
    };
    let s = solve(&anchor, args.menu, args.viewport(), &policy, direction);
    debug!(?policy, ?s, "solved");
    let out = if args.explain {
        serde_json::to_string_pretty(&Explained {
            top: s.position.top,
            left: s.position.left,
            side: match s.side {
                Side::Above => "above",
                Side::Below => "below",
            },
            fits_above: s.fits_above,
            fits_below: s.fits_below,
        })?
    } else {
        serde_json::to_string(&s.position)?
    };
    Ok(out)
}

/// Run the `solve` subcommand.
pub fn run(args: &SolveArgs) -> Result<()> {
    println!("{}", render(args)?);
    Ok(())
}
