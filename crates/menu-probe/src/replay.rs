//! `replay` subcommand: run recorded readings through the stabilizer.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use anchor_geom::Rect;
use anchor_measure::{MeasureTarget, NodeHandle, Stabilizer, Strategy, TokioFrameClock};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::info;

use crate::{cli::ReplayArgs, error::Result, request::read};

/// Target that hands out recorded readings in order, repeating the last.
struct ReplayTarget {
    /// Readings not yet handed out.
    samples: Mutex<VecDeque<Option<Rect>>>,
    /// Whether the element resolves.
    mounted: bool,
    /// Readings taken.
    reads: AtomicUsize,
}

#[async_trait]
impl MeasureTarget for ReplayTarget {
    fn resolve(&self) -> Option<NodeHandle> {
        self.mounted.then_some(0)
    }

    async fn measure_in_window(&self, _node: NodeHandle) -> Option<Rect> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let mut samples = self.samples.lock();
        if samples.len() > 1 {
            samples.pop_front().flatten()
        } else {
            samples.front().copied().flatten()
        }
    }
}

/// Replay result.
#[derive(Debug, Serialize)]
struct Outcome {
    /// Strategy used.
    strategy: Strategy,
    /// Attempt budget.
    tries: u32,
    /// Accepted rectangle, if any.
    rect: Option<Rect>,
    /// Readings consumed.
    reads: usize,
}

/// Replay `samples` and render the outcome as JSON.
pub fn render(samples: Vec<Option<Rect>>, args: &ReplayArgs) -> Result<String> {
    let strategy = args.strategy();
    let target = Arc::new(ReplayTarget {
        samples: Mutex::new(samples.into()),
        mounted: !args.unmounted,
        reads: AtomicUsize::new(0),
    });
    let stabilizer = Stabilizer::new(Arc::new(TokioFrameClock::new(
        Duration::ZERO,
        Duration::ZERO,
    )));

    let rt = Builder::new_current_thread().enable_all().build()?;
    let rect = rt.block_on(stabilizer.measure(target.as_ref(), strategy, args.tries));
    let reads = target.reads.load(Ordering::Relaxed);
    info!(%strategy, reads, ?rect, "replay finished");

    Ok(serde_json::to_string_pretty(&Outcome {
        strategy,
        tries: args.tries,
        rect,
        reads,
    })?)
}

/// Run the `replay` subcommand.
pub fn run(args: &ReplayArgs) -> Result<()> {
    let samples: Vec<Option<Rect>> = serde_json::from_str(&read(&args.samples)?)?;
    println!("{}", render(samples, args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(strategy: &str, tries: u32, unmounted: bool) -> ReplayArgs {
        ReplayArgs {
            samples: PathBuf::from("unused.json"),
            strategy: strategy.to_string(),
            tries,
            unmounted,
        }
    }

    fn outcome(json: &str) -> serde_json::Value {
        serde_json::from_str(json).expect("json")
    }

    #[test]
    fn stable_converges_past_degenerate_reading() {
        let samples = vec![
            Some(Rect::new(0.0, 0.0, 80.0, 40.0)),
            Some(Rect::new(120.0, 340.0, 80.0, 40.0)),
        ];
        let v = outcome(&render(samples, &args("stable", 8, false)).expect("replay"));
        assert_eq!(v["rect"]["x"], 120.0);
        assert_eq!(v["reads"], 2);
    }

    #[test]
    fn fast_takes_first_reading() {
        let samples = vec![Some(Rect::zero()), Some(Rect::new(1.0, 1.0, 1.0, 1.0))];
        let v = outcome(&render(samples, &args("fast", 8, false)).expect("replay"));
        assert_eq!(v["rect"]["x"], 0.0);
        assert_eq!(v["reads"], 1);
    }

    #[test]
    fn unmounted_yields_null() {
        let v = outcome(&render(vec![None], &args("stable", 8, true)).expect("replay"));
        assert!(v["rect"].is_null());
        assert_eq!(v["reads"], 0);
    }
}
