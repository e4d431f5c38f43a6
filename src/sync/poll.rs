//! Periodic silent refresh.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::sheets::SheetSource;

use super::engine::{ConnectOutcome, SyncEngine};

/// Re-run a silent connect against the persisted URL every `interval`.
///
/// The first cycle runs immediately. The loop ends when `shutdown`
/// resolves, when `on_cycle` breaks, or when there is no persisted URL
/// any more (the connection was dropped). Returns the number of cycles run.
pub async fn poll<S, F>(
    engine: &SyncEngine<S>,
    interval: Duration,
    shutdown: F,
    mut on_cycle: impl FnMut(&ConnectOutcome) -> ControlFlow<()>,
) -> usize
where
    S: SheetSource,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);
    let mut cycles = 0;

    loop {
        tokio::select! {
            () = &mut shutdown => {
                tracing::info!(cycles, "polling stopped");
                break;
            }
            _ = ticker.tick() => {
                let Some(outcome) = engine.auto_reconnect().await else {
                    tracing::info!("no connection to refresh, polling stopped");
                    break;
                };
                cycles += 1;
                tracing::debug!(cycle = cycles, connected = outcome.is_connected(), "poll cycle");
                if on_cycle(&outcome).is_break() {
                    break;
                }
            }
        }
    }
    cycles
}
