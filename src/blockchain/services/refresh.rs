// src/blockchain/services/refresh.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::blockchain::{models::BalanceReport, services::balance::BalanceService};

/// Re-fetches a balance every `every`, starting immediately, and publishes
/// each report on the returned channel.
///
/// Each tick runs its fetch as an independent task, so a slow fetch never
/// delays the next tick. Overlapping fetches may finish out of order; the
/// channel keeps whichever report arrived last. The loop stops once every
/// receiver is dropped.
pub fn spawn_refresh(
    service: BalanceService,
    network: String,
    account: String,
    every: Duration,
) -> (watch::Receiver<Option<BalanceReport>>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(None);
    let tx = Arc::new(tx);

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tx.closed() => {
                    debug!("Stopping balance refresh for {} on {}", account, network);
                    break;
                }
                _ = ticker.tick() => {
                    debug!("Refreshing balance for {} on {}", account, network);
                    let service = service.clone();
                    let network = network.clone();
                    let account = account.clone();
                    let tx = Arc::clone(&tx);
                    tokio::spawn(async move {
                        match service.fetch_balance(&network, &account).await {
                            Ok(report) => {
                                tx.send_replace(Some(report));
                            }
                            Err(e) => warn!("Balance refresh for {} rejected: {}", network, e),
                        }
                    });
                }
            }
        }
    });

    (rx, handle)
}
