//! Discovery start polling.
//!
//! Discovery services are often not ready when the package is created, so
//! each one is started from a ticker task that retries a bounded number of
//! times. The task owns only the discoverer handle and a cancellation token;
//! it never keeps the registry alive.

use bridge_traits::RendererDiscoverer;
use core_runtime::DiscoverySettings;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a start poller finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// `start()` succeeded on the given attempt (1-based).
    Started { attempts: u32 },
    /// The discoverer was released before it could start.
    Released,
    /// Every attempt failed.
    Exhausted,
    /// The token was cancelled.
    Cancelled,
}

/// Spawn a task that calls `start()` every `poll_interval`, the first time
/// immediately, until it succeeds, the discoverer is released, the attempt
/// budget is spent, or `cancel` fires.
pub fn spawn_start_poller(
    discoverer: Arc<dyn RendererDiscoverer>,
    settings: DiscoverySettings,
    cancel: CancellationToken,
    handle: &Handle,
) -> JoinHandle<PollOutcome> {
    handle.spawn(run_start_poller(discoverer, settings, cancel))
}

async fn run_start_poller(
    discoverer: Arc<dyn RendererDiscoverer>,
    settings: DiscoverySettings,
    cancel: CancellationToken,
) -> PollOutcome {
    let name = discoverer.name();
    let mut ticker = tokio::time::interval(settings.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempts = 0u32;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(discoverer = %name, attempts, "Discovery start polling cancelled");
                return PollOutcome::Cancelled;
            }
            _ = ticker.tick() => {}
        }

        if discoverer.is_released() {
            debug!(discoverer = %name, "Discoverer released before start");
            return PollOutcome::Released;
        }

        attempts += 1;
        if discoverer.start() {
            info!(discoverer = %name, attempts, "Renderer discovery started");
            return PollOutcome::Started { attempts };
        }

        if attempts >= settings.max_start_attempts {
            warn!(
                discoverer = %name,
                attempts,
                "Renderer discovery failed to start; giving up"
            );
            return PollOutcome::Exhausted;
        }

        debug!(discoverer = %name, attempts, "Renderer discovery not ready; retrying");
    }
}
