use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

/// Collapses a stream of values into the last one seen after a quiet period.
///
/// Every [`push`](Debouncer::push) restarts the timer. Only the most recent
/// pending value is ever emitted; intermediate values are dropped.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the timer task and returns the handle with the receiver of settled values.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input, rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();

        tokio::spawn(run(delay, rx, settled_tx));

        (Self { input }, settled_rx)
    }

    pub fn push(&self, value: T) -> anyhow::Result<()> {
        self.input
            .send(value)
            .map_err(|_| anyhow::anyhow!("debouncer task has stopped"))
    }
}

async fn run<T>(
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<T>,
    settled: mpsc::UnboundedSender<T>,
) {
    while let Some(first) = rx.recv().await {
        let mut pending = first;
        let mut deadline = Instant::now() + delay;

        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(value) => {
                        trace!("Debounce timer restarted");
                        pending = value;
                        deadline = Instant::now() + delay;
                    }
                    // All handles dropped; the pending value is abandoned.
                    None => return,
                },
                _ = sleep_until(deadline) => {
                    if settled.send(pending).is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }

    debug!("Debouncer input closed");
}
