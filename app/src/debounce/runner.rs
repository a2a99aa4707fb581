use tokio::time::{Instant, MissedTickBehavior};

use crate::core::port::{StateChangeSource, StatePublisher};

use super::RawSensorDebouncer;

/// Feeds changes and sweeps into the debouncer one at a time.
pub struct DebounceRunner<P, S> {
    debouncer: RawSensorDebouncer<P>,
    changes: S,
}

impl<P, S> DebounceRunner<P, S>
where
    P: StatePublisher,
    S: StateChangeSource,
{
    pub fn new(debouncer: RawSensorDebouncer<P>, changes: S) -> Self {
        Self { debouncer, changes }
    }

    pub async fn run(mut self) {
        let period: std::time::Duration = self.debouncer.timeout().into();
        let mut sweep = tokio::time::interval_at(Instant::now() + period, period);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut listening = true;

        loop {
            tokio::select! {
                change = self.changes.next_change(), if listening => match change {
                    Some(change) => self.debouncer.on_change(&change).await,
                    None => {
                        tracing::error!("State change source closed, derived sensors will only be switched off from now on");
                        listening = false;
                    }
                },

                _ = sweep.tick() => self.debouncer.sweep().await,
            }
        }
    }
}
