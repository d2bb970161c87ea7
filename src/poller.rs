//! The poll loop: fetch, validate, translate, notify, sleep, repeat.
//!
//! One cycle runs to completion before the next starts, and the cursor is
//! only touched from here.
use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::api::HomeworkSource;
use crate::error::CycleError;
use crate::notifier::{send_message, Messenger};
use crate::response::{check_response, parse_status};

/// How a successful cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    NoUpdate,
    Notified(String),
}

pub struct Poller {
    source: Box<dyn HomeworkSource>,
    messenger: Box<dyn Messenger>,
    chat_id: String,
    interval: Duration,
    cursor: i64,
}

fn now() -> i64 {
    Utc::now().timestamp()
}

impl Poller {
    /// `from_date` seeds the cursor; `None` starts from the current time.
    pub fn new(
        source: Box<dyn HomeworkSource>,
        messenger: Box<dyn Messenger>,
        chat_id: String,
        interval: Duration,
        from_date: Option<i64>,
    ) -> Self {
        Self {
            source,
            messenger,
            chat_id,
            interval,
            cursor: from_date.unwrap_or_else(now),
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the pipeline once. The cursor moves forward only when this
    /// returns `Ok`.
    #[instrument(skip_all, fields(cursor = self.cursor))]
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        let from_date = if self.cursor > 0 { self.cursor } else { now() };
        let payload = self.source.get_api_answer(from_date).await?;

        let outcome = match check_response(&payload)? {
            None => {
                info!("no new homework statuses");
                CycleOutcome::NoUpdate
            }
            Some(homework) => {
                let message = parse_status(&homework)?;
                send_message(self.messenger.as_ref(), &self.chat_id, &message).await?;
                CycleOutcome::Notified(message)
            }
        };

        self.advance(now());
        Ok(outcome)
    }

    /// Run one cycle and swallow its failure after logging it.
    pub async fn tick(&mut self) -> Option<CycleOutcome> {
        match self.run_cycle().await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                error!(kind = err.kind(), cursor = self.cursor, "operation failed: {err}");
                None
            }
        }
    }

    /// Poll forever, sleeping `interval` after every cycle, until `shutdown`
    /// resolves. Shutdown is only observed between cycles.
    ///
    /// `shutdown` is polled once before the first cycle so that listeners it
    /// installs on first poll (such as `tokio::signal::ctrl_c`) are in place
    /// while that cycle runs.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("shutdown requested before first cycle");
                return;
            }
            _ = std::future::ready(()) => {}
        }

        info!(interval_secs = self.interval.as_secs(), "starting poll loop");
        loop {
            self.tick().await;
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, leaving poll loop");
                    return;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    fn advance(&mut self, to: i64) {
        if to > self.cursor {
            debug!(from = self.cursor, to, "advancing cursor");
            self.cursor = to;
        }
    }
}
