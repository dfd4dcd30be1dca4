//! Optional configuration for channel implementations.
//!
//! Nothing in the core reads these values. They give channel authors a common
//! shape for retry, batching, scheduling, and cancellation settings.

use std::fmt::Display;
use std::future::pending;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::OutboxError;
use crate::event_type::EventType;

/// Settings a channel implementation may consume.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Retry attempts before giving up on an event.
    pub max_retries: u32,

    /// Number of events grouped per flush.
    pub batch_size: usize,

    /// Time between scheduled flush attempts.
    pub interval: Duration,

    /// The event type this channel is bound to.
    pub event_type: Option<EventType>,

    /// Deadline and shutdown signal.
    pub cancellation: CancellationContext,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            batch_size: 100,
            interval: Duration::from_secs(5),
            event_type: None,
            cancellation: CancellationContext::default(),
        }
    }
}

impl ChannelConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<EventType>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationContext) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Loads settings from `{prefix}_MAX_RETRIES`, `{prefix}_BATCH_SIZE`, and
    /// `{prefix}_INTERVAL_MS`. Unset variables keep their defaults.
    pub fn from_env(prefix: &str) -> Result<Self, OutboxError> {
        Self::from_lookup(prefix, |name| std::env::var(name).ok())
    }

    /// Like [`ChannelConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, OutboxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(max_retries) = parse_var(prefix, "MAX_RETRIES", &lookup)? {
            config.max_retries = max_retries;
        }
        if let Some(batch_size) = parse_var(prefix, "BATCH_SIZE", &lookup)? {
            config.batch_size = batch_size;
        }
        if let Some(interval_ms) = parse_var::<u64, _>(prefix, "INTERVAL_MS", &lookup)? {
            config.interval = Duration::from_millis(interval_ms);
        }

        Ok(config)
    }
}

fn parse_var<T, F>(prefix: &str, key: &str, lookup: &F) -> Result<Option<T>, OutboxError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let name = format!("{prefix}_{key}");
    match lookup(&name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| OutboxError::Config(format!("{name}={raw:?}: {e}"))),
        None => Ok(None),
    }
}

/// Deadline and shutdown signal for long-running channel work.
///
/// An empty context is never cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationContext {
    deadline: Option<Instant>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl CancellationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline to `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Cancels once the sender publishes `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        let expired = self
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline);
        let shut_down = self.shutdown.as_ref().is_some_and(|rx| *rx.borrow());
        expired || shut_down
    }

    /// Completes when the deadline passes or shutdown is signalled.
    ///
    /// A dropped shutdown sender does not count as cancellation.
    pub async fn cancelled(&self) {
        let mut shutdown = self.shutdown.clone();
        let shutdown_signalled = async {
            match shutdown.as_mut() {
                Some(rx) => loop {
                    if *rx.borrow_and_update() {
                        return;
                    }
                    if rx.changed().await.is_err() {
                        pending::<()>().await;
                    }
                },
                None => pending::<()>().await,
            }
        };

        let deadline_reached = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            _ = shutdown_signalled => {}
            _ = deadline_reached => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ChannelConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.interval, Duration::from_secs(5));
        assert!(config.event_type.is_none());
        assert!(!config.cancellation.is_cancelled());
    }

    #[test]
    fn test_builder() {
        let config = ChannelConfig::default()
            .with_max_retries(10)
            .with_batch_size(25)
            .with_interval(Duration::from_millis(250))
            .with_event_type(EventType::from_static("OrderPlaced", 1));

        assert_eq!(config.max_retries, 10);
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.interval, Duration::from_millis(250));
        assert_eq!(config.event_type.unwrap().name(), "OrderPlaced");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let lookup = lookup_from(&[
            ("ORDERS_MAX_RETRIES", "7"),
            ("ORDERS_BATCH_SIZE", " 50 "),
            ("ORDERS_INTERVAL_MS", "1500"),
        ]);
        let config = ChannelConfig::from_lookup("ORDERS", lookup).unwrap();

        assert_eq!(config.max_retries, 7);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.interval, Duration::from_millis(1500));
    }

    #[test]
    fn test_from_lookup_missing_keeps_defaults() {
        let config = ChannelConfig::from_lookup("ORDERS", lookup_from(&[])).unwrap();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.batch_size, 100);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let lookup = lookup_from(&[("ORDERS_BATCH_SIZE", "lots")]);
        let err = ChannelConfig::from_lookup("ORDERS", lookup).unwrap_err();
        match err {
            OutboxError::Config(message) => assert!(message.contains("ORDERS_BATCH_SIZE")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_env_unset_prefix() {
        let config = ChannelConfig::from_env("OUTBOX_TEST_UNSET_PREFIX_3F9A").unwrap();
        assert_eq!(config.max_retries, 3);
    }

    #[tokio::test]
    async fn test_shutdown_cancels() {
        let (tx, rx) = watch::channel(false);
        let ctx = CancellationContext::new().with_shutdown(rx);
        assert!(!ctx.is_cancelled());

        let waiter = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.cancelled().await })
        };

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancelled() should complete after shutdown")
            .unwrap();
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_deadline_cancels() {
        let ctx = CancellationContext::new().with_timeout(Duration::from_millis(20));
        assert!(ctx.remaining().is_some());

        tokio::time::timeout(Duration::from_secs(1), ctx.cancelled())
            .await
            .expect("cancelled() should complete after the deadline");
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_dropped_sender_is_not_cancellation() {
        let (tx, rx) = watch::channel(false);
        let ctx = CancellationContext::new().with_shutdown(rx);
        drop(tx);

        let result = tokio::time::timeout(Duration::from_millis(30), ctx.cancelled()).await;
        assert!(result.is_err());
        assert!(!ctx.is_cancelled());
    }
}
