//! # Telemetry: Observability for Hooks
//!
//! Subscriber bootstrap plus a decorator that wraps any hook in a span.

use crate::bus::Bus;
use crate::hook::Hook;
use crate::outcome::Outcome;
use async_trait::async_trait;
use std::fmt::Debug;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,paysync_core=debug";

/// Install a stdout `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs anything.
/// Returns whether this call installed the subscriber.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// A wrapper Hook that adds a span and an outcome log line to any inner Hook.
#[derive(Clone)]
pub struct Traced<H> {
    inner: H,
    name: String,
}

impl<H> Traced<H> {
    pub fn new(inner: H, name: &str) -> Self {
        Self {
            inner,
            name: name.to_string(),
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<H, From, To> Hook<From, To> for Traced<H>
where
    H: Hook<From, To>,
    H::Error: Debug,
    From: Send + 'static,
    To: Send + 'static,
{
    type Error = H::Error;

    fn label(&self) -> String {
        self.name.clone()
    }

    async fn run(&self, input: From, bus: &mut Bus) -> Outcome<To, Self::Error> {
        use tracing::{Instrument, info_span};

        let span = info_span!("Hook", paysync.hook = %self.name);

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.run(input, bus).await;
            let duration = start.elapsed();

            match &result {
                Outcome::Next(_) => tracing::debug!(?duration, "hook completed"),
                Outcome::Fault(e) => tracing::error!(error = ?e, ?duration, "hook faulted"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
