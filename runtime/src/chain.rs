//! # HookChain: Ordered Lifecycle Hooks
//!
//! A `HookChain` is what a host runs for one lifecycle stage (e.g.
//! before-validate): an ordered, reusable pipeline of hooks over a pending
//! write.
//!
//! * **Builder pattern**: `HookChain::new("beforeValidate").then(A).then(B)`
//! * **Short-circuit**: the first `Outcome::Fault` stops the chain
//! * **Reusable**: one chain serves every write; state lives on the `Bus`

use paysync_core::bus::Bus;
use paysync_core::hook::{Hook, short_type_name};
use paysync_core::outcome::Outcome;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::Instrument;

/// Type alias for async boxed futures used in chain execution.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Executor type for chain steps.
/// Takes an input state `In` and returns an `Outcome<Out, E>`.
pub type Executor<In, Out, E> =
    Arc<dyn for<'a> Fn(In, &'a mut Bus) -> BoxFuture<'a, Outcome<Out, E>> + Send + Sync>;

/// The HookChain builder and runner.
///
/// ## Example
///
/// ```rust,ignore
/// let chain = HookChain::<PendingWrite, PendingWrite, Infallible>::new("beforeValidate")
///     .then(Normalize)
///     .then(sync_on_write);
///
/// let outcome = chain.execute(write, &mut bus).await;
/// ```
pub struct HookChain<In, Out, E> {
    label: String,
    hooks: Vec<String>,
    executor: Executor<In, Out, E>,
}

impl<In, Out, E> Clone for HookChain<In, Out, E> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            hooks: self.hooks.clone(),
            executor: self.executor.clone(),
        }
    }
}

impl<In, E> HookChain<In, In, E>
where
    In: Send + Sync + 'static,
    E: Send + 'static,
{
    /// Start an empty chain (In -> In) with the given label.
    pub fn new(label: &str) -> Self {
        let executor: Executor<In, In, E> = Arc::new(
            move |input: In, _bus: &mut Bus| -> BoxFuture<'_, Outcome<In, E>> {
                Box::pin(std::future::ready(Outcome::Next(input)))
            },
        );

        Self {
            label: label.to_string(),
            hooks: Vec::new(),
            executor,
        }
    }
}

impl<In, Out, E> HookChain<In, Out, E>
where
    In: Send + Sync + 'static,
    Out: Send + Sync + 'static,
    E: Send + 'static,
{
    /// Append a hook to this chain.
    pub fn then<Next, H>(self, hook: H) -> HookChain<In, Next, E>
    where
        Next: Send + Sync + 'static,
        H: Hook<Out, Next, Error = E>,
    {
        let HookChain {
            label,
            mut hooks,
            executor: prev_executor,
        } = self;

        hooks.push(hook.label());
        let hook = Arc::new(hook);

        let next_executor: Executor<In, Next, E> = Arc::new(
            move |input: In, bus: &mut Bus| -> BoxFuture<'_, Outcome<Next, E>> {
                let prev = prev_executor.clone();
                let hook = hook.clone();

                Box::pin(async move {
                    let state = match prev(input, bus).await {
                        Outcome::Next(t) => t,
                        Outcome::Fault(e) => return Outcome::Fault(e),
                    };

                    hook.run(state, bus).await
                })
            },
        );

        HookChain {
            label,
            hooks,
            executor: next_executor,
        }
    }

    /// Run every hook in order against one write.
    pub async fn execute(&self, input: In, bus: &mut Bus) -> Outcome<Out, E> {
        let label = self.label.clone();
        async move { (self.executor)(input, bus).await }
            .instrument(tracing::info_span!(
                "HookChain",
                paysync.chain = %label,
                paysync.input = %short_type_name::<In>()
            ))
            .await
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Labels of the registered hooks, in execution order.
    pub fn hooks(&self) -> &[String] {
        &self.hooks
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
