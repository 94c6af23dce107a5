use crate::bus::Bus;
use crate::outcome::Outcome;
use async_trait::async_trait;

/// The contract for a lifecycle hook.
///
/// A `Hook` turns the state `From` of a pending write into `Outcome<To, Error>`.
/// Hooks own whatever long-lived resources they need (clients, config) and
/// read request-scoped data from the `Bus`.
#[async_trait]
pub trait Hook<From, To>: Send + Sync + 'static
where
    From: Send + 'static,
    To: Send + 'static,
{
    /// Error that aborts the write (e.g., ValidationError)
    type Error: Send + Sync + 'static;

    /// Human-readable name used in spans and chain listings.
    fn label(&self) -> String {
        short_type_name::<Self>()
    }

    /// Run the hook
    async fn run(&self, input: From, bus: &mut Bus) -> Outcome<To, Self::Error>;
}

/// Last path segment of a type name (`paysync_stripe::hook::SyncOnWrite` -> `SyncOnWrite`).
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
