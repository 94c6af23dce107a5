use serde::{Deserialize, Serialize};

/// The explicit result of running a lifecycle hook.
///
/// A hook either hands the (possibly modified) write to the next hook, or
/// faults and stops the chain. Side-effect failures a hook chooses to swallow
/// never show up here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome<T, E> {
    /// Continue with the next hook
    Next(T),

    /// Abort the write
    Fault(E),
}

impl<T, E> Outcome<T, E> {
    pub fn next(value: T) -> Self {
        Outcome::Next(value)
    }

    pub fn fault(error: E) -> Self {
        Outcome::Fault(error)
    }

    pub fn is_next(&self) -> bool {
        matches!(self, Outcome::Next(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, op: F) -> Outcome<U, E> {
        match self {
            Outcome::Next(t) => Outcome::Next(op(t)),
            Outcome::Fault(e) => Outcome::Fault(e),
        }
    }

    pub fn map_fault<G, F: FnOnce(E) -> G>(self, op: F) -> Outcome<T, G> {
        match self {
            Outcome::Next(t) => Outcome::Next(t),
            Outcome::Fault(e) => Outcome::Fault(op(e)),
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Next(t) => Ok(t),
            Outcome::Fault(e) => Err(e),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(t) => Outcome::Next(t),
            Err(e) => Outcome::Fault(e),
        }
    }
}
