pub mod chain;

pub mod prelude {
    pub use crate::chain::HookChain;
}

pub use chain::HookChain;
