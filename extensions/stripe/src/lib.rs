//! # paysync-stripe
//!
//! Keeps collection documents linked to Stripe resources. Register
//! [`SyncOnWrite`] as a before-validate hook; when a document in a configured
//! collection is created (or updated without an id yet), it creates the
//! matching Stripe resource and writes `stripeID` and `skipSync` back onto
//! the record.
//!
//! ```rust,ignore
//! use paysync_stripe::prelude::*;
//!
//! let resources = SyncResources::from_env_and_file("billing-sync.toml")?;
//! let chain = HookChain::new("beforeValidate").then(SyncOnWrite::new(resources));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod hook;
pub mod resource;

// Re-exports for convenience
pub use client::{BillingClient, CreatedResource, StripeClient, StripeSettings};
pub use config::{FieldMapping, SyncConfig, SyncRule};
pub use error::{BillingError, ConfigError, ResourceError};
pub use hook::{SyncOnWrite, SyncOperation, SyncResources, TEST_EXTERNAL_ID};
pub use resource::ResourceKind;

// Prelude module
pub mod prelude {
    pub use crate::client::{BillingClient, CreatedResource, StripeClient, StripeSettings};
    pub use crate::config::{SyncConfig, SyncRule};
    pub use crate::hook::{SyncOnWrite, SyncResources};
    pub use crate::resource::ResourceKind;
}
