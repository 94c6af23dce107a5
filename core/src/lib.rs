pub mod bus;
pub mod environment;
pub mod hook;
pub mod outcome;
pub mod record;
pub mod telemetry;

pub use bus::Bus;
pub use environment::Environment;
pub use hook::Hook;
pub use outcome::Outcome;
pub use record::{
    EXTERNAL_ID_FIELD, Operation, PendingRecord, PendingWrite, RecordError, SKIP_SYNC_FIELD,
};
pub use telemetry::{Traced, init_tracing};

pub mod prelude {
    pub use crate::bus::Bus;
    pub use crate::environment::Environment;
    pub use crate::hook::Hook;
    pub use crate::outcome::Outcome;
    pub use crate::record::{Operation, PendingRecord, PendingWrite};
    pub use crate::telemetry::Traced;
}
