//! followup-engine: store seams, in-memory store, and the suggestion materializer.

pub mod engine;
pub mod error;
pub mod memory;
mod run_guard;
pub mod store;

pub use engine::{
    DailyOptions, DailyReport, FollowUpEngine, MaterializeReport, SuggestRun, UserSnapshot,
};
pub use error::{DataSource, EngineError, Entity};
pub use memory::{MemoryStore, StoreSnapshot};
pub use store::{
    ClientStore, Clock, FixedClock, FollowUpStore, InvoiceStore, NotificationStore, ReminderStore,
    SystemClock,
};
