//! 持久化层：标签游标与动作台账

pub mod cursors;
pub mod ledger;

pub use cursors::CursorStore;
pub use ledger::{ActionLedger, MemoryLedger, SqliteLedger};
