//! Bridge side: the host app's entry points into the shared widget state
//!
//! The writer is the only component allowed to mutate the shared snapshot.

pub mod update;
pub mod writer;

pub use update::TimerUpdate;
pub use writer::{reconcile_target, StateWriter, DEFAULT_DRIFT_TOLERANCE_SECS};
