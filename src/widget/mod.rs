//! Widget side: derive display entries from the shared snapshot and render them
//!
//! Nothing here keeps timers. The host decides when to call the provider; a
//! running entry carries its end instant and keeps counting on its own.

pub mod entry;
pub mod provider;
pub mod view;

pub use entry::{derive_entry, format_clock, DisplayEntry, EffectiveState};
pub use provider::{Timeline, TimelineProvider, DEFAULT_FALLBACK_REFRESH_SECS};
pub use view::render;
