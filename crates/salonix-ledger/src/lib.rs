//! Salonix Ledger — the day-closing guard consulted before any
//! financial record is created or changed.

pub mod cache;
pub mod guard;

pub use cache::{CachedClosing, ClosingCache, InMemoryClosingCache};
pub use guard::DayClosingGuard;
