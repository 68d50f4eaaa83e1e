//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod panic;

pub(crate) use circular::StackGuard;
pub(crate) use panic::catch_creation;
