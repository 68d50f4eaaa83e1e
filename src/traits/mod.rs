//! Core traits for the dependency injection engine.

mod dispose;
mod implements;
mod inject;
mod resolver;

pub use dispose::Dispose;
pub use implements::Implements;
pub use inject::Inject;
pub use resolver::{Resolver, ResolverCore};
