//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod compatibility;
pub mod dispatch;
pub mod feed;
pub mod resolver;
pub mod session;

pub use compatibility::{CompatibilityFilter, TaggingReport};
pub use dispatch::ActionDispatcher;
pub use feed::{prepare_feed, FeedReport};
pub use resolver::{StageOptions, VehicleResolver};
pub use session::{NonceGuard, SessionMemory};
