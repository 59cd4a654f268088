//! Infrastructure configuration modules.

pub mod logging;
pub mod lookup;
pub mod session;
pub mod settings;

pub use logging::LoggingConfig;
pub use lookup::LookupConfig;
pub use session::SessionConfig;
pub use settings::{Config, ImportConfig};
