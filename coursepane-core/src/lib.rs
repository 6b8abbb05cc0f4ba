pub mod bridge;
pub mod content;
pub mod error;
pub mod layout;
pub mod locator;
pub mod outline;

pub use error::{BridgeError, CoursepaneError, Result};
