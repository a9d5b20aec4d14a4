//! The `logger` module is a thin wrapper over `tracing-subscriber` with a
//! reloadable filter; the bootstrap filter is replaced once settings load.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
