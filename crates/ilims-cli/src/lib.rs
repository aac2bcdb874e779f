//! Library side of the `ilims` command: logging, settings resolution and
//! console summaries.

pub mod logging;
pub mod settings;
pub mod summary;
