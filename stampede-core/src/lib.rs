mod config;
mod constants;
mod report;
mod scenario;
mod stats;

pub use config::*;
pub use constants::*;
pub use report::*;
pub use scenario::*;
pub use stats::*;
