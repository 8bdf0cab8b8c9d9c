//! Command-line front end for retirement_core
//!
//! Loads scenario files, projects them and prints yearly reports:
//! - `load` - YAML/JSON scenario files and the as-of override
//! - `report` - summary tables, per-year detail and diagnostics
//! - `logging` - tracing setup on stderr

pub mod load;
pub mod logging;
pub mod report;

pub use load::{load_config, load_scenarios};
pub use logging::init_logging;
pub use report::{Diagnostics, SummaryTable, YearDetail};
