//! Run orchestration
//!
//! - [`naming`] - log folder preparation and per-run file names
//! - [`orchestrator`] - the setup and run phases of one invocation

pub mod naming;
pub mod orchestrator;

pub use naming::LogLocation;
pub use orchestrator::{
    ReportJob, RunOutcome, EXIT_RUN_FAILURE, EXIT_SETUP_FAILURE, EXIT_SUCCESS,
};
