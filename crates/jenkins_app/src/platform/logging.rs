//! Logger setup for the `jenkins-status` binary.
//!
//! File output goes to `./jenkins-status.log` in the current working directory.

use std::path::Path;

use jenkins_logging::LogDestination;
use log::LevelFilter;

const LOG_FILE: &str = "./jenkins-status.log";

pub fn initialize(destination: LogDestination) {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    jenkins_logging::initialize(destination, level, Path::new(LOG_FILE));
}
