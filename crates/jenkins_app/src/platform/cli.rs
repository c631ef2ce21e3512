use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use jenkins_logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    name = "jenkins-status",
    version,
    about = "Shows the last build status of Jenkins jobs listed in .jenkins files"
)]
pub struct Cli {
    /// Folder to look for a `.jenkins` file in. Repeatable; defaults to the current directory.
    #[arg(long = "folder", value_name = "DIR")]
    pub folders: Vec<PathBuf>,

    /// Minutes between automatic refreshes; 0 disables polling.
    #[arg(long, value_name = "MINUTES", default_value_t = 1)]
    pub polling: u64,

    /// Poll every job once, print the results and exit.
    #[arg(long, default_value_t = false)]
    pub once: bool,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,
}

impl Cli {
    pub fn folders_or_current(&self) -> Vec<PathBuf> {
        if self.folders.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.folders.clone()
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTarget {
    Terminal,
    /// `./jenkins-status.log`
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_poll_every_minute_in_current_folder() {
        let cli = Cli::parse_from(["jenkins-status"]);

        assert_eq!(cli.polling, 1);
        assert!(!cli.once);
        assert_eq!(cli.log, LogTarget::Terminal);
        assert_eq!(cli.folders_or_current(), vec![PathBuf::from(".")]);
    }

    #[test]
    fn folder_flag_is_repeatable() {
        let cli = Cli::parse_from([
            "jenkins-status",
            "--folder",
            "a",
            "--folder",
            "b",
            "--polling",
            "0",
            "--once",
            "--log",
            "both",
        ]);

        assert_eq!(
            cli.folders_or_current(),
            vec![PathBuf::from("a"), PathBuf::from("b")]
        );
        assert_eq!(cli.polling, 0);
        assert!(cli.once);
        assert_eq!(LogDestination::from(cli.log), LogDestination::Both);
    }
}
