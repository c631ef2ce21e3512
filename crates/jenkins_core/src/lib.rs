//! Jenkins core: pure status model, presentation and reconciliation state machine.
mod command_id;
mod config;
mod effect;
mod msg;
mod state;
mod status;
mod update;
mod view_model;

pub use command_id::{
    console_output_url, job_command_id, JobAction, GLOBAL_OPEN_IN_JENKINS,
    GLOBAL_OPEN_IN_JENKINS_CONSOLE_OUTPUT, GLOBAL_UPDATE_STATUS,
};
pub use config::{normalize_names, JobConfig, DEFAULT_JOB_NAME};
pub use effect::Effect;
pub use msg::Msg;
pub use state::TrackerState;
pub use status::{
    status_from_color, BuildStatus, ConnectionStatus, JobStatus, AUTHENTICATION_NEEDED, INVALID_URL,
};
pub use update::update;
pub use view_model::{IndicatorView, StatusIcon, NO_URL_TOOLTIP};
