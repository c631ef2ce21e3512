use crate::JobConfig;

/// Work the engine has to carry out after a state transition.
///
/// `update` emits creates first, then removes, then refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateIndicator { name: String, config: JobConfig },
    RemoveIndicator { name: String },
    RefreshIndicator { name: String, config: JobConfig },
}

impl Effect {
    pub fn name(&self) -> &str {
        match self {
            Effect::CreateIndicator { name, .. }
            | Effect::RemoveIndicator { name }
            | Effect::RefreshIndicator { name, .. } => name,
        }
    }
}
