#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A new settings batch arrived; membership is reconciled against it.
    SettingsChanged(Vec<crate::JobConfig>),
    /// Periodic or manual refresh of every tracked job, membership unchanged.
    UpdateRequested,
}
