use crate::domain::abtest::TestStatus;

/// The complete set of legal status transitions. Completed is terminal.
pub fn can_transition(from: TestStatus, to: TestStatus) -> bool {
    matches!(
        (from, to),
        (TestStatus::Draft, TestStatus::Active)
            | (TestStatus::Active, TestStatus::Paused)
            | (TestStatus::Paused, TestStatus::Active)
            | (TestStatus::Active, TestStatus::Completed)
            | (TestStatus::Paused, TestStatus::Completed)
    )
}

/// Audit-log action name for a legal transition.
pub fn log_action(from: TestStatus, to: TestStatus) -> Option<&'static str> {
    match (from, to) {
        (TestStatus::Draft, TestStatus::Active) => Some("started"),
        (TestStatus::Paused, TestStatus::Active) => Some("resumed"),
        (TestStatus::Active, TestStatus::Paused) => Some("paused"),
        (TestStatus::Active, TestStatus::Completed)
        | (TestStatus::Paused, TestStatus::Completed) => Some("stopped"),
        _ => None,
    }
}

pub fn transition(from: TestStatus, to: TestStatus) -> Result<&'static str, String> {
    log_action(from, to).ok_or_else(|| {
        format!(
            "invalid status transition {} -> {}",
            from.as_str(),
            to.as_str()
        )
    })
}
