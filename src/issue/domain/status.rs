//! Issue status and its transition table.

use super::ParseIssueStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    /// Reported and waiting for work to start.
    Open,
    /// A technician is working on the issue.
    InProgress,
    /// Work is finished and awaiting confirmation.
    Resolved,
    /// The issue is closed.
    Closed,
}

impl IssueStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "InProgress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Returns the human-readable label used in notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            other => other.as_str(),
        }
    }

    /// Returns whether `self -> target` is an edge of the state machine.
    ///
    /// Reopening (any non-open status to `Open`) is an edge; who may take it
    /// is decided by the caller.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::InProgress)
                | (Self::InProgress, Self::Resolved)
                | (Self::Resolved, Self::Closed)
                | (Self::InProgress | Self::Resolved | Self::Closed, Self::Open)
        )
    }

    /// Returns whether `self -> target` reopens the issue.
    #[must_use]
    pub const fn is_reopen(self, target: Self) -> bool {
        matches!(target, Self::Open) && !matches!(self, Self::Open)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IssueStatus {
    type Error = ParseIssueStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "inprogress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseIssueStatusError(value.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(IssueStatus::Open, IssueStatus::InProgress, true)]
    #[case(IssueStatus::InProgress, IssueStatus::Resolved, true)]
    #[case(IssueStatus::Resolved, IssueStatus::Closed, true)]
    #[case(IssueStatus::Closed, IssueStatus::Open, true)]
    #[case(IssueStatus::Resolved, IssueStatus::Open, true)]
    #[case(IssueStatus::InProgress, IssueStatus::Open, true)]
    #[case(IssueStatus::Open, IssueStatus::Resolved, false)]
    #[case(IssueStatus::Open, IssueStatus::Closed, false)]
    #[case(IssueStatus::InProgress, IssueStatus::Closed, false)]
    #[case(IssueStatus::Closed, IssueStatus::Resolved, false)]
    #[case(IssueStatus::Open, IssueStatus::Open, false)]
    #[case(IssueStatus::Closed, IssueStatus::Closed, false)]
    fn transition_table(
        #[case] from: IssueStatus,
        #[case] to: IssueStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    #[case("Open", IssueStatus::Open)]
    #[case("in progress", IssueStatus::InProgress)]
    #[case("In_Progress", IssueStatus::InProgress)]
    #[case("InProgress", IssueStatus::InProgress)]
    #[case(" RESOLVED ", IssueStatus::Resolved)]
    fn parse_accepts_common_spellings(#[case] raw: &str, #[case] expected: IssueStatus) {
        assert_eq!(IssueStatus::try_from(raw), Ok(expected));
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(
            IssueStatus::try_from("pending"),
            Err(ParseIssueStatusError("pending".to_owned()))
        );
    }
}
