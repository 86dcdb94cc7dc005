//! Status module - lifecycle stages for rows

/// Status in the row lifecycle
///
/// Rows progress through statuses as they are processed and reviewed:
/// - Pending: submitted, not yet picked up
/// - Running: processing in flight
/// - Sent: draft delivered to reviewers, awaiting a decision
/// - Approved / Rejected: reviewer decision recorded
/// - Error: processing failed with a recorded reason
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// Submitted, waiting to be processed
    Pending,

    /// Processing started but not yet finished
    Running,

    /// Draft delivered to reviewers, decision pending
    Sent,

    /// Reviewer approved the draft (terminal)
    Approved,

    /// Reviewer rejected the draft (terminal)
    Rejected,

    /// Processing failed (terminal for automatic recovery)
    Error(String),
}

impl Status {
    /// Whether this status admits no further automatic transition
    ///
    /// Terminal rows are never picked up again by the recovery scan;
    /// only `Sent` rows accept an external approval event.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Approved | Status::Rejected | Status::Error(_)
        )
    }

    /// Render the status as the single cell value stored in the row table
    pub fn as_cell(&self) -> String {
        match self {
            Status::Pending => "Pending".to_string(),
            Status::Running => "Running".to_string(),
            Status::Sent => "Sent".to_string(),
            Status::Approved => "Approved".to_string(),
            Status::Rejected => "Rejected".to_string(),
            Status::Error(reason) => format!("Error: {}", reason),
        }
    }

    /// Parse a status from its stored cell value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Status::Pending),
            "Running" => Some(Status::Running),
            "Sent" => Some(Status::Sent),
            "Approved" => Some(Status::Approved),
            "Rejected" => Some(Status::Rejected),
            other => other
                .strip_prefix("Error: ")
                .map(|reason| Status::Error(reason.to_string())),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_cell())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_round_trip() {
        let statuses = [
            Status::Pending,
            Status::Running,
            Status::Sent,
            Status::Approved,
            Status::Rejected,
            Status::Error("quota exceeded".to_string()),
        ];
        for status in statuses {
            assert_eq!(Status::parse(&status.as_cell()), Some(status));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Status::parse("Bogus"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(Status::Approved.is_terminal());
        assert!(Status::Rejected.is_terminal());
        assert!(Status::Error("x".to_string()).is_terminal());
        assert!(!Status::Pending.is_terminal());
        assert!(!Status::Running.is_terminal());
        assert!(!Status::Sent.is_terminal());
    }
}
