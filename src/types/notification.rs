//! Notification types
//!
//! Messages produced by sync cycles for an external display surface.

use serde::{Deserialize, Serialize};

/// How prominently a notification should be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A message for the user
///
/// Sticky notifications (conflicts) stay until dismissed or resolved;
/// transient ones auto-dismiss after a fixed delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub sticky: bool,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
            sticky: false,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            sticky: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            sticky: false,
        }
    }

    /// Mark the notification as persistent until dismissed
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let n = Notification::info("synced");
        assert_eq!(n.severity, Severity::Info);
        assert!(!n.sticky);

        let n = Notification::warning("conflict").sticky();
        assert_eq!(n.severity, Severity::Warning);
        assert!(n.sticky);
    }
}
