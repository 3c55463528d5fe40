//! Conflict types
//!
//! Differences between the local and remote quote sets, classified by the
//! sync agent. Resolution logic matches on the variant.

use serde::{Deserialize, Serialize};

use crate::types::Quote;

/// A detected discrepancy between the local and remote quote sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Conflict {
    /// A remote quote with no local counterpart. Resolved by appending the
    /// remote quote locally (remote precedence).
    RemoteOnly { quote: Quote },
    /// A local quote that has never been pushed to the server. Advisory only;
    /// cleared by a later push cycle, never auto-resolved.
    LocalUnsynced { quote: Quote },
}

impl Conflict {
    /// Human-readable description for the notification surface
    pub fn description(&self) -> String {
        match self {
            Conflict::RemoteOnly { quote } => {
                format!("Server quote not in local data: \"{}\"", quote.text)
            }
            Conflict::LocalUnsynced { quote } => {
                format!("Local quote not yet synced: \"{}\"", quote.text)
            }
        }
    }

    /// The quote this conflict is about
    pub fn quote(&self) -> &Quote {
        match self {
            Conflict::RemoteOnly { quote } | Conflict::LocalUnsynced { quote } => quote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_mentions_text() {
        let conflict = Conflict::RemoteOnly {
            quote: Quote::remote(3, "Fortune favors the bold.", "Life"),
        };
        assert!(conflict.description().contains("Fortune favors the bold."));
    }

    #[test]
    fn test_quote_accessor() {
        let quote = Quote::new("Alpha", "X");
        let conflict = Conflict::LocalUnsynced {
            quote: quote.clone(),
        };
        assert_eq!(conflict.quote(), &quote);
    }
}
