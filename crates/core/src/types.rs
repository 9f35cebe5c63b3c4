use std::fmt;

/// All owner API identifiers are numeric database keys.
pub type DbId = i64;

/// Fencing token attached to one assignment-prospect fetch.
///
/// Tickets increase monotonically within a workflow, so a response can be
/// matched against the fetch the workflow is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
