//! Shared status vocabulary.
//!
//! Every entity kind draws its states from this one enum; which transitions are
//! legal is decided per rule set (or by the workflow that owns the entity).

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Draft,
    Submitted,
    Approved,
    Allocated,
    Backordered,
    InProduction,
    ReadyToShip,
    Closed,
    Canceled,
    OnHold,
    Scheduled,
}

impl Status {
    pub const ALL: [Status; 11] = [
        Status::Draft,
        Status::Submitted,
        Status::Approved,
        Status::Allocated,
        Status::Backordered,
        Status::InProduction,
        Status::ReadyToShip,
        Status::Closed,
        Status::Canceled,
        Status::OnHold,
        Status::Scheduled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "Draft",
            Status::Submitted => "Submitted",
            Status::Approved => "Approved",
            Status::Allocated => "Allocated",
            Status::Backordered => "Backordered",
            Status::InProduction => "InProduction",
            Status::ReadyToShip => "ReadyToShip",
            Status::Closed => "Closed",
            Status::Canceled => "Canceled",
            Status::OnHold => "OnHold",
            Status::Scheduled => "Scheduled",
        }
    }

    /// No further workflow transitions are expected from these states.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Closed | Status::Canceled)
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
