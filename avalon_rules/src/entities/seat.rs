//! Seat definitions.

use serde::{Deserialize, Serialize};

use super::{Alignment, Role, SeatName};

/// A named participant with its role and fixed knowledge set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub name: SeatName,
    pub role: Role,
    pub alignment: Alignment,
    /// Other seats this seat may legitimately reason about, in seat order.
    pub knowledge: Vec<SeatName>,
}

impl Seat {
    /// Create a seat without knowledge; alignment follows the role.
    pub fn new(name: impl Into<SeatName>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            alignment: role.alignment(),
            knowledge: Vec::new(),
        }
    }

    pub fn is_good(&self) -> bool {
        self.alignment.is_good()
    }

    pub fn is_evil(&self) -> bool {
        !self.is_good()
    }

    /// Check whether this seat's knowledge set contains another seat.
    pub fn knows(&self, other: &SeatName) -> bool {
        self.knowledge.contains(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_seat() {
        let seat = Seat::new("Alice", Role::Morgana);
        assert_eq!(seat.name.as_str(), "Alice");
        assert!(seat.is_evil());
        assert!(seat.knowledge.is_empty());
    }

    #[test]
    fn test_seat_knows() {
        let mut seat = Seat::new("Bob", Role::Merlin);
        seat.knowledge.push(SeatName::from("Eve"));
        assert!(seat.knows(&SeatName::from("Eve")));
        assert!(!seat.knows(&SeatName::from("Alice")));
    }
}
