//! Knowledge view - the read-only seat table every downstream step reads.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assignment::{assign_roles, build_seats};
use crate::catalog::RoleCatalog;
use crate::entities::{Role, Seat, SeatName};
use crate::error::{ConfigurationError, Result};

/// Per-seat visibility computed once at setup.
///
/// There is no mutable access: knowledge sets never change during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeView {
    seats: Vec<Seat>,
    assassin_role: Role,
}

impl KnowledgeView {
    /// Shuffle the catalog's roles onto its seats.
    pub fn assign<R: Rng + ?Sized>(catalog: &RoleCatalog, rng: &mut R) -> Result<Self> {
        let seats = assign_roles(catalog, rng)?;
        Ok(Self {
            seats,
            assassin_role: catalog.assassin_role,
        })
    }

    /// Seat the catalog's roles in a fixed order instead of shuffling.
    ///
    /// `roles` must be a permutation of the catalog's role list.
    pub fn with_seating(catalog: &RoleCatalog, roles: &[Role]) -> Result<Self> {
        catalog.validate()?;

        let mut given = roles.to_vec();
        let mut expected = catalog.roles.clone();
        given.sort();
        expected.sort();
        if given != expected {
            return Err(ConfigurationError::RoleSetMismatch);
        }

        Ok(Self {
            seats: build_seats(&catalog.names, roles)?,
            assassin_role: catalog.assassin_role,
        })
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn assassin_role(&self) -> Role {
        self.assassin_role
    }

    /// Seat by name.
    pub fn seat(&self, name: &SeatName) -> Option<&Seat> {
        self.seats.iter().find(|s| &s.name == name)
    }

    /// Seat by table position.
    pub fn seat_at(&self, index: usize) -> Option<&Seat> {
        self.seats.get(index)
    }

    /// Table position of a seat.
    pub fn index_of(&self, name: &SeatName) -> Option<usize> {
        self.seats.iter().position(|s| &s.name == name)
    }

    pub fn contains(&self, name: &SeatName) -> bool {
        self.index_of(name).is_some()
    }

    /// All seat names in seat order.
    pub fn names(&self) -> Vec<SeatName> {
        self.seats.iter().map(|s| s.name.clone()).collect()
    }

    /// Knowledge set of a seat; empty for unknown names.
    pub fn knowledge_of(&self, name: &SeatName) -> &[SeatName] {
        self.seat(name)
            .map(|s| s.knowledge.as_slice())
            .unwrap_or(&[])
    }

    /// The seat holding Merlin. This is ground truth and is only read when
    /// checking the assassin's guess.
    pub fn merlin(&self) -> Option<&Seat> {
        self.seats.iter().find(|s| s.role == Role::Merlin)
    }

    /// The seat holding the configured assassin role.
    pub fn assassin(&self) -> Option<&Seat> {
        self.seats.iter().find(|s| s.role == self.assassin_role)
    }

    pub fn is_assassin(&self, seat: &Seat) -> bool {
        seat.role == self.assassin_role
    }

    pub fn evil_seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| s.is_evil())
    }

    pub fn good_seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| s.is_good())
    }

    pub fn good_count(&self) -> usize {
        self.good_seats().count()
    }

    pub fn evil_count(&self) -> usize {
        self.evil_seats().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_with_seating() {
        let catalog = RoleCatalog::standard(5).unwrap();
        let view = KnowledgeView::with_seating(
            &catalog,
            &[Role::Merlin, Role::Good, Role::Good, Role::Assassin, Role::Evil],
        )
        .unwrap();

        assert_eq!(view.merlin().unwrap().name.as_str(), "Alice");
        assert_eq!(view.assassin().unwrap().name.as_str(), "Diana");
        assert_eq!(view.index_of(&SeatName::from("Eve")), Some(4));
        assert_eq!(view.good_count(), 3);
        assert_eq!(view.evil_count(), 2);
        assert_eq!(
            view.knowledge_of(&SeatName::from("Diana")),
            &[SeatName::from("Eve")]
        );
    }

    #[test]
    fn test_with_seating_rejects_foreign_roles() {
        let catalog = RoleCatalog::standard(5).unwrap();
        let result = KnowledgeView::with_seating(
            &catalog,
            &[Role::Merlin, Role::Good, Role::Good, Role::Assassin, Role::Oberon],
        );
        assert_eq!(result, Err(ConfigurationError::RoleSetMismatch));
    }

    #[test]
    fn test_dual_role_assassin() {
        let catalog = RoleCatalog::standard(6).unwrap();
        let view = KnowledgeView::assign(&catalog, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let assassin = view.assassin().unwrap();
        assert_eq!(assassin.role, Role::Mordred);
        assert!(view.is_assassin(assassin));
    }

    #[test]
    fn test_unknown_seat_has_no_knowledge() {
        let catalog = RoleCatalog::standard(5).unwrap();
        let view = KnowledgeView::assign(&catalog, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert!(view.knowledge_of(&SeatName::from("Zed")).is_empty());
        assert!(!view.contains(&SeatName::from("Zed")));
    }
}
