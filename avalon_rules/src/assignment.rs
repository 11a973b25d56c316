//! Role assignment: binds catalog roles onto named seats and derives knowledge.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::RoleCatalog;
use crate::entities::{Role, Seat, SeatName};
use crate::error::{ConfigurationError, Result};

/// Shuffle the catalog's roles onto its seat names with a uniform permutation.
pub fn assign_roles<R: Rng + ?Sized>(catalog: &RoleCatalog, rng: &mut R) -> Result<Vec<Seat>> {
    catalog.validate()?;

    let mut roles = catalog.roles.clone();
    roles.shuffle(rng);

    build_seats(&catalog.names, &roles)
}

/// Bind roles to names in order and derive every seat's knowledge set.
pub fn build_seats(names: &[SeatName], roles: &[Role]) -> Result<Vec<Seat>> {
    if names.len() != roles.len() {
        return Err(ConfigurationError::RoleCountMismatch {
            players: names.len(),
            roles: roles.len(),
        });
    }

    let mut seats: Vec<Seat> = names
        .iter()
        .cloned()
        .zip(roles.iter().copied())
        .map(|(name, role)| Seat::new(name, role))
        .collect();

    let knowledge: Vec<_> = seats
        .iter()
        .map(|seat| derive_knowledge(seat, &seats))
        .collect();
    for (seat, known) in seats.iter_mut().zip(knowledge) {
        seat.knowledge = known;
    }

    Ok(seats)
}

/// Knowledge set of one seat given the full table, in seat order.
///
/// - Merlin sees every evil seat except Mordred.
/// - Percival sees Merlin and Morgana without telling them apart.
/// - Oberon and plain good seats see nobody.
/// - Other evil seats see their evil teammates, excluding Oberon.
pub fn derive_knowledge(seat: &Seat, table: &[Seat]) -> Vec<SeatName> {
    match seat.role {
        Role::Merlin => names_where(table, |other| {
            other.is_evil() && other.role != Role::Mordred
        }),
        Role::Percival => names_where(table, |other| {
            matches!(other.role, Role::Merlin | Role::Morgana)
        }),
        Role::Good | Role::Oberon => Vec::new(),
        Role::Evil | Role::Assassin | Role::Morgana | Role::Mordred => {
            names_where(table, |other| {
                other.is_evil() && other.name != seat.name && other.role != Role::Oberon
            })
        }
    }
}

fn names_where(table: &[Seat], include: impl Fn(&Seat) -> bool) -> Vec<SeatName> {
    table
        .iter()
        .filter(|other| include(*other))
        .map(|other| other.name.clone())
        .collect()
}
