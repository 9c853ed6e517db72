//! Secret Santa assignment
//!
//! The roster is shuffled with a uniform Fisher-Yates permutation and each
//! participant gives to the next one in the shuffled order, wrapping around at
//! the end. The result is always a single cycle through everyone.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{AppError, Result};
use crate::models::Participant;
use crate::roster::Roster;

/// Smallest roster that can form a cycle without self-assignment
pub const MIN_PARTICIPANTS: usize = 2;

/// Compute a fresh assignment for `roster`.
///
/// Returns the replacement roster in shuffled order with every `assigned_to`
/// set. Earlier assignments are discarded. The input is never modified.
pub fn assign<R: Rng + ?Sized>(roster: &Roster, rng: &mut R) -> Result<Roster> {
    if roster.len() < MIN_PARTICIPANTS {
        return Err(AppError::InsufficientParticipants {
            count: roster.len(),
        });
    }

    let mut shuffled: Vec<Participant> = roster
        .iter()
        .map(|p| Participant::new(p.name.clone(), p.phone.clone()))
        .collect();
    shuffled.shuffle(rng);

    let recipients: Vec<String> = shuffled.iter().map(|p| p.name.clone()).collect();
    let n = shuffled.len();
    for (i, santa) in shuffled.iter_mut().enumerate() {
        santa.assigned_to = Some(recipients[(i + 1) % n].clone());
    }

    tracing::info!("Assigned Secret Santas for {} participants", n);
    Ok(Roster::from(shuffled))
}
