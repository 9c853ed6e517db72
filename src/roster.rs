//! Roster of registered participants

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Participant;

/// Ordered participants of one organizer session.
///
/// Insertion order is kept until an assignment replaces the roster with its
/// shuffled, paired sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a participant. Both fields must be non-empty; values are stored
    /// as given and duplicates are allowed.
    pub fn add_participant(&mut self, name: &str, phone: &str) -> Result<&Participant> {
        if name.is_empty() || phone.is_empty() {
            return Err(AppError::Validation(
                "Please provide both name and phone number for the participant.".to_string(),
            ));
        }

        self.participants.push(Participant::new(name, phone));
        tracing::debug!("Added participant {} ({} total)", name, self.participants.len());

        // just pushed
        Ok(&self.participants[self.participants.len() - 1])
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// True once every participant has a recipient
    pub fn is_assigned(&self) -> bool {
        !self.participants.is_empty() && self.participants.iter().all(|p| p.assigned_to.is_some())
    }
}

impl From<Vec<Participant>> for Roster {
    fn from(participants: Vec<Participant>) -> Self {
        Self { participants }
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
