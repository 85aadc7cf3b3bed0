use kn_core::{DogId, MapId};

use crate::session::GameSession;

/// A dog that idled past the retirement threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetiredDog {
    /// The retired dog.
    pub dog_id: DogId,
    /// The map whose session holds the dog.
    pub map_id: MapId,
}

/// Receives retirement batches synchronously during a tick.
///
/// The listener is handed the session so it can read the retired dogs'
/// final state and remove them. A session never removes dogs on its own;
/// it reports each retirement once, and a dog the listener leaves in place
/// is not reported again until it has moved and idled out anew.
pub trait RetirementListener {
    /// Handle one non-empty batch of retirements from `session`.
    fn on_retire(&mut self, session: &mut GameSession, batch: &[RetiredDog]);
}

impl<F> RetirementListener for F
where
    F: FnMut(&mut GameSession, &[RetiredDog]),
{
    fn on_retire(&mut self, session: &mut GameSession, batch: &[RetiredDog]) {
        self(session, batch)
    }
}

/// A listener that leaves retired dogs where they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreRetirements;

impl RetirementListener for IgnoreRetirements {
    fn on_retire(&mut self, _session: &mut GameSession, _batch: &[RetiredDog]) {}
}
