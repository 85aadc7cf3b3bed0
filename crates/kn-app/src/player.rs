//! Players: named handles onto a dog in a session.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use kn_core::{DogId, MapId};
use serde::{Deserialize, Serialize};

/// Identifier of a player, unique for the lifetime of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player. It names a dog by `(map_id, dog_id)` and owns neither; the dog
/// is looked up in the game on every access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Session the dog lives in.
    pub map_id: MapId,
    /// The controlled dog.
    pub dog_id: DogId,
}

/// All live players, indexed by id and by the dog they control.
#[derive(Debug, Default)]
pub struct Players {
    by_id: BTreeMap<PlayerId, Player>,
    by_dog: HashMap<(MapId, DogId), PlayerId>,
}

impl Players {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. A previous player with the same id or the same dog is
    /// replaced.
    pub fn add(&mut self, player: Player) {
        if let Some(old) = self.by_dog.insert((player.map_id.clone(), player.dog_id), player.id)
            && old != player.id
        {
            self.by_id.remove(&old);
        }
        if let Some(old) = self.by_id.insert(player.id, player.clone())
            && (old.map_id != player.map_id || old.dog_id != player.dog_id)
        {
            self.by_dog.remove(&(old.map_id, old.dog_id));
        }
    }

    /// Look up a player by id.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.by_id.get(&id)
    }

    /// The player controlling a dog.
    pub fn find_by_dog(&self, map_id: &MapId, dog_id: DogId) -> Option<&Player> {
        self.by_dog
            .get(&(map_id.clone(), dog_id))
            .and_then(|id| self.by_id.get(id))
    }

    /// Remove a player, returning it.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let player = self.by_id.remove(&id)?;
        self.by_dog.remove(&(player.map_id.clone(), player.dog_id));
        Some(player)
    }

    /// Players on `map_id`, in id order.
    pub fn in_session<'a>(&'a self, map_id: &'a MapId) -> impl Iterator<Item = &'a Player> + 'a {
        self.by_id.values().filter(move |p| &p.map_id == map_id)
    }

    /// All players in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.by_id.values()
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` when nobody is playing.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u64, map: &str, dog: u64) -> Player {
        Player {
            id: PlayerId(id),
            name: format!("player{id}"),
            map_id: MapId::new(map),
            dog_id: DogId(dog),
        }
    }

    #[test]
    fn lookup_by_id_and_dog() {
        let mut players = Players::new();
        players.add(player(1, "m1", 1));
        players.add(player(2, "m2", 1));

        assert_eq!(players.get(PlayerId(1)).unwrap().name, "player1");
        assert_eq!(players.find_by_dog(&MapId::new("m2"), DogId(1)).unwrap().id, PlayerId(2));
        assert!(players.find_by_dog(&MapId::new("m1"), DogId(2)).is_none());
    }

    #[test]
    fn session_filter() {
        let mut players = Players::new();
        players.add(player(3, "m1", 2));
        players.add(player(1, "m1", 1));
        players.add(player(2, "m2", 1));

        let map = MapId::new("m1");
        let ids: Vec<_> = players.in_session(&map).map(|p| p.id).collect();
        assert_eq!(ids, vec![PlayerId(1), PlayerId(3)]);
    }

    #[test]
    fn remove_clears_both_indexes() {
        let mut players = Players::new();
        players.add(player(1, "m1", 1));
        let removed = players.remove(PlayerId(1)).unwrap();
        assert_eq!(removed.dog_id, DogId(1));
        assert!(players.is_empty());
        assert!(players.find_by_dog(&MapId::new("m1"), DogId(1)).is_none());
        assert!(players.remove(PlayerId(1)).is_none());
    }

    #[test]
    fn readding_a_dog_replaces_its_player() {
        let mut players = Players::new();
        players.add(player(1, "m1", 1));
        players.add(player(2, "m1", 1));
        assert_eq!(players.len(), 1);
        assert!(players.get(PlayerId(1)).is_none());
        assert_eq!(players.find_by_dog(&MapId::new("m1"), DogId(1)).unwrap().id, PlayerId(2));
    }
}
