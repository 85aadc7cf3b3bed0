//! The application facade used by a transport layer.
//!
//! [`Application`] ties the [`Game`] to the player and token registries and
//! to a [`ScoreStore`]. Every mutating call takes `&mut self`; a server shares
//! it behind one mutex, which serializes joins, actions and ticks.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use kn_core::{Action, Direction, DogId, LootId, Map, MapId, Position, Speed};
use kn_simulation::{Game, GameSession, RetiredDog, RetirementListener, TickReport};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult};
use crate::player::{Player, PlayerId, Players};
use crate::scores::{ScoreRecord, ScoreStore};
use crate::snapshot::{AppState, PlayerRecord};
use crate::token::{PlayerTokens, Token};

/// Credentials handed out on join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResult {
    /// Bearer token for later requests.
    pub auth_token: Token,
    /// Id of the new player.
    pub player_id: PlayerId,
}

/// A player as seen by the others in the same session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerInfo {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
}

/// An item in a dog's bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BagItem {
    /// Loot id.
    pub id: LootId,
    /// Index into the map's loot types.
    #[serde(rename = "type")]
    pub loot_type: usize,
}

/// A dog as seen by the players of its session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DogView {
    /// Owning player.
    pub player_id: PlayerId,
    /// Current position.
    pub position: Position,
    /// Current velocity.
    pub speed: Speed,
    /// Facing direction.
    pub direction: Direction,
    /// Carried loot.
    pub bag: Vec<BagItem>,
    /// Points delivered so far.
    pub score: i64,
}

/// A loot item lying on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LootView {
    /// Index into the map's loot types.
    #[serde(rename = "type")]
    pub loot_type: usize,
    /// Current position.
    pub position: Position,
}

/// What a player sees of its session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Dogs of every player in the session.
    pub players: Vec<DogView>,
    /// Loot lying on the map.
    pub lost_objects: Vec<LootView>,
}

/// A map in the map list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSummary {
    /// Map id.
    pub id: MapId,
    /// Display name.
    pub name: String,
}

/// Game, players, tokens and scores.
pub struct Application {
    game: Game,
    players: Players,
    tokens: PlayerTokens,
    last_player_id: u64,
    scores: Box<dyn ScoreStore + Send>,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("game", &self.game)
            .field("players", &self.players.len())
            .field("last_player_id", &self.last_player_id)
            .finish()
    }
}

impl Application {
    /// Create an application issuing tokens from OS entropy.
    pub fn new(game: Game, scores: impl ScoreStore + Send + 'static) -> Self {
        Self::with_token_rng(game, scores, StdRng::from_os_rng())
    }

    /// Create an application with a given token RNG, for reproducible runs.
    pub fn with_token_rng(game: Game, scores: impl ScoreStore + Send + 'static, rng: StdRng) -> Self {
        Self {
            game,
            players: Players::new(),
            tokens: PlayerTokens::new(rng),
            last_player_id: 0,
            scores: Box::new(scores),
        }
    }

    /// The underlying game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The underlying game, mutably.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// All live players.
    pub fn players_registry(&self) -> &Players {
        &self.players
    }

    /// Spawn a dog for a new player on `map_id`.
    pub fn join_game(&mut self, name: &str, map_id: &str) -> AppResult<JoinResult> {
        if name.is_empty() {
            return Err(AppError::EmptyName);
        }
        let map_id = MapId::new(map_id);
        if self.game.find_map(&map_id).is_none() {
            return Err(AppError::MapNotFound(map_id));
        }
        let dog_id = self.game.add_dog(&map_id, name)?;

        self.last_player_id += 1;
        let player_id = PlayerId(self.last_player_id);
        self.players.add(Player {
            id: player_id,
            name: name.to_string(),
            map_id: map_id.clone(),
            dog_id,
        });
        let auth_token = self.tokens.issue(player_id);
        info!(player = %player_id, dog = %dog_id, map = %map_id, "player joined");
        Ok(JoinResult {
            auth_token,
            player_id,
        })
    }

    /// Resolve a raw token to its player.
    pub fn authorize(&self, token: &str) -> AppResult<&Player> {
        let token: Token = token.parse()?;
        self.tokens
            .find_player(&token)
            .and_then(|id| self.players.get(id))
            .ok_or(AppError::UnknownToken)
    }

    /// Steer the caller's dog. `command` is `""`, `U`, `D`, `L` or `R`.
    pub fn player_action(&mut self, token: &str, command: &str) -> AppResult<()> {
        let player = self.authorize(token)?;
        let (map_id, dog_id) = (player.map_id.clone(), player.dog_id);
        let action: Action = command.parse()?;
        let session = self
            .game
            .session_mut(&map_id)
            .ok_or_else(|| AppError::MapNotFound(map_id.clone()))?;
        session.apply_action(dog_id, action)?;
        Ok(())
    }

    /// Advance the game. Retired players are removed and their scores
    /// recorded before this returns.
    pub fn tick(&mut self, delta: Duration) -> AppResult<Vec<TickReport>> {
        let mut roster = Roster {
            players: &mut self.players,
            tokens: &mut self.tokens,
            scores: &mut self.scores,
        };
        Ok(self.game.tick(delta, &mut roster)?)
    }

    /// The caller's session: every player's dog and the loot on the map.
    pub fn state(&self, token: &str) -> AppResult<SessionView> {
        let player = self.authorize(token)?;
        let session = self.session_of(player)?;

        let players = self
            .players
            .in_session(&player.map_id)
            .filter_map(|p| session.dog(p.dog_id).map(|dog| (p.id, dog)))
            .map(|(player_id, dog)| DogView {
                player_id,
                position: dog.position(),
                speed: dog.speed(),
                direction: dog.direction(),
                bag: dog
                    .bag()
                    .iter()
                    .map(|l| BagItem {
                        id: l.id,
                        loot_type: l.loot_type,
                    })
                    .collect(),
                score: dog.score(),
            })
            .collect();
        let lost_objects = session
            .loot()
            .iter()
            .map(|l| LootView {
                loot_type: l.loot_type,
                position: l.position,
            })
            .collect();
        Ok(SessionView {
            players,
            lost_objects,
        })
    }

    /// Players sharing the caller's session, in id order.
    pub fn players(&self, token: &str) -> AppResult<Vec<PlayerInfo>> {
        let player = self.authorize(token)?;
        Ok(self
            .players
            .in_session(&player.map_id)
            .map(|p| PlayerInfo {
                id: p.id,
                name: p.name.clone(),
            })
            .collect())
    }

    /// Every map, in registration order.
    pub fn maps(&self) -> Vec<MapSummary> {
        self.game
            .maps()
            .iter()
            .map(|m| MapSummary {
                id: m.id().clone(),
                name: m.name().to_string(),
            })
            .collect()
    }

    /// One map by id.
    pub fn map(&self, id: &str) -> AppResult<&Arc<Map>> {
        let id = MapId::new(id);
        self.game.find_map(&id).ok_or(AppError::MapNotFound(id))
    }

    /// A page of the leaderboard.
    pub fn records(&self, offset: usize, limit: usize) -> AppResult<Vec<ScoreRecord>> {
        self.scores.scores(offset, limit)
    }

    fn session_of(&self, player: &Player) -> AppResult<&GameSession> {
        self.game
            .session(&player.map_id)
            .ok_or_else(|| AppError::MapNotFound(player.map_id.clone()))
    }

    /// Snapshot every session and the player registry.
    pub fn export_state(&self) -> AppState {
        let mut players: Vec<_> = self
            .tokens
            .iter()
            .filter_map(|(token, id)| {
                self.players.get(id).map(|player| PlayerRecord {
                    token: token.clone(),
                    player: player.clone(),
                })
            })
            .collect();
        players.sort_by_key(|r| r.player.id);
        AppState {
            sessions: self.game.sessions().iter().map(GameSession::export_state).collect(),
            players,
            last_player_id: self.last_player_id,
        }
    }

    /// Replace sessions and players with a snapshot.
    ///
    /// The whole snapshot is checked first; nothing changes if any session
    /// or player in it does not fit this game. Sessions the snapshot does
    /// not mention are emptied, since their players are gone too.
    pub fn restore_state(&mut self, state: AppState) -> AppResult<()> {
        let mut dogs: HashMap<&MapId, HashSet<DogId>> = HashMap::new();
        for session_state in &state.sessions {
            let session = self
                .game
                .session(&session_state.map_id)
                .ok_or_else(|| AppError::SessionNotFound(session_state.map_id.clone()))?;
            session.validate_state(session_state)?;
            let ids = session_state.dogs.iter().map(|d| d.id()).collect();
            if dogs.insert(&session_state.map_id, ids).is_some() {
                return Err(AppError::DuplicateSession(session_state.map_id.clone()));
            }
        }

        let mut player_ids = HashSet::new();
        let mut tokens = HashSet::new();
        let mut bindings = HashSet::new();
        for record in &state.players {
            let player = &record.player;
            let known = dogs
                .get(&player.map_id)
                .is_some_and(|ids| ids.contains(&player.dog_id));
            if !known {
                return Err(AppError::DogNotFound {
                    map: player.map_id.clone(),
                    dog: player.dog_id,
                });
            }
            if !player_ids.insert(player.id) {
                return Err(AppError::DuplicatePlayer(player.id));
            }
            if !tokens.insert(&record.token) {
                return Err(AppError::DuplicateToken(player.id));
            }
            if !bindings.insert((&player.map_id, player.dog_id)) {
                return Err(AppError::DuplicateDogBinding {
                    map: player.map_id.clone(),
                    dog: player.dog_id,
                });
            }
        }

        let max_player_id = state.players.iter().map(|r| r.player.id.0).max().unwrap_or(0);
        let restored: HashSet<MapId> = state.sessions.iter().map(|s| s.map_id.clone()).collect();
        for session_state in state.sessions {
            let map_id = session_state.map_id.clone();
            if let Some(session) = self.game.session_mut(&map_id) {
                session.restore_state(session_state)?;
            }
        }
        for session in self.game.sessions_mut() {
            if !restored.contains(session.map_id()) {
                session.clear();
            }
        }
        self.players = Players::new();
        self.tokens.clear();
        for record in state.players {
            self.tokens.insert(record.token, record.player.id);
            self.players.add(record.player);
        }
        self.last_player_id = state.last_player_id.max(max_player_id);
        info!(players = self.players.len(), "state restored");
        Ok(())
    }
}

/// Removes retired dogs together with their players and tokens, and records
/// their final scores.
struct Roster<'a> {
    players: &'a mut Players,
    tokens: &'a mut PlayerTokens,
    scores: &'a mut Box<dyn ScoreStore + Send>,
}

impl RetirementListener for Roster<'_> {
    fn on_retire(&mut self, session: &mut GameSession, batch: &[RetiredDog]) {
        for retired in batch {
            let Some(player_id) = self
                .players
                .find_by_dog(&retired.map_id, retired.dog_id)
                .map(|p| p.id)
            else {
                debug!(dog = %retired.dog_id, map = %retired.map_id, "retired dog has no player");
                continue;
            };
            self.tokens.remove(player_id);
            self.players.remove(player_id);
            let Some(dog) = session.remove_dog(retired.dog_id) else {
                continue;
            };

            let record = ScoreRecord {
                name: dog.name().to_string(),
                score: dog.score(),
                play_time: dog.play_time(),
            };
            info!(player = %player_id, name = %record.name, score = record.score, "player retired");
            if let Err(e) = self.scores.add_score(record) {
                error!(player = %player_id, error = %e, "failed to record score");
            }
        }
    }
}
