//! Player tokens.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::player::PlayerId;

/// Number of characters in a rendered token.
pub const TOKEN_LEN: usize = 32;

/// A 128-bit bearer credential rendered as 32 uppercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Build a token from its two 64-bit halves, high half first.
    pub fn from_halves(high: u64, low: u64) -> Self {
        Self(format!("{high:016X}{low:016X}"))
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Token {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        if s.len() != TOKEN_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AppError::InvalidToken);
        }
        Ok(Self(s.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Token {
    type Error = AppError;

    fn try_from(s: String) -> AppResult<Self> {
        s.parse()
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bidirectional index between live tokens and players.
///
/// Both directions are updated together, so a token always maps to a player
/// that maps back to the same token.
pub struct PlayerTokens<R = StdRng> {
    rng: R,
    token_to_player: HashMap<Token, PlayerId>,
    player_to_token: HashMap<PlayerId, Token>,
}

impl<R> fmt::Debug for PlayerTokens<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerTokens")
            .field("tokens", &self.token_to_player.len())
            .finish()
    }
}

impl<R: RngCore> PlayerTokens<R> {
    /// Create an empty registry drawing tokens from `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            token_to_player: HashMap::new(),
            player_to_token: HashMap::new(),
        }
    }

    /// Issue a fresh token for `player`, redrawing until it is unused.
    pub fn issue(&mut self, player: PlayerId) -> Token {
        let token = loop {
            let high = self.rng.next_u64();
            let low = self.rng.next_u64();
            let token = Token::from_halves(high, low);
            if !self.token_to_player.contains_key(&token) {
                break token;
            }
        };
        self.insert(token.clone(), player);
        token
    }

    /// Bind an existing token to `player`, replacing any previous binding of
    /// either side.
    pub fn insert(&mut self, token: Token, player: PlayerId) {
        if let Some(old) = self.player_to_token.insert(player, token.clone()) {
            self.token_to_player.remove(&old);
        }
        if let Some(old) = self
            .token_to_player
            .insert(token, player)
            .filter(|&old| old != player)
        {
            self.player_to_token.remove(&old);
        }
    }

    /// The player holding `token`.
    pub fn find_player(&self, token: &Token) -> Option<PlayerId> {
        self.token_to_player.get(token).copied()
    }

    /// The token held by `player`.
    pub fn token_of(&self, player: PlayerId) -> Option<&Token> {
        self.player_to_token.get(&player)
    }

    /// Invalidate the player's token. Returns it if there was one.
    pub fn remove(&mut self, player: PlayerId) -> Option<Token> {
        let token = self.player_to_token.remove(&player)?;
        self.token_to_player.remove(&token);
        Some(token)
    }

    /// Drop every binding. The RNG keeps its state.
    pub fn clear(&mut self) {
        self.token_to_player.clear();
        self.player_to_token.clear();
    }

    /// Number of live tokens.
    pub fn len(&self) -> usize {
        self.token_to_player.len()
    }

    /// Returns `true` when no token is live.
    pub fn is_empty(&self) -> bool {
        self.token_to_player.is_empty()
    }

    /// Live `(token, player)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Token, PlayerId)> {
        self.token_to_player.iter().map(|(t, &p)| (t, p))
    }
}
