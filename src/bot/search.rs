//! Bot move enumeration.
//!
//! The bot discovers legal moves from a snapshot by combining tiles and
//! looking the resulting letter multisets up in the anagram index:
//! middle-tile combinations yield fresh claims, and every valid word
//! crossed with every middle subset yields extensions, tagged steal or
//! improvement by current ownership. Each candidate word is then mapped
//! greedily letter-by-letter onto concrete tile ids.

use crate::core::{Game, GameRng, PlayerId, TileId};
use crate::dict::anagram::AnagramIndex;

/// Subset enumeration is exponential in the middle tile count; only the
/// first this-many middle tiles (in id order) are searched.
const MAX_POOL_SUBSET: usize = 18;

/// Category of a discovered move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotMoveKind {
    /// Fresh claim from middle tiles only.
    MiddleWord,
    /// Consumes an opponent's word.
    Steal,
    /// Extends the bot's own word.
    Improvement,
}

/// One playable submission the search found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotMove {
    /// Category the move was discovered under.
    pub kind: BotMoveKind,
    /// The word, uppercase.
    pub text: String,
    /// Concrete tiles in word-letter order.
    pub tile_ids: Vec<TileId>,
}

/// All moves found from one snapshot, grouped by preference category.
#[derive(Clone, Debug, Default)]
pub struct MoveSet {
    /// Fresh middle claims.
    pub middle: Vec<BotMove>,
    /// Steals of opponent words.
    pub steals: Vec<BotMove>,
    /// Extensions of the bot's own words.
    pub improvements: Vec<BotMove>,
}

impl MoveSet {
    /// Whether no move was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middle.is_empty() && self.steals.is_empty() && self.improvements.is_empty()
    }

    /// Pick a move: any middle claim beats any steal beats any
    /// improvement, uniformly at random within the chosen category.
    ///
    /// Middle claims are preferred to keep the shared pool draining.
    #[must_use]
    pub fn choose<'a>(&'a self, rng: &mut GameRng) -> Option<&'a BotMove> {
        if !self.middle.is_empty() {
            return rng.choose(&self.middle);
        }
        if !self.steals.is_empty() {
            return rng.choose(&self.steals);
        }
        rng.choose(&self.improvements)
    }
}

/// Enumerate every legal move the bot can see in `game`.
///
/// Deterministic: the same snapshot always yields the same moves in the
/// same order, so a replayed transaction re-derives the same choice.
#[must_use]
pub fn enumerate_moves(game: &Game, bot: &PlayerId, index: &AnagramIndex) -> MoveSet {
    let min_len = game.config().min_word_length;

    let mut middle: Vec<(TileId, char)> = game
        .middle_tiles()
        .filter_map(|t| t.letter.map(|l| (t.id, l.to_ascii_lowercase())))
        .collect();
    middle.sort_by_key(|&(id, _)| id);
    let pool = &middle[..middle.len().min(MAX_POOL_SUBSET)];

    let mut words: Vec<_> = game.valid_words().collect();
    words.sort_by_key(|w| w.id);

    let mut moves = MoveSet::default();

    for mask in 1u32..(1 << pool.len() as u32) {
        let subset: Vec<(TileId, char)> = pool
            .iter()
            .enumerate()
            .filter(|&(i, _)| mask & (1 << i) != 0)
            .map(|(_, &t)| t)
            .collect();

        if subset.len() >= min_len {
            for candidate in index.lookup(&multiset_key(&subset)) {
                if let Some(tile_ids) = greedy_map(candidate, &subset) {
                    moves.middle.push(BotMove {
                        kind: BotMoveKind::MiddleWord,
                        text: candidate.to_uppercase(),
                        tile_ids,
                    });
                }
            }
        }

        for word in &words {
            let mut available: Vec<(TileId, char)> = word
                .tile_ids
                .iter()
                .zip(word.text.chars())
                .map(|(&id, c)| (id, c.to_ascii_lowercase()))
                .collect();
            available.extend_from_slice(&subset);

            for candidate in index.lookup(&multiset_key(&available)) {
                if let Some(tile_ids) = greedy_map(candidate, &available) {
                    let kind = if &word.owner == bot {
                        BotMoveKind::Improvement
                    } else {
                        BotMoveKind::Steal
                    };
                    let mv = BotMove {
                        kind,
                        text: candidate.to_uppercase(),
                        tile_ids,
                    };
                    match kind {
                        BotMoveKind::Improvement => moves.improvements.push(mv),
                        BotMoveKind::Steal => moves.steals.push(mv),
                        BotMoveKind::MiddleWord => unreachable!(),
                    }
                }
            }
        }
    }

    moves
}

/// Sorted-letter key of a tile set.
fn multiset_key(tiles: &[(TileId, char)]) -> String {
    let mut letters: Vec<char> = tiles.iter().map(|&(_, c)| c).collect();
    letters.sort_unstable();
    letters.into_iter().collect()
}

/// Map each letter of `word` onto an unused tile with that letter, in
/// word order. Fails if any letter cannot be matched.
fn greedy_map(word: &str, available: &[(TileId, char)]) -> Option<Vec<TileId>> {
    let mut used = vec![false; available.len()];
    let mut tile_ids = Vec::with_capacity(word.len());

    for letter in word.chars() {
        let (slot, &(id, _)) = available
            .iter()
            .enumerate()
            .find(|&(i, &(_, c))| !used[i] && c == letter)?;
        used[slot] = true;
        tile_ids.push(id);
    }
    Some(tile_ids)
}
