//! Submission classification.
//!
//! `classify` sorts an attempted word submission into a legality
//! category. The checks run in a fixed short-circuit order; the order is
//! a precedence contract (a too-short submission of unavailable tiles
//! reports `InvalidLength`, not `InvalidLetterNotAvailable`).

use rustc_hash::FxHashSet;
use tracing::error;

use crate::core::{Game, PlayerId, RejectReason, TileId, WordId};
use crate::dict::Dictionary;
use crate::error::GameError;
use crate::tiles::TileLocation;

/// Legality category of a word submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Fewer tiles than the minimum word length.
    InvalidLength,
    /// No middle tile consumed.
    InvalidNoMiddleTileUsed,
    /// A tile is face down, or part of a word not wholly pulled in.
    InvalidLetterNotAvailable,
    /// The assembled text is not a dictionary word.
    InvalidNotInDictionary,
    /// Word tiles passed the usability check but no whole word could be
    /// matched back. Indicates a usability defect; the applier refuses
    /// to apply it.
    Indeterminate,
    /// A fresh word claimed entirely from middle tiles.
    NewMiddleWord,
    /// The submitter extended their own word.
    OwnWordImprovement(WordId),
    /// One or more opponent words are consumed. Candidates are ordered
    /// by current owner's score descending; the first is the primary
    /// steal target for scoring and attribution.
    StealWord(Vec<WordId>),
}

impl Classification {
    /// Whether the submission mutates the board.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            Self::NewMiddleWord | Self::OwnWordImprovement(_) | Self::StealWord(_)
        )
    }

    /// The log reason for a rejected submission.
    #[must_use]
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::InvalidLength => Some(RejectReason::TooShort),
            Self::InvalidNoMiddleTileUsed => Some(RejectReason::NoMiddleTile),
            Self::InvalidLetterNotAvailable => Some(RejectReason::LetterNotAvailable),
            Self::InvalidNotInDictionary => Some(RejectReason::NotInDictionary),
            Self::Indeterminate => Some(RejectReason::Indeterminate),
            Self::NewMiddleWord | Self::OwnWordImprovement(_) | Self::StealWord(_) => None,
        }
    }
}

/// Classify a submission against a game snapshot.
///
/// Pure: identical inputs always yield the identical category. Malformed
/// input (unknown player, unknown or duplicated tile ids) is an error,
/// not a rejection category.
pub fn classify(
    game: &Game,
    player: &PlayerId,
    tile_ids: &[TileId],
    dict: &dyn Dictionary,
) -> Result<Classification, GameError> {
    if game.player(player).is_none() {
        return Err(GameError::PlayerNotFound(player.clone()));
    }

    let mut candidate: FxHashSet<TileId> = FxHashSet::default();
    for &id in tile_ids {
        game.tile(id)?;
        if !candidate.insert(id) {
            return Err(GameError::DuplicateTile(id));
        }
    }

    if tile_ids.len() < game.config().min_word_length {
        return Ok(Classification::InvalidLength);
    }

    let middle_used: FxHashSet<TileId> = tile_ids
        .iter()
        .copied()
        .filter(|&id| game.tiles[id.index()].is_middle())
        .collect();
    if middle_used.is_empty() {
        return Ok(Classification::InvalidNoMiddleTileUsed);
    }

    // A non-middle tile is only usable if its whole word is pulled in
    for &id in tile_ids {
        if middle_used.contains(&id) {
            continue;
        }
        let usable = match game.tiles[id.index()].location {
            TileLocation::Word(word_id) => {
                let word = game.word(word_id)?;
                word.is_valid() && word.tile_ids.iter().all(|t| candidate.contains(t))
            }
            TileLocation::Pool | TileLocation::Middle => false,
        };
        if !usable {
            return Ok(Classification::InvalidLetterNotAvailable);
        }
    }

    let text = submission_text(game, tile_ids)?;
    if !dict.is_word(&text.to_lowercase()) {
        return Ok(Classification::InvalidNotInDictionary);
    }

    if middle_used.len() == tile_ids.len() {
        return Ok(Classification::NewMiddleWord);
    }

    // Whole words consumed by this submission, in ledger id order
    let mut subsumed: Vec<&crate::words::Word> = game
        .valid_words()
        .filter(|w| w.tile_ids.iter().all(|t| candidate.contains(t)))
        .collect();
    subsumed.sort_by_key(|w| w.id);

    if subsumed.is_empty() {
        error!(
            game = %game.id(),
            %player,
            word = %text,
            "usability passed but no whole word is subsumed"
        );
        return Ok(Classification::Indeterminate);
    }

    // Any subsumed word of the submitter's own makes this an
    // improvement, never a steal of their own word
    if let Some(own) = subsumed.iter().find(|w| &w.owner == player) {
        return Ok(Classification::OwnWordImprovement(own.id));
    }

    let mut candidates: Vec<(i32, WordId)> = Vec::with_capacity(subsumed.len());
    for word in &subsumed {
        let owner = game
            .player(&word.owner)
            .ok_or_else(|| GameError::PlayerNotFound(word.owner.clone()))?;
        candidates.push((owner.score, word.id));
    }
    // Highest-scoring owner first; stable sort keeps id order on ties
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(Classification::StealWord(
        candidates.into_iter().map(|(_, id)| id).collect(),
    ))
}

/// Assemble the submission's text in tile order.
///
/// Every tile that reaches this point is flipped; a letterless tile here
/// means the aggregate is corrupt.
pub(crate) fn submission_text(game: &Game, tile_ids: &[TileId]) -> Result<String, GameError> {
    tile_ids
        .iter()
        .map(|&id| {
            game.tile(id)?.letter.ok_or_else(|| {
                GameError::Inconsistency(format!("{id} has no letter during text assembly"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameId};
    use crate::dict::WordList;
    use crate::words::{TransitionKind, Word};

    fn dict() -> WordList {
        WordList::new(["cat", "cats", "taco", "tacos"])
    }

    /// Two players, tiles 0..=4 flipped to C A T S O in the middle.
    fn board() -> Game {
        let mut counts = [0; 26];
        counts[2] = 1; // C
        counts[0] = 1; // A
        counts[19] = 1; // T
        counts[18] = 1; // S
        counts[14] = 1; // O

        let game = Game::new(
            GameId::new("TEST"),
            GameConfig::new().with_letter_counts(counts),
            42,
        );
        let game = game.join(PlayerId::new("alice"), "Alice", 1).unwrap();
        let mut game = game.join(PlayerId::new("bob"), "Bob", 2).unwrap();

        for (i, letter) in ['C', 'A', 'T', 'S', 'O'].into_iter().enumerate() {
            game.tiles[i].letter = Some(letter);
            game.tiles[i].location = TileLocation::Middle;
        }
        game.bag = crate::tiles::LetterBag::new([0; 26]);
        game.check_tile_partition().unwrap();
        game
    }

    /// Give `owner` the word CAT built from tiles 0, 1, 2.
    fn with_cat(mut game: Game, owner: &str) -> (Game, WordId) {
        let id = game.alloc_word_id();
        let word = Word::new(
            id,
            "CAT".into(),
            vec![TileId(0), TileId(1), TileId(2)],
            PlayerId::new(owner),
            None,
            TransitionKind::MiddleClaim,
            1,
        );
        for t in 0..3 {
            game.tiles[t].location = TileLocation::Word(id);
        }
        game.words.insert(id, word);
        game.check_tile_partition().unwrap();
        (game, id)
    }

    fn tiles(ids: &[u32]) -> Vec<TileId> {
        ids.iter().copied().map(TileId).collect()
    }

    #[test]
    fn test_too_short() {
        let game = board();
        let c = classify(&game, &PlayerId::new("alice"), &tiles(&[0, 1]), &dict()).unwrap();
        assert_eq!(c, Classification::InvalidLength);
    }

    #[test]
    fn test_unknown_player_is_error() {
        let game = board();
        let err = classify(&game, &PlayerId::new("mallory"), &tiles(&[0, 1, 2]), &dict());
        assert!(matches!(err, Err(GameError::PlayerNotFound(_))));
    }

    #[test]
    fn test_duplicate_tile_is_error() {
        let game = board();
        let err = classify(&game, &PlayerId::new("alice"), &tiles(&[0, 1, 1]), &dict());
        assert!(matches!(err, Err(GameError::DuplicateTile(TileId(1)))));
    }

    #[test]
    fn test_unknown_tile_is_error() {
        let game = board();
        let err = classify(&game, &PlayerId::new("alice"), &tiles(&[0, 1, 99]), &dict());
        assert!(matches!(err, Err(GameError::TileNotFound(TileId(99)))));
    }

    #[test]
    fn test_unflipped_tile_short_circuits_as_length_first() {
        let mut counts = [0; 26];
        counts[0] = 3;
        let game = Game::new(
            GameId::new("TEST"),
            GameConfig::new().with_letter_counts(counts),
            1,
        )
        .join(PlayerId::new("alice"), "Alice", 1)
        .unwrap();

        // Three pool tiles: passes length, fails the middle-tile check
        let c = classify(&game, &PlayerId::new("alice"), &tiles(&[0, 1, 2]), &dict()).unwrap();
        assert_eq!(c, Classification::InvalidNoMiddleTileUsed);
    }

    #[test]
    fn test_new_middle_word() {
        let game = board();
        let c = classify(&game, &PlayerId::new("alice"), &tiles(&[0, 1, 2]), &dict()).unwrap();
        assert_eq!(c, Classification::NewMiddleWord);
    }

    #[test]
    fn test_not_in_dictionary() {
        let game = board();
        // TAC is not in the list
        let c = classify(&game, &PlayerId::new("alice"), &tiles(&[2, 1, 0]), &dict()).unwrap();
        assert_eq!(c, Classification::InvalidNotInDictionary);
    }

    #[test]
    fn test_own_word_improvement() {
        let (game, cat) = with_cat(board(), "alice");
        let c = classify(&game, &PlayerId::new("alice"), &tiles(&[0, 1, 2, 3]), &dict()).unwrap();
        assert_eq!(c, Classification::OwnWordImprovement(cat));
    }

    #[test]
    fn test_steal_word() {
        let (game, cat) = with_cat(board(), "alice");
        let c = classify(&game, &PlayerId::new("bob"), &tiles(&[2, 1, 0, 4, 3]), &dict()).unwrap();
        assert_eq!(c, Classification::StealWord(vec![cat]));
    }

    #[test]
    fn test_partial_word_pull_is_letter_not_available() {
        let (game, _) = with_cat(board(), "alice");
        // Uses C and A from CAT but leaves T behind: TACO without tile 2
        let c = classify(&game, &PlayerId::new("bob"), &tiles(&[0, 1, 4, 3]), &dict());
        // tiles 0(C) 1(A) 4(O) 3(S) spell CAOS; availability fails before dictionary
        assert_eq!(c.unwrap(), Classification::InvalidLetterNotAvailable);
    }

    #[test]
    fn test_resubmitting_claimed_word_is_letter_not_available() {
        let (game, _) = with_cat(board(), "alice");
        // CAT again, but its tiles now live in a word and no middle tile is used
        let c = classify(&game, &PlayerId::new("bob"), &tiles(&[0, 1, 2]), &dict()).unwrap();
        assert_eq!(c, Classification::InvalidNoMiddleTileUsed);
    }

    #[test]
    fn test_classify_is_pure() {
        let (game, _) = with_cat(board(), "alice");
        let submission = tiles(&[2, 1, 0, 4, 3]);
        let a = classify(&game, &PlayerId::new("bob"), &submission, &dict()).unwrap();
        let b = classify(&game, &PlayerId::new("bob"), &submission, &dict()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_own_word_wins_over_lower_id_opponent_word() {
        let mut counts = [0; 26];
        for l in ['C', 'A', 'T', 'S', 'O', 'N', 'R'] {
            counts[l as usize - 'A' as usize] = 1;
        }

        let game = Game::new(
            GameId::new("TEST"),
            GameConfig::new().with_letter_counts(counts),
            7,
        );
        let game = game.join(PlayerId::new("alice"), "Alice", 1).unwrap();
        let mut game = game.join(PlayerId::new("bob"), "Bob", 2).unwrap();

        for (i, letter) in ['C', 'A', 'T', 'S', 'O', 'N', 'R'].into_iter().enumerate() {
            game.tiles[i].letter = Some(letter);
            game.tiles[i].location = TileLocation::Middle;
        }
        game.bag = crate::tiles::LetterBag::new([0; 26]);

        // bob's CAT gets the lower word id, alice's SON the higher
        let cat = game.alloc_word_id();
        game.words.insert(
            cat,
            Word::new(
                cat,
                "CAT".into(),
                vec![TileId(0), TileId(1), TileId(2)],
                PlayerId::new("bob"),
                None,
                TransitionKind::MiddleClaim,
                1,
            ),
        );
        let son = game.alloc_word_id();
        game.words.insert(
            son,
            Word::new(
                son,
                "SON".into(),
                vec![TileId(3), TileId(4), TileId(5)],
                PlayerId::new("alice"),
                None,
                TransitionKind::MiddleClaim,
                2,
            ),
        );
        for t in 0..3 {
            game.tiles[t].location = TileLocation::Word(cat);
        }
        for t in 3..6 {
            game.tiles[t].location = TileLocation::Word(son);
        }
        game.check_tile_partition().unwrap();

        let dict = WordList::new(["cartons"]);
        // CARTONS subsumes both words plus the middle R
        let submission = tiles(&[0, 1, 6, 2, 4, 5, 3]);
        let c = classify(&game, &PlayerId::new("alice"), &submission, &dict).unwrap();

        assert_eq!(c, Classification::OwnWordImprovement(son));
    }

    #[test]
    fn test_steal_candidates_ordered_by_owner_score() {
        let mut counts = [0; 26];
        counts[2] = 2; // C C
        counts[0] = 2; // A A
        counts[19] = 2; // T T
        counts[18] = 2; // S S
        counts[14] = 2; // O O

        let game = Game::new(
            GameId::new("TEST"),
            GameConfig::new().with_letter_counts(counts),
            7,
        );
        let game = game.join(PlayerId::new("alice"), "Alice", 1).unwrap();
        let game = game.join(PlayerId::new("bob"), "Bob", 2).unwrap();
        let mut game = game.join(PlayerId::new("carol"), "Carol", 3).unwrap();

        for (i, letter) in ['C', 'A', 'T', 'C', 'A', 'T', 'S', 'O']
            .into_iter()
            .enumerate()
        {
            game.tiles[i].letter = Some(letter);
            game.tiles[i].location = TileLocation::Middle;
        }
        game.bag = crate::tiles::LetterBag::new({
            let mut left = counts;
            left[2] = 0;
            left[0] = 0;
            left[19] = 0;
            left[18] -= 1;
            left[14] -= 1;
            left
        });

        // alice owns one CAT, bob owns the other; bob is ahead on score
        let first = game.alloc_word_id();
        game.words.insert(
            first,
            Word::new(
                first,
                "CAT".into(),
                vec![TileId(0), TileId(1), TileId(2)],
                PlayerId::new("alice"),
                None,
                TransitionKind::MiddleClaim,
                1,
            ),
        );
        let second = game.alloc_word_id();
        game.words.insert(
            second,
            Word::new(
                second,
                "CAT".into(),
                vec![TileId(3), TileId(4), TileId(5)],
                PlayerId::new("bob"),
                None,
                TransitionKind::MiddleClaim,
                2,
            ),
        );
        for t in 0..3 {
            game.tiles[t].location = TileLocation::Word(first);
        }
        for t in 3..6 {
            game.tiles[t].location = TileLocation::Word(second);
        }
        game.player_mut(&PlayerId::new("alice")).unwrap().score = 3;
        game.player_mut(&PlayerId::new("bob")).unwrap().score = 10;
        game.check_tile_partition().unwrap();

        let dict = WordList::new(["tacocats"]);
        let submission = tiles(&[2, 1, 0, 7, 3, 4, 5, 6]);
        let c = classify(&game, &PlayerId::new("carol"), &submission, &dict).unwrap();

        // bob's word is the primary target
        assert_eq!(c, Classification::StealWord(vec![second, first]));
    }
}
