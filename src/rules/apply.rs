//! Transition application.
//!
//! `apply_submission` turns a classified submission into the next game
//! state. Pure: every effect (tiles, scores, turn, ledger, log) is
//! expressed in the returned `Game`; the caller commits it through the
//! transaction runner.

use rustc_hash::FxHashSet;
use tracing::{debug, error, info};

use crate::core::{
    ActionKind, ActionRecord, Game, PlayerId, TileId, TileIdList, WordId,
};
use crate::error::GameError;
use crate::tiles::TileLocation;
use crate::words::{TransitionKind, Word, WordStatus};

use super::classify::{submission_text, Classification};

/// Result of applying a submission.
#[derive(Clone, Debug)]
pub struct Applied {
    /// The next game state.
    pub game: Game,
    /// The created word, for accepted submissions.
    pub word: Option<WordId>,
}

/// Apply a classified submission to a snapshot.
///
/// Rejected categories only append a log entry; accepted categories
/// move tiles, credit scores, hand the turn to the submitter, and run
/// the win check. `Indeterminate` never applies: it aborts with an
/// internal-consistency error.
pub fn apply_submission(
    game: &Game,
    player: &PlayerId,
    tile_ids: &[TileId],
    classification: &Classification,
    timestamp_ms: u64,
) -> Result<Applied, GameError> {
    if game.is_finished() {
        return Err(GameError::GameFinished(game.id().clone()));
    }
    if game.player(player).is_none() {
        return Err(GameError::PlayerNotFound(player.clone()));
    }

    if let Classification::Indeterminate = classification {
        error!(game = %game.id(), %player, "refusing to apply an indeterminate submission");
        return Err(GameError::Inconsistency(
            "indeterminate classification reached the applier".into(),
        ));
    }

    if let Some(reason) = classification.reject_reason() {
        debug!(game = %game.id(), %player, ?reason, "submission rejected");
        let mut next = game.clone();
        let text = submission_text(game, tile_ids).ok();
        next.record_action(ActionRecord::new(
            player.clone(),
            timestamp_ms,
            ActionKind::SubmissionRejected {
                reason,
                tile_ids: TileIdList::from_slice(tile_ids),
                text,
            },
        ));
        return Ok(Applied {
            game: next,
            word: None,
        });
    }

    let text = submission_text(game, tile_ids)?;
    let mut next = game.clone();
    let word_id = next.alloc_word_id();

    let (credit, action) = match classification {
        Classification::NewMiddleWord => {
            let action = ActionKind::MiddleWordClaimed {
                word: word_id,
                text: text.clone(),
                tile_ids: TileIdList::from_slice(tile_ids),
            };
            next.words.insert(
                word_id,
                Word::new(
                    word_id,
                    text.clone(),
                    tile_ids.to_vec(),
                    player.clone(),
                    None,
                    TransitionKind::MiddleClaim,
                    timestamp_ms,
                ),
            );
            (tile_ids.len() as i32, action)
        }

        Classification::OwnWordImprovement(previous) => {
            // Other whole words pulled in alongside the improvement
            // target are consumed too; leaving them valid would strand
            // their tile references
            let submitted: FxHashSet<TileId> = tile_ids.iter().copied().collect();
            let mut absorbed: Vec<(WordId, PlayerId)> = next
                .valid_words()
                .filter(|w| w.id != *previous && w.tile_ids.iter().all(|t| submitted.contains(t)))
                .map(|w| (w.id, w.owner.clone()))
                .collect();
            absorbed.sort_by_key(|&(id, _)| id);

            let prior = next
                .words
                .get_mut(previous)
                .ok_or(GameError::WordNotFound(*previous))?;
            // Re-used tiles are not re-scored
            let added = tile_ids
                .iter()
                .filter(|&id| !prior.tile_ids.contains(id))
                .count() as u32;
            prior.retire(
                WordStatus::SupersededByOwner,
                TransitionKind::Improvement,
                timestamp_ms,
            );

            for (id, owner) in absorbed {
                let status = if &owner == player {
                    WordStatus::SupersededByOwner
                } else {
                    WordStatus::Stolen
                };
                let word = next
                    .words
                    .get_mut(&id)
                    .ok_or(GameError::WordNotFound(id))?;
                word.retire(status, TransitionKind::Improvement, timestamp_ms);
            }
            next.words.insert(
                word_id,
                Word::new(
                    word_id,
                    text.clone(),
                    tile_ids.to_vec(),
                    player.clone(),
                    Some(*previous),
                    TransitionKind::Improvement,
                    timestamp_ms,
                ),
            );
            let action = ActionKind::WordImproved {
                word: word_id,
                previous: *previous,
                text: text.clone(),
                tile_ids: TileIdList::from_slice(tile_ids),
                added,
            };
            (added as i32, action)
        }

        Classification::StealWord(candidates) => {
            let primary_id = *candidates
                .first()
                .ok_or_else(|| GameError::Inconsistency("steal with no candidates".into()))?;
            let primary = next.word(primary_id)?;
            let robbed = primary.owner.clone();
            let penalty = primary.len() as u32;

            for id in candidates {
                let word = next
                    .words
                    .get_mut(id)
                    .ok_or(GameError::WordNotFound(*id))?;
                word.retire(WordStatus::Stolen, TransitionKind::Steal, timestamp_ms);
            }
            next.words.insert(
                word_id,
                Word::new(
                    word_id,
                    text.clone(),
                    tile_ids.to_vec(),
                    player.clone(),
                    Some(primary_id),
                    TransitionKind::Steal,
                    timestamp_ms,
                ),
            );

            let victim = next
                .player_mut(&robbed)
                .ok_or_else(|| GameError::PlayerNotFound(robbed.clone()))?;
            victim.score -= penalty as i32;

            let action = ActionKind::WordStolen {
                word: word_id,
                previous: primary_id,
                robbed,
                text: text.clone(),
                tile_ids: TileIdList::from_slice(tile_ids),
                penalty,
            };
            // A steal is scored as a fresh claim
            (tile_ids.len() as i32, action)
        }

        Classification::InvalidLength
        | Classification::InvalidNoMiddleTileUsed
        | Classification::InvalidLetterNotAvailable
        | Classification::InvalidNotInDictionary
        | Classification::Indeterminate => unreachable!("rejections handled above"),
    };

    for &id in tile_ids {
        next.tile_mut(id)?.location = TileLocation::Word(word_id);
    }

    let submitter = next
        .player_mut(player)
        .ok_or_else(|| GameError::PlayerNotFound(player.clone()))?;
    submitter.score += credit;
    let score = submitter.score;

    next.set_turn(player);
    next.record_action(ActionRecord::new(player.clone(), timestamp_ms, action));

    if score >= next.config().win_score {
        info!(game = %next.id(), %player, score, "winning score reached");
        next.declare_winner(player.clone());
    }

    next.check_tile_partition()?;
    info!(game = %next.id(), %player, word = %text, score, "submission applied");

    Ok(Applied {
        game: next,
        word: Some(word_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameId};
    use crate::dict::WordList;
    use crate::rules::classify::classify;

    fn dict() -> WordList {
        WordList::new(["cat", "cats", "oat", "oats"])
    }

    /// Two players; tiles 0..=4 flipped to C A T S O in the middle.
    fn board() -> Game {
        let mut counts = [0; 26];
        counts[2] = 1;
        counts[0] = 1;
        counts[19] = 1;
        counts[18] = 1;
        counts[14] = 1;

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

    fn submit(game: &Game, player: &str, ids: &[u32], ts: u64) -> Applied {
        let player = PlayerId::new(player);
        let tiles: Vec<TileId> = ids.iter().copied().map(TileId).collect();
        let c = classify(game, &player, &tiles, &dict()).unwrap();
        apply_submission(game, &player, &tiles, &c, ts).unwrap()
    }

    #[test]
    fn test_middle_claim_scores_full_length() {
        let game = board();
        let applied = submit(&game, "alice", &[0, 1, 2], 10);

        let next = &applied.game;
        let word = next.word(applied.word.unwrap()).unwrap();
        assert_eq!(word.text, "CAT");
        assert_eq!(word.owner, PlayerId::new("alice"));
        assert!(word.is_valid());

        assert_eq!(next.player(&PlayerId::new("alice")).unwrap().score, 3);
        assert_eq!(next.current_player(), Some(&PlayerId::new("alice")));
        for t in 0..3 {
            assert_eq!(next.tiles[t].location, TileLocation::Word(word.id));
        }
        assert!(next.actions.last().unwrap().is_accepted_submission());
    }

    #[test]
    fn test_rejection_only_logs() {
        let game = board();
        let player = PlayerId::new("bob");
        let tiles: Vec<TileId> = vec![TileId(2), TileId(1), TileId(0)]; // TAC
        let c = classify(&game, &player, &tiles, &dict()).unwrap();
        let applied = apply_submission(&game, &player, &tiles, &c, 10).unwrap();

        let next = &applied.game;
        assert_eq!(applied.word, None);
        assert_eq!(next.player(&player).unwrap().score, 0);
        assert_eq!(next.current_player(), game.current_player());
        assert!(next.words.is_empty());
        assert_eq!(next.actions.len(), game.actions.len() + 1);
        assert!(matches!(
            next.actions.last().unwrap().kind,
            ActionKind::SubmissionRejected { .. }
        ));
    }

    #[test]
    fn test_improvement_credits_only_added_tiles() {
        let game = board();
        let applied = submit(&game, "alice", &[0, 1, 2], 10); // CAT, 3 pts
        let applied = submit(&applied.game, "alice", &[0, 1, 2, 3], 20); // CATS

        let next = &applied.game;
        let alice = next.player(&PlayerId::new("alice")).unwrap();
        assert_eq!(alice.score, 4, "one new tile credits one point");

        let new_word = next.word(applied.word.unwrap()).unwrap();
        assert_eq!(new_word.text, "CATS");
        let prior = next.word(new_word.previous_word.unwrap()).unwrap();
        assert_eq!(prior.status, WordStatus::SupersededByOwner);
        assert_eq!(prior.history.len(), 2);
    }

    #[test]
    fn test_steal_credits_thief_and_debits_owner() {
        let game = board();
        let applied = submit(&game, "alice", &[0, 1, 2], 10); // alice: CAT, 3 pts
        let applied = submit(&applied.game, "bob", &[0, 1, 2, 3], 20); // bob steals CATS

        let next = &applied.game;
        assert_eq!(next.player(&PlayerId::new("bob")).unwrap().score, 4);
        assert_eq!(next.player(&PlayerId::new("alice")).unwrap().score, 0);

        let stolen = next.word(WordId(0)).unwrap();
        assert_eq!(stolen.status, WordStatus::Stolen);

        let new_word = next.word(applied.word.unwrap()).unwrap();
        assert_eq!(new_word.owner, PlayerId::new("bob"));
        assert_eq!(new_word.previous_word, Some(WordId(0)));
        assert!(matches!(
            next.actions.last().unwrap().kind,
            ActionKind::WordStolen { penalty: 3, .. }
        ));
        assert_eq!(next.current_player(), Some(&PlayerId::new("bob")));
    }

    /// Two players, tiles 0..=6 flipped to C A T S O N R in the middle.
    fn cartons_board() -> Game {
        let mut counts = [0; 26];
        let letters = ['C', 'A', 'T', 'S', 'O', 'N', 'R'];
        for l in letters {
            counts[l as usize - 'A' as usize] += 1;
        }

        let game = Game::new(
            GameId::new("TEST"),
            GameConfig::new().with_letter_counts(counts),
            42,
        );
        let game = game.join(PlayerId::new("alice"), "Alice", 1).unwrap();
        let mut game = game.join(PlayerId::new("bob"), "Bob", 2).unwrap();

        for (i, letter) in letters.into_iter().enumerate() {
            game.tiles[i].letter = Some(letter);
            game.tiles[i].location = TileLocation::Middle;
        }
        game.bag = crate::tiles::LetterBag::new([0; 26]);
        game.check_tile_partition().unwrap();
        game
    }

    fn submit_with(game: &Game, dict: &WordList, player: &str, ids: &[u32], ts: u64) -> Applied {
        let player = PlayerId::new(player);
        let tiles: Vec<TileId> = ids.iter().copied().map(TileId).collect();
        let c = classify(game, &player, &tiles, dict).unwrap();
        apply_submission(game, &player, &tiles, &c, ts).unwrap()
    }

    #[test]
    fn test_improvement_absorbs_opponent_word() {
        let dict = WordList::new(["cat", "son", "cartons"]);
        let game = cartons_board();

        let applied = submit_with(&game, &dict, "alice", &[0, 1, 2], 10); // CAT
        let cat = applied.word.unwrap();
        let applied = submit_with(&applied.game, &dict, "bob", &[3, 4, 5], 20); // SON
        let son = applied.word.unwrap();

        // CARTONS subsumes alice's CAT and bob's SON plus the middle R
        let applied = submit_with(&applied.game, &dict, "alice", &[0, 1, 6, 2, 4, 5, 3], 30);
        let next = &applied.game;
        next.check_tile_partition().unwrap();

        let improved = next.word(applied.word.unwrap()).unwrap();
        assert_eq!(improved.text, "CARTONS");
        assert_eq!(improved.previous_word, Some(cat));

        assert_eq!(next.word(cat).unwrap().status, WordStatus::SupersededByOwner);
        assert_eq!(next.word(son).unwrap().status, WordStatus::Stolen);
        assert_eq!(next.word(son).unwrap().history.len(), 2);

        // Credit is the set difference against the improved word only
        assert_eq!(next.player(&PlayerId::new("alice")).unwrap().score, 7);
        assert_eq!(next.player(&PlayerId::new("bob")).unwrap().score, 3);

        for t in 0..7 {
            assert_eq!(
                next.tiles[t].location,
                TileLocation::Word(improved.id),
                "tile {t} must move into the improved word"
            );
        }
    }

    #[test]
    fn test_improvement_absorbs_second_own_word() {
        let dict = WordList::new(["cat", "son", "cartons"]);
        let game = cartons_board();

        let applied = submit_with(&game, &dict, "alice", &[0, 1, 2], 10); // CAT
        let cat = applied.word.unwrap();
        let applied = submit_with(&applied.game, &dict, "alice", &[3, 4, 5], 20); // SON
        let son = applied.word.unwrap();

        let applied = submit_with(&applied.game, &dict, "alice", &[0, 1, 6, 2, 4, 5, 3], 30);
        let next = &applied.game;
        next.check_tile_partition().unwrap();

        // The lower-id own word is the improvement target; the other is
        // superseded too, never marked stolen from its own author
        let improved = next.word(applied.word.unwrap()).unwrap();
        assert_eq!(improved.previous_word, Some(cat));
        assert_eq!(next.word(cat).unwrap().status, WordStatus::SupersededByOwner);
        assert_eq!(next.word(son).unwrap().status, WordStatus::SupersededByOwner);

        assert_eq!(next.player(&PlayerId::new("alice")).unwrap().score, 10);
    }

    #[test]
    fn test_steal_can_push_score_negative() {
        let game = board();
        let applied = submit(&game, "alice", &[0, 1, 2], 10);

        // Drain alice's credit before the steal
        let mut drained = applied.game.clone();
        drained.player_mut(&PlayerId::new("alice")).unwrap().score = 1;

        let applied = submit(&drained, "bob", &[0, 1, 2, 3], 20);
        assert_eq!(
            applied.game.player(&PlayerId::new("alice")).unwrap().score,
            -2
        );
    }

    #[test]
    fn test_win_declared_without_turn_advance() {
        let mut counts = [0; 26];
        counts[2] = 1;
        counts[0] = 1;
        counts[19] = 1;

        let game = Game::new(
            GameId::new("TEST"),
            GameConfig::new().with_letter_counts(counts).with_win_score(3),
            42,
        );
        let game = game.join(PlayerId::new("alice"), "Alice", 1).unwrap();
        let mut game = game.join(PlayerId::new("bob"), "Bob", 2).unwrap();
        for (i, letter) in ['C', 'A', 'T'].into_iter().enumerate() {
            game.tiles[i].letter = Some(letter);
            game.tiles[i].location = TileLocation::Middle;
        }
        game.bag = crate::tiles::LetterBag::new([0; 26]);

        let applied = submit(&game, "bob", &[0, 1, 2], 10);
        let next = &applied.game;

        assert!(next.is_finished());
        assert_eq!(
            next.status(),
            &crate::core::GameStatus::WinnerDeclared {
                winner: PlayerId::new("bob")
            }
        );
        assert_eq!(next.current_player(), Some(&PlayerId::new("bob")));

        // No further transitions once the winner is declared
        let err = apply_submission(
            next,
            &PlayerId::new("alice"),
            &[TileId(0)],
            &Classification::InvalidLength,
            11,
        );
        assert!(matches!(err, Err(GameError::GameFinished(_))));
    }

    #[test]
    fn test_indeterminate_never_applies() {
        let game = board();
        let err = apply_submission(
            &game,
            &PlayerId::new("alice"),
            &[TileId(0), TileId(1), TileId(2)],
            &Classification::Indeterminate,
            10,
        );
        assert!(matches!(err, Err(GameError::Inconsistency(_))));
    }
}
