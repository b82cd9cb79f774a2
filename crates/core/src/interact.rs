//! Interaction gateway for the decision points where the slide rules are
//! ambiguous and a human has to choose.
//!
//! The editor only ever talks to the [`InteractionGateway`] trait, so a
//! batch or test run can swap the terminal for a pre-seeded answer table.

use crate::error::{Error, Result};
use crate::types::SongId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::fmt;

/// The kinds of decisions a run may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    /// Replace or keep an already present infoslide.
    ReplaceInfoslide,
    /// Remove or keep a slide whose cleaned text is a single line.
    RemoveSlide,
    /// Pick one font size when a group's slides disagree.
    FontSize,
    /// Pick one item when several candidates match a song.
    CandidateChoice,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecisionKind::ReplaceInfoslide => "replace-infoslide",
            DecisionKind::RemoveSlide => "remove-slide",
            DecisionKind::FontSize => "font-size",
            DecisionKind::CandidateChoice => "candidate-choice",
        };
        f.write_str(name)
    }
}

/// Answer to the "song already has an infoslide" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoslideChoice {
    Replace,
    Keep,
}

/// Answer to the "slide has only one line" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideChoice {
    Remove,
    Keep,
}

/// One method per decision kind. Implementations block until an answer is
/// available: a terminal gateway waits on user input, a scripted gateway
/// returns immediately from its table.
pub trait InteractionGateway {
    /// The song already starts with an infoslide. Replace it?
    fn confirm_replace_infoslide(&self, song: &SongId) -> Result<InfoslideChoice>;

    /// A slide has only `line` left after cleanup. Remove it?
    fn confirm_remove_single_line(&self, song: &SongId, line: &str) -> Result<SlideChoice>;

    /// The group's slides use more than one font size. `candidates` is
    /// ordered by descending frequency, ties by descending size; the
    /// returned value must be one of them.
    fn choose_font_size(&self, song: &SongId, candidates: &[u32]) -> Result<u32>;

    /// Several candidates match the song; return the chosen index.
    fn choose_candidate(&self, song: &SongId, options: &[String]) -> Result<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Infoslide(InfoslideChoice),
    Slide(SlideChoice),
    FontSize(u32),
    Candidate(usize),
}

/// Gateway backed by a pre-seeded answer table, keyed by decision kind and
/// song identity. Multiple answers for the same key are consumed in seeding
/// order (a song can have several single-line prompts).
///
/// A required decision with no seeded answer fails loudly with
/// [`Error::DecisionUnavailable`] instead of guessing.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    answers: RefCell<HashMap<(DecisionKind, SongId), VecDeque<Answer>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_infoslide(&mut self, song: SongId, choice: InfoslideChoice) {
        self.seed(DecisionKind::ReplaceInfoslide, song, Answer::Infoslide(choice));
    }

    pub fn seed_remove_slide(&mut self, song: SongId, choice: SlideChoice) {
        self.seed(DecisionKind::RemoveSlide, song, Answer::Slide(choice));
    }

    pub fn seed_font_size(&mut self, song: SongId, size: u32) {
        self.seed(DecisionKind::FontSize, song, Answer::FontSize(size));
    }

    pub fn seed_candidate(&mut self, song: SongId, index: usize) {
        self.seed(DecisionKind::CandidateChoice, song, Answer::Candidate(index));
    }

    fn seed(&mut self, kind: DecisionKind, song: SongId, answer: Answer) {
        self.answers
            .borrow_mut()
            .entry((kind, song))
            .or_default()
            .push_back(answer);
    }

    fn next(&self, kind: DecisionKind, song: &SongId) -> Result<Answer> {
        self.answers
            .borrow_mut()
            .get_mut(&(kind, *song))
            .and_then(VecDeque::pop_front)
            .ok_or(Error::DecisionUnavailable { song: *song, kind })
    }
}

impl InteractionGateway for ScriptedGateway {
    fn confirm_replace_infoslide(&self, song: &SongId) -> Result<InfoslideChoice> {
        match self.next(DecisionKind::ReplaceInfoslide, song)? {
            Answer::Infoslide(choice) => Ok(choice),
            _ => unreachable!("answer seeded under replace-infoslide key"),
        }
    }

    fn confirm_remove_single_line(&self, song: &SongId, _line: &str) -> Result<SlideChoice> {
        match self.next(DecisionKind::RemoveSlide, song)? {
            Answer::Slide(choice) => Ok(choice),
            _ => unreachable!("answer seeded under remove-slide key"),
        }
    }

    fn choose_font_size(&self, song: &SongId, candidates: &[u32]) -> Result<u32> {
        match self.next(DecisionKind::FontSize, song)? {
            Answer::FontSize(size) if candidates.contains(&size) => Ok(size),
            Answer::FontSize(_) => Err(Error::DecisionUnavailable {
                song: *song,
                kind: DecisionKind::FontSize,
            }),
            _ => unreachable!("answer seeded under font-size key"),
        }
    }

    fn choose_candidate(&self, song: &SongId, options: &[String]) -> Result<usize> {
        match self.next(DecisionKind::CandidateChoice, song)? {
            Answer::Candidate(index) if index < options.len() => Ok(index),
            Answer::Candidate(_) => Err(Error::DecisionUnavailable {
                song: *song,
                kind: DecisionKind::CandidateChoice,
            }),
            _ => unreachable!("answer seeded under candidate-choice key"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Book;

    fn song() -> SongId {
        SongId::new(Book::Dds, 42)
    }

    #[test]
    fn test_unseeded_decision_fails_loudly() {
        let gateway = ScriptedGateway::new();
        let err = gateway.confirm_replace_infoslide(&song()).unwrap_err();
        assert!(matches!(
            err,
            Error::DecisionUnavailable {
                kind: DecisionKind::ReplaceInfoslide,
                ..
            }
        ));
    }

    #[test]
    fn test_seeded_answers_consumed_in_order() {
        let mut gateway = ScriptedGateway::new();
        gateway.seed_remove_slide(song(), SlideChoice::Keep);
        gateway.seed_remove_slide(song(), SlideChoice::Remove);

        assert_eq!(
            gateway.confirm_remove_single_line(&song(), "a").unwrap(),
            SlideChoice::Keep
        );
        assert_eq!(
            gateway.confirm_remove_single_line(&song(), "b").unwrap(),
            SlideChoice::Remove
        );
        // Table is exhausted now.
        assert!(gateway.confirm_remove_single_line(&song(), "c").is_err());
    }

    #[test]
    fn test_answers_keyed_by_song() {
        let mut gateway = ScriptedGateway::new();
        gateway.seed_font_size(SongId::new(Book::Sos, 1), 72);

        let err = gateway.choose_font_size(&song(), &[72, 90]).unwrap_err();
        assert!(matches!(err, Error::DecisionUnavailable { .. }));
    }

    #[test]
    fn test_font_size_answer_must_be_a_candidate() {
        let mut gateway = ScriptedGateway::new();
        gateway.seed_font_size(song(), 60);
        assert!(gateway.choose_font_size(&song(), &[72, 90]).is_err());
    }

    #[test]
    fn test_candidate_index_bounds_checked() {
        let mut gateway = ScriptedGateway::new();
        gateway.seed_candidate(song(), 5);
        let options = vec!["a.pro".to_string(), "b.pro".to_string()];
        assert!(gateway.choose_candidate(&song(), &options).is_err());
    }
}
