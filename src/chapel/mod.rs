pub mod catalog;

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::thread_rng;

pub use catalog::Relic;

/// Correct judgments needed to unlock the chapel clue.
pub const UNLOCK_THRESHOLD: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("there is no relic called '{0}' in this chapel")]
    InvalidRelicId(String),
    #[error("every relic must be judged before submitting")]
    IncompleteSubmission,
}

/// One visitor's walkthrough of the chapel: the shuffled display order, the
/// judgments recorded so far, the submission flag and the relic currently
/// under inspection. Score, completeness and unlock state are recomputed on
/// every read, never cached.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChapelSession {
    relics: Vec<Relic>,
    answers: HashMap<String, bool>,
    submitted: bool,
    active_inspection: Option<String>,
}

impl ChapelSession {
    /// A fresh session with the exhibits in a new random order.
    pub fn new() -> Self {
        let mut relics = catalog::all().to_vec();
        // Fisher-Yates, so every ordering is equally likely
        relics.shuffle(&mut thread_rng());
        Self {
            relics,
            answers: HashMap::new(),
            submitted: false,
            active_inspection: None,
        }
    }

    /// The exhibits in the order this visitor sees them.
    pub fn display_order(&self) -> &[Relic] {
        &self.relics
    }

    pub fn relic(&self, relic_id: &str) -> Option<&Relic> {
        self.relics.iter().find(|r| r.id == relic_id)
    }

    /// The visitor's judgment for a relic, if they have made one.
    pub fn answer_for(&self, relic_id: &str) -> Option<bool> {
        self.answers.get(relic_id).copied()
    }

    /// Records a judgment, overwriting any earlier one for the same relic.
    /// Still allowed after submission; the shell asks for a fresh submit
    /// before it shows an updated score.
    pub fn record_answer(&mut self, relic_id: &str, judgment: bool) -> Result<(), SessionError> {
        if self.relic(relic_id).is_none() {
            return Err(SessionError::InvalidRelicId(relic_id.to_string()));
        }
        self.answers.insert(relic_id.to_string(), judgment);
        Ok(())
    }

    /// Locks in the judgments for grading. Rejected until every relic has
    /// been judged.
    pub fn submit(&mut self) -> Result<(), SessionError> {
        if !self.is_complete() {
            return Err(SessionError::IncompleteSubmission);
        }
        self.submitted = true;
        Ok(())
    }

    pub fn open_inspection(&mut self, relic_id: &str) -> Result<(), SessionError> {
        if self.relic(relic_id).is_none() {
            return Err(SessionError::InvalidRelicId(relic_id.to_string()));
        }
        self.active_inspection = Some(relic_id.to_string());
        Ok(())
    }

    pub fn close_inspection(&mut self) {
        self.active_inspection = None;
    }

    pub fn active_inspection(&self) -> Option<&Relic> {
        self.active_inspection.as_deref().and_then(|id| self.relic(id))
    }

    /// Back to a freshly constructed session, new shuffle included.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_complete(&self) -> bool {
        self.relics.iter().all(|r| self.answers.contains_key(&r.id))
    }

    /// Count of judgments that match the ground truth.
    pub fn score(&self) -> usize {
        self.relics
            .iter()
            .filter(|r| self.answers.get(&r.id).copied() == Some(r.plausible))
            .count()
    }

    pub fn is_unlocked(&self) -> bool {
        self.submitted && self.score() >= UNLOCK_THRESHOLD
    }
}

impl Default for ChapelSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn answer_all(session: &mut ChapelSession, judge: impl Fn(&Relic) -> bool) {
        let relics = session.display_order().to_vec();
        for relic in relics {
            session.record_answer(&relic.id, judge(&relic)).unwrap();
        }
    }

    #[test]
    fn display_order_is_a_permutation_of_the_catalog() {
        let session = ChapelSession::new();
        let shown: HashSet<&str> = session
            .display_order()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        let expected: HashSet<&str> = catalog::all().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(session.display_order().len(), catalog::all().len());
        assert_eq!(shown, expected);
    }

    #[test]
    fn perfect_run_unlocks_the_clue() {
        let mut session = ChapelSession::new();
        answer_all(&mut session, |r| r.plausible);
        session.submit().unwrap();
        assert_eq!(session.score(), 8);
        assert!(session.is_unlocked());
    }

    #[test]
    fn four_correct_stays_locked() {
        // Judging everything plausible matches exactly the four genuine items
        let mut session = ChapelSession::new();
        answer_all(&mut session, |_| true);
        session.submit().unwrap();
        assert_eq!(session.score(), 4);
        assert!(!session.is_unlocked());
    }

    #[test]
    fn five_correct_is_enough() {
        let mut session = ChapelSession::new();
        let relics = session.display_order().to_vec();
        for (i, relic) in relics.iter().enumerate() {
            let judgment = if i < 5 { relic.plausible } else { !relic.plausible };
            session.record_answer(&relic.id, judgment).unwrap();
        }
        session.submit().unwrap();
        assert_eq!(session.score(), 5);
        assert!(session.is_unlocked());
    }

    #[test]
    fn unlock_requires_submission() {
        let mut session = ChapelSession::new();
        answer_all(&mut session, |r| r.plausible);
        assert_eq!(session.score(), 8);
        assert!(!session.is_unlocked());
    }

    #[test]
    fn second_judgment_overwrites_the_first() {
        let mut session = ChapelSession::new();
        session.record_answer("thorn", true).unwrap();
        session.record_answer("thorn", false).unwrap();
        assert_eq!(session.answer_for("thorn"), Some(false));
    }

    #[test]
    fn unknown_relic_is_rejected() {
        let mut session = ChapelSession::new();
        let err = session.record_answer("holy-grail", true).unwrap_err();
        assert!(matches!(err, SessionError::InvalidRelicId(_)));
        assert!(session.answer_for("holy-grail").is_none());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn incomplete_submission_is_rejected() {
        let mut session = ChapelSession::new();
        session.record_answer("thorn", true).unwrap();
        let err = session.submit().unwrap_err();
        assert!(matches!(err, SessionError::IncompleteSubmission));
        assert!(!session.is_submitted());
        assert!(!session.is_unlocked());
    }

    #[test]
    fn completeness_needs_every_relic() {
        let mut session = ChapelSession::new();
        let relics = session.display_order().to_vec();
        for relic in relics.iter().take(7) {
            session.record_answer(&relic.id, true).unwrap();
        }
        assert!(!session.is_complete());
        session.record_answer(&relics[7].id, true).unwrap();
        assert!(session.is_complete());
    }

    #[test]
    fn judgments_stay_editable_after_submission() {
        let mut session = ChapelSession::new();
        answer_all(&mut session, |r| r.plausible);
        session.submit().unwrap();
        session.record_answer("thorn", false).unwrap();
        assert_eq!(session.score(), 7);
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = ChapelSession::new();
        answer_all(&mut session, |r| r.plausible);
        session.submit().unwrap();
        session.reset();
        assert!(!session.is_complete());
        assert!(!session.is_submitted());
        assert!(!session.is_unlocked());
        assert_eq!(session.score(), 0);
        assert!(session
            .display_order()
            .iter()
            .all(|r| session.answer_for(&r.id).is_none()));
        // Still a full chapel after the reshuffle
        let shown: HashSet<&str> = session
            .display_order()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(shown.len(), catalog::all().len());
    }

    #[test]
    fn inspection_never_touches_the_score() {
        let mut session = ChapelSession::new();
        session.open_inspection("gospel-book").unwrap();
        assert_eq!(
            session.active_inspection().map(|r| r.id.as_str()),
            Some("gospel-book")
        );
        assert_eq!(session.score(), 0);
        session.close_inspection();
        assert!(session.active_inspection().is_none());
        assert!(matches!(
            session.open_inspection("spear-of-destiny"),
            Err(SessionError::InvalidRelicId(_))
        ));
    }
}
