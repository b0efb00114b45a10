use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{Role, Turn};

/// Which author the transcript expects next.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TranscriptState {
    /// The next turn must come from the user.
    ExpectingUserTurn,

    /// A user turn is waiting on a model reply.
    ExpectingModelTurn,
}

impl TranscriptState {
    /// The role of the turn this state accepts.
    pub fn expected_role(&self) -> Role {
        match self {
            TranscriptState::ExpectingUserTurn => Role::User,
            TranscriptState::ExpectingModelTurn => Role::Model,
        }
    }
}

/// The ordered history of one conversation.
///
/// Turns strictly alternate user, model, user, ... and the first turn is
/// always the user's.  Appends that would break the alternation are
/// rejected with an input error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// The author the transcript accepts next.
    pub fn state(&self) -> TranscriptState {
        match self.turns.last().map(Turn::role) {
            Some(Role::User) => TranscriptState::ExpectingModelTurn,
            Some(Role::Model) | None => TranscriptState::ExpectingUserTurn,
        }
    }

    /// Appends a turn if its role is the one the transcript expects.
    pub fn push(&mut self, turn: Turn) -> Result<()> {
        let expected = self.state().expected_role();
        if turn.role() != expected {
            return Err(Error::input(format!(
                "transcript expects a {expected} turn next, got a {} turn",
                turn.role()
            )));
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Removes and returns a trailing user turn that never got a reply.
    pub(crate) fn pop_pending(&mut self) -> Option<Turn> {
        if self.state() == TranscriptState::ExpectingModelTurn {
            self.turns.pop()
        } else {
            None
        }
    }

    /// The trailing user turn that is waiting on a reply, if any.
    pub fn pending(&self) -> Option<&Turn> {
        self.turns.last().filter(|turn| turn.role() == Role::User)
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Iterates over the turns, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// The number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when no turn has been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent model reply, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role() == Role::Model)
            .map(Turn::text)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_expects_user() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.state(), TranscriptState::ExpectingUserTurn);
        assert!(transcript.last_reply().is_none());
    }

    #[test]
    fn alternation_is_enforced() {
        let mut transcript = Transcript::new();
        assert!(transcript.push(Turn::model("too early")).unwrap_err().is_input());

        transcript.push(Turn::user("one")).unwrap();
        assert_eq!(transcript.state(), TranscriptState::ExpectingModelTurn);
        assert!(transcript.push(Turn::user("two")).unwrap_err().is_input());

        transcript.push(Turn::model("reply")).unwrap();
        assert_eq!(transcript.state(), TranscriptState::ExpectingUserTurn);
        assert!(transcript.push(Turn::model("again")).unwrap_err().is_input());
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last_reply(), Some("reply"));
    }

    #[test]
    fn pop_pending_only_removes_unanswered_user_turn() {
        let mut transcript = Transcript::new();
        assert!(transcript.pop_pending().is_none());

        transcript.push(Turn::user("q")).unwrap();
        transcript.push(Turn::model("a")).unwrap();
        assert!(transcript.pending().is_none());
        assert!(transcript.pop_pending().is_none());
        assert_eq!(transcript.len(), 2);

        transcript.push(Turn::user("q2")).unwrap();
        assert_eq!(transcript.pending().map(Turn::text), Some("q2"));
        assert_eq!(transcript.pop_pending(), Some(Turn::user("q2")));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.state(), TranscriptState::ExpectingUserTurn);
    }

    #[test]
    fn serializes_as_turn_list() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user("hi")).unwrap();
        let json = serde_json::to_value(&transcript).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"turns": [{"role": "user", "text": "hi"}]})
        );
    }
}
