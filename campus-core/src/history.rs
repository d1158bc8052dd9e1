//! Conversation history owned by a single chat session.

use crate::types::{Content, Part, Role};
use serde::{Deserialize, Serialize};

/// Default soft cap on retained turns.
pub const DEFAULT_MAX_TURNS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnText {
    pub text: String,
}

/// One turn as it travels on the wire: `{"role": "user", "content": [{"text": "..."}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: Vec<TurnText>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, content: vec![TurnText { text: text.into() }] }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    pub fn text(&self) -> String {
        self.content.iter().map(|t| t.text.as_str()).collect()
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Content {
            role: turn.role,
            parts: turn.content.iter().map(|t| Part::text_part(t.text.clone())).collect(),
        }
    }
}

/// Append-only list of turns with a soft cap.
///
/// When the cap is exceeded the oldest turns are dropped, and any leading
/// model turn is dropped with them so the history always opens with the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
    max_turns: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::with_max_turns(DEFAULT_MAX_TURNS)
    }

    pub fn with_max_turns(max_turns: usize) -> Self {
        Self { turns: Vec::new(), max_turns: max_turns.max(1) }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        trim_turns(&mut self.turns, self.max_turns);
    }

    /// Remove the most recent turn (used to roll back an optimistic append).
    pub fn pop(&mut self) -> Option<Turn> {
        self.turns.pop()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn to_contents(&self) -> Vec<Content> {
        self.turns.iter().map(Content::from).collect()
    }
}

/// Drop the oldest turns until at most `max_turns` remain and the first turn is a user turn.
pub fn trim_turns(turns: &mut Vec<Turn>, max_turns: usize) {
    if turns.len() > max_turns {
        let excess = turns.len() - max_turns;
        turns.drain(..excess);
    }
    let leading_model = turns.iter().take_while(|t| t.role == Role::Model).count();
    if leading_model > 0 && turns.len() > leading_model {
        turns.drain(..leading_model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_wire_shape() {
        let turn = Turn::user("What is a derivative?");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "user", "content": [{"text": "What is a derivative?"}]})
        );
    }

    #[test]
    fn test_push_pop_clear() {
        let mut history = ConversationHistory::new();
        history.push(Turn::user("hi"));
        history.push(Turn::model("hello"));
        assert_eq!(history.len(), 2);

        assert_eq!(history.pop(), Some(Turn::model("hello")));
        assert_eq!(history.len(), 1);

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_soft_cap_keeps_user_first() {
        let mut history = ConversationHistory::with_max_turns(3);
        history.push(Turn::user("q1"));
        history.push(Turn::model("a1"));
        history.push(Turn::user("q2"));
        history.push(Turn::model("a2"));

        // Cap drops q1, leaving a1 first; a1 is then dropped so q2 leads.
        assert_eq!(history.turns(), &[Turn::user("q2"), Turn::model("a2")]);
    }

    #[test]
    fn test_to_contents_preserves_roles() {
        let mut history = ConversationHistory::new();
        history.push(Turn::user("q"));
        history.push(Turn::model("a"));
        let contents = history.to_contents();
        assert_eq!(contents[0].role, Role::User);
        assert_eq!(contents[1].text().as_deref(), Some("a"));
    }
}
