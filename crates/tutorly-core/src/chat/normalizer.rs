//! Repairs client-supplied chat history into strict alternation.
//!
//! The generative provider rejects conversations that do not alternate
//! `user, model, user, ...` starting with a user turn. Clients replay their
//! own transcripts (sometimes edited, sometimes with an error bubble in the
//! middle), so the history is rebuilt here instead of trusted:
//!
//! - leading non-user turns are dropped,
//! - a turn whose role equals the previous accepted turn is dropped
//!   (the first of a same-role run wins, nothing is merged).
//!
//! Both entry points are total: malformed input only ever yields a shorter
//! valid sequence.

use serde_json::Value;

use tutorly_types::chat::{ChatMessage, ChatRole};

/// Normalize a raw JSON history value.
///
/// Anything that is not an array normalizes to an empty history. Array items
/// that are not objects, or lack a string `role`, are treated as model turns;
/// a missing or non-string `text` becomes an empty string.
pub fn normalize_history(raw: &Value) -> Vec<ChatMessage> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    normalize_turns(items.iter().map(parse_turn))
}

/// Normalize an already-typed sequence of turns.
pub fn normalize_turns<I>(turns: I) -> Vec<ChatMessage>
where
    I: IntoIterator<Item = ChatMessage>,
{
    let mut out: Vec<ChatMessage> = Vec::new();

    for turn in turns {
        let accept = match out.last() {
            None => turn.role == ChatRole::User,
            Some(last) => last.role != turn.role,
        };
        if accept {
            out.push(turn);
        }
    }

    out
}

/// True when `history` already satisfies the alternation invariant.
pub fn is_normalized(history: &[ChatMessage]) -> bool {
    match history.first() {
        None => true,
        Some(first) if first.role != ChatRole::User => false,
        Some(_) => history.windows(2).all(|w| w[0].role != w[1].role),
    }
}

fn parse_turn(item: &Value) -> ChatMessage {
    let role = ChatRole::from_wire(item.get("role").and_then(Value::as_str));
    let text = item
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    ChatMessage { role, text }
}
