//! `Message` and `Context`: the append-only conversation log.

use crate::id::{gen_content_id, ContentId};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The system prompt.
    System,
    /// A human or upstream caller.
    User,
    /// The model.
    Assistant,
    /// A tool's result.
    Tool,
}

impl Role {
    /// The wire/string form used by `Context::select_messages_by_role`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One message in a `Context`. `content_id` is the stable identity used by
/// `delete_message`/`update_message`/`search_messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// 8-hex-character stable id.
    pub content_id: String,
    /// Milliseconds since the Unix epoch when the message was created.
    pub created_at: u64,
    /// Display name of the author (e.g. an instruction label or tool name).
    pub name: String,
    /// Who authored the message.
    pub role: Role,
    /// The message body.
    pub content: String,
}

impl Message {
    /// Build a message, generating a fresh `content_id` and `created_at`
    /// the way `Context::add_message(name, role, content)` does in the
    /// source this model is based on.
    pub fn new(name: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            content_id: gen_content_id().as_str().to_string(),
            created_at: crate::id::now_millis(),
            name: name.into(),
            role,
            content: content.into(),
        }
    }

    /// Build a message with an explicit id, for tests and deserialization
    /// paths that already know the identity.
    pub fn with_id(
        content_id: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        content: impl Into<String>,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            created_at: crate::id::now_millis(),
            name: name.into(),
            role,
            content: content.into(),
        }
    }
}

/// An ordered, append-only sequence of `Message`s.
///
/// Concatenation (`+`/`+=`) appends the right operand's messages after the
/// left's, preserving order on both sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    messages: Vec<Message>,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the context has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over messages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// All messages as a slice.
    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Append a pre-built message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append a message built from its parts, generating a content_id.
    pub fn add_message(&mut self, name: impl Into<String>, role: Role, content: impl Into<String>) {
        self.push(Message::new(name, role, content));
    }

    /// Remove the message with the given `content_id`, if present.
    pub fn delete_message(&mut self, content_id: &str) {
        self.messages.retain(|m| m.content_id != content_id);
    }

    /// Replace the content of the message with the given `content_id`.
    pub fn update_message(&mut self, content_id: &str, new_content: impl Into<String>) {
        if let Some(m) = self.messages.iter_mut().find(|m| m.content_id == content_id) {
            m.content = new_content.into();
        }
    }

    /// Remove and return the last message, if any — used by the stop()
    /// protocol to pop the call marker before appending the return marker.
    pub fn pop(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    /// Replace the context's system message (removing any existing one)
    /// and insert the new one at the front. Update-State re-renders and
    /// replaces the system prompt on every step.
    pub fn set_system_message(&mut self, content: impl Into<String>) {
        self.messages.retain(|m| m.role != Role::System);
        self.messages.insert(0, Message::new("system", Role::System, content));
    }

    /// The last message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Linear substring search over message content.
    pub fn search_messages(&self, text: &str) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| m.content.contains(text))
            .cloned()
            .collect()
    }

    /// Exact-match filter on role.
    pub fn select_messages_by_role(&self, role: Role) -> Vec<Message> {
        self.messages.iter().filter(|m| m.role == role).cloned().collect()
    }

    /// Apply `max_context`: truncate to at most the last `n` messages.
    /// `n == 0` means unbounded (no truncation).
    pub fn truncate_to(&mut self, n: usize) {
        if n == 0 || self.messages.len() <= n {
            return;
        }
        let drop_count = self.messages.len() - n;
        self.messages.drain(0..drop_count);
    }
}

impl std::ops::AddAssign for Context {
    fn add_assign(&mut self, mut rhs: Context) {
        self.messages.append(&mut rhs.messages);
    }
}

impl std::ops::Add for Context {
    type Output = Context;

    fn add(mut self, rhs: Context) -> Context {
        self += rhs;
        self
    }
}

impl FromIterator<Message> for Context {
    fn from_iter<T: IntoIterator<Item = Message>>(iter: T) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_message_generates_unique_ids() {
        let mut ctx = Context::new();
        for _ in 0..10 {
            ctx.add_message("root", Role::User, "hi");
        }
        let ids: std::collections::HashSet<_> = ctx.iter().map(|m| m.content_id.clone()).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn concatenation_preserves_order() {
        let mut left = Context::new();
        left.add_message("a", Role::User, "1");
        left.add_message("a", Role::User, "2");
        let mut right = Context::new();
        right.add_message("b", Role::Assistant, "3");

        let combined = left + right;
        let contents: Vec<_> = combined.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["1", "2", "3"]);
    }

    #[test]
    fn delete_and_update_by_id() {
        let mut ctx = Context::new();
        ctx.push(Message::with_id("id1", "a", Role::User, "hello"));
        ctx.push(Message::with_id("id2", "a", Role::User, "world"));

        ctx.update_message("id1", "updated");
        assert_eq!(ctx.iter().next().unwrap().content, "updated");

        ctx.delete_message("id2");
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn search_and_filter_by_role() {
        let mut ctx = Context::new();
        ctx.push(Message::with_id("id1", "a", Role::User, "find the needle"));
        ctx.push(Message::with_id("id2", "a", Role::Assistant, "nothing here"));

        assert_eq!(ctx.search_messages("needle").len(), 1);
        assert_eq!(ctx.select_messages_by_role(Role::Assistant).len(), 1);
        assert_eq!(ctx.select_messages_by_role(Role::Tool).len(), 0);
    }

    #[test]
    fn truncate_to_keeps_most_recent() {
        let mut ctx = Context::new();
        for i in 0..5 {
            ctx.push(Message::with_id(format!("id{i}"), "a", Role::User, format!("{i}")));
        }
        ctx.truncate_to(2);
        let contents: Vec<_> = ctx.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["3", "4"]);
    }

    #[test]
    fn truncate_to_zero_is_unbounded() {
        let mut ctx = Context::new();
        for i in 0..5 {
            ctx.push(Message::with_id(format!("id{i}"), "a", Role::User, format!("{i}")));
        }
        ctx.truncate_to(0);
        assert_eq!(ctx.len(), 5);
    }

    #[test]
    fn serde_round_trip() {
        let mut ctx = Context::new();
        ctx.add_message("a", Role::User, "hello");
        let json = serde_json::to_string(&ctx).unwrap();
        let back: Context = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, back);
    }

    #[test]
    fn set_system_message_replaces_and_stays_first() {
        let mut ctx = Context::new();
        ctx.add_message("a", Role::User, "hello");
        ctx.set_system_message("first system prompt");
        ctx.set_system_message("second system prompt");

        assert_eq!(ctx.select_messages_by_role(Role::System).len(), 1);
        assert_eq!(ctx.iter().next().unwrap().content, "second system prompt");
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn pop_returns_last_message() {
        let mut ctx = Context::new();
        ctx.add_message("a", Role::User, "first");
        ctx.add_message("a", Role::Assistant, "second");
        let popped = ctx.pop().unwrap();
        assert_eq!(popped.content, "second");
        assert_eq!(ctx.len(), 1);
    }
}
