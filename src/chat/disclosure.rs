//! Per-message visibility of cited sources.

use std::collections::HashSet;

use crate::types::Message;

/// Which assistant messages currently show their source list.
///
/// Every message starts collapsed.  This is view state only; it never feeds
/// back into the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDisclosures {
    expanded: HashSet<usize>,
}

impl SourceDisclosures {
    /// Creates a disclosure set with every message collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the message at `index` shows its sources.
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    /// Flips the message at `index` between collapsed and expanded.
    ///
    /// Returns the new state, or `None` when there is no such message or it
    /// has no sources.
    pub fn toggle(&mut self, messages: &[Message], index: usize) -> Option<bool> {
        if !messages.get(index)?.has_sources() {
            return None;
        }
        if self.expanded.remove(&index) {
            Some(false)
        } else {
            self.expanded.insert(index);
            Some(true)
        }
    }

    /// Collapses every message.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}

/// Index of the most recent message that carries sources.
pub fn latest_with_sources(messages: &[Message]) -> Option<usize> {
    messages.iter().rposition(Message::has_sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;

    fn transcript() -> Vec<Message> {
        vec![
            Message::user("Cite?"),
            Message::assistant("See Doc.", Some(vec![Source::new("Doc", "http://x")])),
            Message::user("And?"),
            Message::assistant("Nothing more.", None),
        ]
    }

    #[test]
    fn collapsed_by_default() {
        let disclosures = SourceDisclosures::new();
        assert!(!disclosures.is_expanded(1));
    }

    #[test]
    fn toggle_flips_state() {
        let messages = transcript();
        let mut disclosures = SourceDisclosures::new();
        assert_eq!(disclosures.toggle(&messages, 1), Some(true));
        assert!(disclosures.is_expanded(1));
        assert_eq!(disclosures.toggle(&messages, 1), Some(false));
        assert!(!disclosures.is_expanded(1));
    }

    #[test]
    fn toggle_without_sources_is_noop() {
        let messages = transcript();
        let mut disclosures = SourceDisclosures::new();
        assert_eq!(disclosures.toggle(&messages, 0), None);
        assert_eq!(disclosures.toggle(&messages, 3), None);
        assert_eq!(disclosures.toggle(&messages, 42), None);
        assert_eq!(disclosures, SourceDisclosures::new());
    }

    #[test]
    fn latest_message_with_sources() {
        assert_eq!(latest_with_sources(&transcript()), Some(1));
        assert_eq!(latest_with_sources(&[Message::user("hi")]), None);
    }
}
