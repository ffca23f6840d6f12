//! # Edit Session Management
//!
//! An EditSession is the single writer for one document. Mutations are
//! queued as they arrive and applied in order on `flush`, so every mutation
//! sees the table left by the one before it.

use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::{Document, EditorError, Mutation, MutationResult};

/// One editing session over a document
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Document being edited
    pub document: Document,

    /// Mutations waiting to be applied, oldest first
    pending: VecDeque<PendingMutation>,

    /// Counter for mutation ids, scoped to this session
    next_mutation: u64,
}

/// Mutation waiting in the queue
#[derive(Debug, Clone)]
pub struct PendingMutation {
    /// Unique mutation ID
    pub id: String,

    /// The mutation
    pub mutation: Mutation,
}

/// What happened to one queued mutation
#[derive(Debug)]
pub struct FlushOutcome {
    pub id: String,
    pub result: Result<MutationResult, EditorError>,
}

impl EditSession {
    /// Create new edit session
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self {
            id: id.into(),
            document,
            pending: VecDeque::new(),
            next_mutation: 0,
        }
    }

    /// Queue a mutation and return its id
    pub fn enqueue(&mut self, mutation: Mutation) -> String {
        let id = format!("{}-{}", self.id, self.next_mutation);
        self.next_mutation += 1;
        debug!(session = %self.id, mutation_id = %id, kind = mutation.name(), "Queued mutation");
        self.pending.push_back(PendingMutation {
            id: id.clone(),
            mutation,
        });
        id
    }

    /// Apply every queued mutation in order
    ///
    /// A mutation that fails validation is dropped and the rest still run.
    pub fn flush(&mut self) -> Vec<FlushOutcome> {
        let mut outcomes = Vec::with_capacity(self.pending.len());
        while let Some(pending) = self.pending.pop_front() {
            let result = self.document.apply(&pending.mutation);
            if let Err(e) = &result {
                warn!(
                    session = %self.id,
                    mutation_id = %pending.id,
                    kind = pending.mutation.name(),
                    error = %e,
                    "Dropped mutation"
                );
            }
            outcomes.push(FlushOutcome {
                id: pending.id,
                result,
            });
        }
        outcomes
    }

    /// Flush the queue, then apply `mutation` behind it
    pub fn apply_now(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.flush();
        self.document.apply(&mutation)
    }

    /// Remove a queued mutation before it is applied
    pub fn cancel(&mut self, mutation_id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|m| m.id != mutation_id);
        self.pending.len() != before
    }

    /// Get number of pending mutations
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Canonical form of a namespace, ready to persist. Clears the dirty flag
    /// once the main tree is taken.
    pub fn save(&mut self, namespace: &str) -> Result<serde_json::Value, EditorError> {
        let canonical = self.document.to_canonical(namespace)?;
        if namespace == crate::MAIN_NAMESPACE {
            self.document.mark_saved();
        }
        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPath;
    use serde_json::json;

    fn session() -> EditSession {
        let doc = Document::from_canonical(
            &json!({ "Z1K1": "Z12", "Z12K1": ["Z11", { "Z1K1": "Z11", "Z11K1": "Z1002", "Z11K2": "a" }] }),
            0,
        );
        EditSession::new("client-1", doc)
    }

    fn push(text: &str) -> Mutation {
        Mutation::PushItems {
            list_path: KeyPath::parse("main.Z12K1").unwrap(),
            values: vec![json!({
                "Z1K1": { "Z1K1": "Z9", "Z9K1": "Z11" },
                "Z11K1": { "Z1K1": "Z9", "Z9K1": "Z1002" },
                "Z11K2": { "Z1K1": "Z6", "Z6K1": text }
            })],
        }
    }

    #[test]
    fn test_session_creation() {
        let session = session();
        assert_eq!(session.id, "client-1");
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_queue_applies_in_order() {
        let mut session = session();
        let first = session.enqueue(push("b"));
        let second = session.enqueue(push("c"));
        assert_eq!(first, "client-1-0");
        assert_eq!(second, "client-1-1");
        assert_eq!(session.pending_count(), 2);

        let outcomes = session.flush();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        assert_eq!(session.pending_count(), 0);

        let saved = session.save("main").unwrap();
        let texts: Vec<_> = saved["Z12K1"].as_array().unwrap()[1..]
            .iter()
            .map(|item| item["Z11K2"].clone())
            .collect();
        assert_eq!(texts, vec![json!("a"), json!("b"), json!("c")]);
        assert!(!session.document.is_dirty());
    }

    #[test]
    fn test_failed_mutation_is_dropped() {
        let mut session = session();
        session.enqueue(Mutation::MoveListItem {
            key_path: KeyPath::parse("main.Z12K1.1").unwrap(),
            offset: -1,
        });
        session.enqueue(push("b"));

        let outcomes = session.flush();
        assert!(outcomes[0].result.is_err());
        assert!(outcomes[1].result.is_ok());
        assert_eq!(session.document.version, 1);
    }

    #[test]
    fn test_cancel() {
        let mut session = session();
        let id = session.enqueue(push("b"));
        assert!(session.cancel(&id));
        assert!(!session.cancel(&id));
        assert!(session.flush().is_empty());
    }

    #[test]
    fn test_apply_now() {
        let mut session = session();
        let result = session.apply_now(push("b")).unwrap();
        assert_eq!(result.version, 1);
    }
}
