//! Observable draft: every change is published to subscribers.

use tokio::sync::watch;

use super::{BiodataDraft, BiodataField, Layout};

/// A draft together with the revision that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftRevision {
    /// Starts at 0 and is bumped on every effective change.
    pub revision: u64,
    pub draft: BiodataDraft,
}

/// Live in-progress draft.
///
/// Mutations that do not change anything are not published.
#[derive(Debug)]
pub struct DraftSession {
    sender: watch::Sender<DraftRevision>,
}

impl DraftSession {
    pub fn new(draft: BiodataDraft) -> Self {
        let (sender, _) = watch::channel(DraftRevision { revision: 0, draft });
        Self { sender }
    }

    /// Snapshot of the current revision.
    pub fn current(&self) -> DraftRevision {
        self.sender.borrow().clone()
    }

    pub fn revision(&self) -> u64 {
        self.sender.borrow().revision
    }

    pub fn subscribe(&self) -> watch::Receiver<DraftRevision> {
        self.sender.subscribe()
    }

    /// Applies `change` and publishes a new revision if the draft differs.
    ///
    /// Returns the revision now current.
    pub fn update(&self, change: impl FnOnce(&mut BiodataDraft)) -> u64 {
        let mut revision = 0;
        self.sender.send_if_modified(|state| {
            let before = state.draft.clone();
            change(&mut state.draft);
            let modified = state.draft != before;
            if modified {
                state.revision += 1;
            }
            revision = state.revision;
            modified
        });
        revision
    }

    pub fn set_field(&self, field: BiodataField, value: impl Into<String>) -> u64 {
        let value = value.into();
        self.update(|draft| {
            draft.set_field(field, value);
        })
    }

    pub fn set_layout(&self, layout: Layout) -> u64 {
        self.update(|draft| draft.layout = layout)
    }

    pub fn replace(&self, draft: BiodataDraft) -> u64 {
        self.update(|current| *current = draft)
    }

    /// Clears every field back to a new draft.
    pub fn reset(&self) -> u64 {
        self.replace(BiodataDraft::new())
    }
}

impl Default for DraftSession {
    fn default() -> Self {
        Self::new(BiodataDraft::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_bump_revision() {
        let session = DraftSession::default();
        assert_eq!(session.set_field(BiodataField::FullName, "Ravi"), 1);
        assert_eq!(session.set_layout(Layout::Traditional), 2);
        assert_eq!(session.current().draft.full_name, "Ravi");
    }

    #[test]
    fn no_op_changes_are_not_published() {
        let session = DraftSession::default();
        session.set_field(BiodataField::FullName, "Ravi");
        assert_eq!(session.set_field(BiodataField::FullName, "Ravi"), 1);
        assert_eq!(session.set_layout(Layout::Modern), 1);
    }

    #[tokio::test]
    async fn subscribers_see_each_change() {
        let session = DraftSession::default();
        let mut rx = session.subscribe();

        session.set_field(BiodataField::Age, "29");
        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.revision, 1);
        assert_eq!(seen.draft.age, "29");

        session.reset();
        rx.changed().await.unwrap();
        assert!(rx.borrow().draft.is_blank());
    }

    #[test]
    fn reset_of_blank_draft_is_a_no_op() {
        let session = DraftSession::default();
        assert_eq!(session.reset(), 0);
    }
}
