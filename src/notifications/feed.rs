//! Local feed state and its reducer.
//!
//! Every change to the feed goes through [`reduce`], whether it came from the
//! REST bootstrap, the push channel or a confirmed user action. The unread
//! count is derived from the sequence, never stored separately.

use super::model::{Notification, RecordId};

/// Notifications held by one mounted widget, newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    notifications: Vec<Notification>,
}

impl FeedState {
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.notifications.iter().any(|n| &n.id == id)
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }
}

/// Server-confirmed changes to the feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedAction {
    /// Bootstrap fetch completed; merged behind anything already held
    Loaded(Vec<Notification>),
    /// A single record arrived over the push channel
    Received(Notification),
    /// One record was marked read
    MarkedRead(RecordId),
    /// Every record was marked read
    MarkedAllRead,
}

/// Apply `action` to `state`. Returns whether the state changed.
pub fn reduce(state: &mut FeedState, action: FeedAction) -> bool {
    match action {
        FeedAction::Loaded(list) => {
            // Records pushed while the fetch was in flight are newer; keep
            // them in front and append the fetched ones not seen yet.
            let mut changed = false;
            for n in list {
                if !state.contains(&n.id) {
                    state.notifications.push(n);
                    changed = true;
                }
            }
            changed
        }
        FeedAction::Received(n) => {
            if state.contains(&n.id) {
                tracing::debug!("Dropping duplicate notification {}", n.id);
                return false;
            }
            state.notifications.insert(0, n);
            true
        }
        FeedAction::MarkedRead(id) => match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && !n.is_read)
        {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        },
        FeedAction::MarkedAllRead => {
            let mut changed = false;
            for n in state.notifications.iter_mut().filter(|n| !n.is_read) {
                n.is_read = true;
                changed = true;
            }
            changed
        }
    }
}

// =============================================================================
// Dropdown
// =============================================================================

/// Visibility of the notification panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dropdown {
    #[default]
    Closed,
    Open,
}

/// Where a pointer-down landed relative to the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Button,
    Panel,
    Outside,
}

impl ClickTarget {
    /// Classify by DOM containment
    pub fn classify(in_button: bool, in_panel: bool) -> Self {
        if in_button {
            ClickTarget::Button
        } else if in_panel {
            ClickTarget::Panel
        } else {
            ClickTarget::Outside
        }
    }
}

impl Dropdown {
    pub fn is_open(self) -> bool {
        self == Dropdown::Open
    }

    /// Bell button clicked
    pub fn toggle(self) -> Self {
        match self {
            Dropdown::Closed => Dropdown::Open,
            Dropdown::Open => Dropdown::Closed,
        }
    }

    /// Document-level pointer-down. The button's own click toggles, so only
    /// clicks outside both elements close the panel here.
    pub fn on_pointer_down(self, target: ClickTarget) -> Self {
        match target {
            ClickTarget::Outside => Dropdown::Closed,
            ClickTarget::Button | ClickTarget::Panel => self,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::notifications::model::{NotificationKind, ReviewSubmitted};
    use chrono::Utc;

    fn note(id: &str, is_read: bool) -> Notification {
        Notification {
            id: RecordId::new(id),
            kind: NotificationKind::Event,
            message: format!("notification {id}"),
            related_id: None,
            event_id: None,
            created_at: Utc::now(),
            is_read,
            metadata: None,
        }
    }

    fn review(id: &str) -> Notification {
        Notification::from_review(
            ReviewSubmitted {
                review_id: Some(RecordId::new(id)),
                user_name: Some("Ann".to_string()),
                product_name: Some("Gala".to_string()),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    fn assert_unread_consistent(state: &FeedState) {
        let expected = state.notifications().iter().filter(|n| !n.is_read).count();
        assert_eq!(state.unread_count(), expected);
    }

    #[test]
    fn test_bootstrap_counts_unread() {
        let mut state = FeedState::default();
        reduce(
            &mut state,
            FeedAction::Loaded(vec![note("n1", false), note("n2", true)]),
        );
        assert_eq!(state.len(), 2);
        assert_eq!(state.unread_count(), 1);
    }

    #[test]
    fn test_bootstrap_merges_behind_pushed_records() {
        let mut state = FeedState::default();
        reduce(&mut state, FeedAction::Received(review("r1")));
        reduce(
            &mut state,
            FeedAction::Loaded(vec![
                note("a", false),
                note("a", true),
                review("r1"),
                note("b", true),
            ]),
        );

        let ids: Vec<_> = state.notifications().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "a", "b"]);
        // First occurrence wins
        assert!(!state.notifications()[1].is_read);
        assert_unread_consistent(&state);
    }

    #[test]
    fn test_empty_bootstrap_changes_nothing() {
        let mut state = FeedState::default();
        assert!(!reduce(&mut state, FeedAction::Loaded(Vec::new())));
        assert!(state.is_empty());
    }

    #[test]
    fn test_received_is_prepended() {
        let mut state = FeedState::default();
        reduce(&mut state, FeedAction::Loaded(vec![note("n1", true)]));
        assert!(reduce(&mut state, FeedAction::Received(review("r1"))));

        assert_eq!(state.notifications()[0].id.as_str(), "r1");
        assert_eq!(state.unread_count(), 1);
    }

    #[test]
    fn test_duplicate_push_is_dropped() {
        let mut state = FeedState::default();
        reduce(&mut state, FeedAction::Received(review("r1")));
        let before = state.clone();

        assert!(!reduce(&mut state, FeedAction::Received(review("r1"))));

        assert_eq!(state, before);
        assert_eq!(state.unread_count(), 1);
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut state = FeedState::default();
        reduce(
            &mut state,
            FeedAction::Loaded(vec![note("n1", false), note("n2", false)]),
        );

        assert!(reduce(&mut state, FeedAction::MarkedRead(RecordId::new("n1"))));
        assert_eq!(state.unread_count(), 1);

        // A repeated read event (e.g. REST confirmation followed by the push echo)
        assert!(!reduce(&mut state, FeedAction::MarkedRead(RecordId::new("n1"))));
        assert_eq!(state.unread_count(), 1);

        // Unknown id leaves the feed alone
        assert!(!reduce(&mut state, FeedAction::MarkedRead(RecordId::new("zz"))));
        assert_unread_consistent(&state);
    }

    #[test]
    fn test_mark_all_read() {
        let mut state = FeedState::default();
        reduce(
            &mut state,
            FeedAction::Loaded(vec![note("n1", false), note("n2", true), note("n3", false)]),
        );

        assert!(reduce(&mut state, FeedAction::MarkedAllRead));

        assert!(state.notifications().iter().all(|n| n.is_read));
        assert_eq!(state.unread_count(), 0);
        assert!(!reduce(&mut state, FeedAction::MarkedAllRead));
    }

    #[test]
    fn test_unread_count_holds_across_interleavings() {
        let actions = vec![
            FeedAction::Received(review("r1")),
            FeedAction::Loaded(vec![note("n1", false), note("n2", true)]),
            FeedAction::Received(review("r2")),
            FeedAction::Received(review("r2")),
            FeedAction::MarkedRead(RecordId::new("n1")),
            FeedAction::MarkedRead(RecordId::new("n1")),
            FeedAction::Received(note("n1", false)),
            FeedAction::MarkedAllRead,
            FeedAction::Received(review("r3")),
        ];

        let mut state = FeedState::default();
        for action in actions {
            reduce(&mut state, action);
            assert_unread_consistent(&state);
        }
        assert_eq!(state.unread_count(), 1);
        assert_eq!(state.len(), 5);
    }

    #[test]
    fn test_dropdown_transitions() {
        let d = Dropdown::default();
        assert!(!d.is_open());

        let d = d.toggle();
        assert!(d.is_open());

        assert_eq!(d.on_pointer_down(ClickTarget::Panel), Dropdown::Open);
        assert_eq!(d.on_pointer_down(ClickTarget::Button), Dropdown::Open);
        assert_eq!(d.on_pointer_down(ClickTarget::Outside), Dropdown::Closed);
        assert_eq!(d.toggle(), Dropdown::Closed);
    }

    #[test]
    fn test_click_classification() {
        assert_eq!(ClickTarget::classify(true, false), ClickTarget::Button);
        assert_eq!(ClickTarget::classify(false, true), ClickTarget::Panel);
        assert_eq!(ClickTarget::classify(false, false), ClickTarget::Outside);
    }
}
