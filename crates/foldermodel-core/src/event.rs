//! Change notifications from the model to its presenters.
//!
//! The model emits [`ModelEvent`]s; a frontend registers interest in one
//! [`EventKind`] (or all of them) through [`EventBus::subscribe`] and
//! keeps the returned [`SubscriptionId`] to unsubscribe later.

use serde::Serialize;

/// A notification the model sends to its presenters.
///
/// Row events carry the affected row *after* the change for insertions
/// and updates, and the row the record occupied *before* removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ModelEvent {
    /// The whole list was rebuilt; presenters should re-read everything.
    Reset,
    /// A record was inserted at `row`.
    RowInserted { row: usize },
    /// The record at `row` was removed.
    RowRemoved { row: usize },
    /// Data shown for `row` changed (record replaced or selection flipped).
    RowChanged { row: usize },
    /// The row count changed.
    CountChanged { count: usize },
    /// The set of selected rows changed.
    SelectedFilesChanged,
    /// The watched folder list was replaced.
    FoldersChanged,
    /// The type filters were replaced.
    TypeFiltersChanged,
    /// The single-selection policy flipped.
    SingleSelectionOnlyChanged { single_selection_only: bool },
}

/// Discriminant of [`ModelEvent`], used to subscribe to one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Reset,
    RowInserted,
    RowRemoved,
    RowChanged,
    CountChanged,
    SelectedFilesChanged,
    FoldersChanged,
    TypeFiltersChanged,
    SingleSelectionOnlyChanged,
}

impl ModelEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ModelEvent::Reset => EventKind::Reset,
            ModelEvent::RowInserted { .. } => EventKind::RowInserted,
            ModelEvent::RowRemoved { .. } => EventKind::RowRemoved,
            ModelEvent::RowChanged { .. } => EventKind::RowChanged,
            ModelEvent::CountChanged { .. } => EventKind::CountChanged,
            ModelEvent::SelectedFilesChanged => EventKind::SelectedFilesChanged,
            ModelEvent::FoldersChanged => EventKind::FoldersChanged,
            ModelEvent::TypeFiltersChanged => EventKind::TypeFiltersChanged,
            ModelEvent::SingleSelectionOnlyChanged { .. } => EventKind::SingleSelectionOnlyChanged,
        }
    }

    /// Serializes the event as a single JSON line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ModelEvent)>;

struct Subscription {
    id: SubscriptionId,
    kind: Option<EventKind>,
    callback: Callback,
}

/// Registry of event callbacks.
///
/// Callbacks run synchronously, in subscription order, on the thread
/// that mutates the model.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for events of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&ModelEvent) + 'static,
    {
        self.register(Some(kind), Box::new(callback))
    }

    /// Registers `callback` for every event.
    pub fn subscribe_all<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ModelEvent) + 'static,
    {
        self.register(None, Box::new(callback))
    }

    /// Removes a subscription. Returns `false` if `id` was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Delivers `event` to every matching subscriber.
    pub fn emit(&mut self, event: ModelEvent) {
        let kind = event.kind();
        for sub in &mut self.subscriptions {
            if sub.kind.map_or(true, |k| k == kind) {
                (sub.callback)(&event);
            }
        }
    }

    fn register(&mut self, kind: Option<EventKind>, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, callback });
        id
    }
}
