//! Subscriber registry for document signals.

use odt_document::DocumentSignal;
use std::fmt;
use tracing::debug;

pub type SubscriptionId = usize;

pub type SignalHandler = Box<dyn FnMut(&DocumentSignal) + Send>;

struct Subscription {
    id: SubscriptionId,
    /// Signal name to match, or every signal when `None`
    signal: Option<String>,
    handler: SignalHandler,
}

/// Delivers signals to independent subscribers in subscription order
#[derive(Default)]
pub struct EventNotifier {
    subscriptions: Vec<Subscription>,
    next_id: SubscriptionId,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one signal name (e.g. `paragraph/changed`), or to every
    /// signal with `None`
    pub fn subscribe(&mut self, signal: Option<&str>, handler: SignalHandler) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            signal: signal.map(str::to_string),
            handler,
        });
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    pub fn emit(&mut self, signal: &DocumentSignal) {
        let name = signal.name();
        let mut delivered = 0;
        for subscription in &mut self.subscriptions {
            if subscription.signal.as_deref().map_or(true, |wanted| wanted == name) {
                (subscription.handler)(signal);
                delivered += 1;
            }
        }
        debug!(signal = name, delivered, "Signal emitted");
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventNotifier")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn cursor_moved() -> DocumentSignal {
        DocumentSignal::CursorMoved {
            member_id: "alice".to_string(),
        }
    }

    #[test]
    fn test_filtered_and_wildcard_subscribers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = EventNotifier::new();

        let log = Arc::clone(&seen);
        notifier.subscribe(
            Some("cursor/moved"),
            Box::new(move |signal: &DocumentSignal| {
                log.lock().unwrap().push(format!("cursor:{}", signal.name()))
            }),
        );
        let log = Arc::clone(&seen);
        notifier.subscribe(
            Some("style/added"),
            Box::new(move |_: &DocumentSignal| log.lock().unwrap().push("style".to_string())),
        );
        let log = Arc::clone(&seen);
        notifier.subscribe(
            None,
            Box::new(move |signal: &DocumentSignal| {
                log.lock().unwrap().push(format!("all:{}", signal.name()))
            }),
        );

        notifier.emit(&cursor_moved());

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["cursor:cursor/moved", "all:cursor/moved"]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut notifier = EventNotifier::new();

        let counter = Arc::clone(&count);
        let id = notifier.subscribe(
            None,
            Box::new(move |_: &DocumentSignal| *counter.lock().unwrap() += 1),
        );

        notifier.emit(&cursor_moved());
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(&cursor_moved());

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(notifier.is_empty());
    }
}
