//! Event dispatcher for pub-sub between the controller and its views

use crate::data::registry::Registry;
use crate::state::events::RegistryEvent;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Trait for components that subscribe to registry state changes
pub trait RegistrySubscriber {
    /// Handle a state event. `registry` is the state after the change.
    fn on_event(&mut self, event: &RegistryEvent, registry: &Registry);

    /// Get subscriber name for debugging
    fn name(&self) -> &str;
}

/// Fans controller events out to subscribers in registration order
pub struct RegistryDispatcher {
    subscribers: Vec<Box<dyn RegistrySubscriber>>,

    /// Event history for debugging
    event_history: VecDeque<RegistryEvent>,

    /// Maximum event history size
    max_history: usize,
}

impl RegistryDispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            event_history: VecDeque::new(),
            max_history: 100,
        }
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn RegistrySubscriber>) {
        info!("RegistryDispatcher: Adding subscriber: {}", subscriber.name());
        self.subscribers.push(subscriber);
    }

    pub fn dispatch(&mut self, event: RegistryEvent, registry: &Registry) {
        debug!("RegistryDispatcher: Dispatching event: {:?}", event);

        for subscriber in &mut self.subscribers {
            subscriber.on_event(&event, registry);
        }

        self.event_history.push_back(event);
        if self.event_history.len() > self.max_history {
            self.event_history.pop_front();
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &RegistryEvent> {
        self.event_history.iter()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for RegistryDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes every event to the tracing log
pub struct EventLogSubscriber;

impl RegistrySubscriber for EventLogSubscriber {
    fn on_event(&mut self, event: &RegistryEvent, registry: &Registry) {
        match event {
            RegistryEvent::Created { application } | RegistryEvent::Updated { application } => {
                info!(
                    target: "registry",
                    "{:?} saved ({} records)",
                    application.id,
                    registry.len()
                );
            }
            RegistryEvent::Removed { ids } => {
                info!(target: "registry", "Removed {:?} ({} records left)", ids, registry.len());
            }
            other => debug!(target: "registry", "{:?}", other),
        }
    }

    fn name(&self) -> &str {
        "EventLogSubscriber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Vec<(RegistryEvent, usize)>>>,
    }

    impl RegistrySubscriber for Recorder {
        fn on_event(&mut self, event: &RegistryEvent, registry: &Registry) {
            self.seen.borrow_mut().push((event.clone(), registry.len()));
        }

        fn name(&self) -> &str {
            "Recorder"
        }
    }

    #[test]
    fn test_dispatch_reaches_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = RegistryDispatcher::new();
        dispatcher.subscribe(Box::new(Recorder { seen: seen.clone() }));
        dispatcher.subscribe(Box::new(EventLogSubscriber));

        dispatcher.dispatch(RegistryEvent::Loaded { count: 0 }, &Registry::new());

        assert_eq!(dispatcher.subscriber_count(), 2);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].0, RegistryEvent::Loaded { count: 0 });
    }

    #[test]
    fn test_history_is_bounded() {
        let mut dispatcher = RegistryDispatcher::new();
        let registry = Registry::new();
        for i in 0..150 {
            dispatcher.dispatch(RegistryEvent::SelectionChanged { count: i }, &registry);
        }
        let history: Vec<_> = dispatcher.history().collect();
        assert_eq!(history.len(), 100);
        assert_eq!(history[0], &RegistryEvent::SelectionChanged { count: 50 });
    }
}
