// Change notifications
//
// A typed stand-in for document-level custom events: any number of
// independent subscribers, fire-and-forget, no return value. Subscribers
// re-read state from the document when they drain their queue.

use std::sync::mpsc::{self, Receiver, Sender};

/// Something observable changed on the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The `data-theme` marker changed
    ThemeChanged,
    /// The `data-palette` marker changed
    PaletteChanged,
}

/// Fan-out sender for notifications
#[derive(Debug)]
pub struct Broadcaster<N> {
    subscribers: Vec<Sender<N>>,
}

impl<N: Clone> Broadcaster<N> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a new subscriber; it sees every notification sent afterwards
    pub fn subscribe(&mut self) -> Receiver<N> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every live subscriber, forgetting the ones that hung up
    pub fn broadcast(&mut self, note: N) {
        self.subscribers.retain(|tx| tx.send(note.clone()).is_ok());
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<N: Clone> Default for Broadcaster<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives() {
        let mut bus = Broadcaster::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.broadcast(Notification::ThemeChanged);
        bus.broadcast(Notification::PaletteChanged);

        let got_a: Vec<_> = a.try_iter().collect();
        let got_b: Vec<_> = b.try_iter().collect();
        assert_eq!(
            got_a,
            vec![Notification::ThemeChanged, Notification::PaletteChanged]
        );
        assert_eq!(got_a, got_b);
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let mut bus = Broadcaster::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        bus.broadcast(Notification::ThemeChanged);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(kept.try_recv(), Ok(Notification::ThemeChanged));
    }

    #[test]
    fn test_broadcast_without_subscribers_is_noop() {
        let mut bus: Broadcaster<Notification> = Broadcaster::new();
        bus.broadcast(Notification::PaletteChanged);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
