//! Listener registries with scoped subscriptions.
//!
//! An [`EventHub`] owns an ordered list of listeners. Subscribing returns a
//! [`Subscription`] guard that removes the listener when released or dropped,
//! so a subscriber can never outlive its registration by accident.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Identity of whoever raised an event.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Sender(Arc<str>);

impl Sender {
    pub fn new(name: impl AsRef<str>) -> Self { Self(Arc::from(name.as_ref())) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Debug for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Sender({})", self.0) }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener<A> = Arc<dyn Fn(&Sender, &A) + Send + Sync>;

struct Registry<A> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<A>)>,
}

trait Unsubscribe: Send + Sync {
    fn remove(&self, id: SubscriptionId) -> bool;
}

impl<A: 'static> Unsubscribe for Mutex<Registry<A>> {
    fn remove(&self, id: SubscriptionId) -> bool {
        let mut reg = self.lock().unwrap_or_else(|p| p.into_inner());
        let before = reg.listeners.len();
        reg.listeners.retain(|(i, _)| *i != id);
        reg.listeners.len() != before
    }
}

pub struct EventHub<A> {
    name: &'static str,
    registry: Arc<Mutex<Registry<A>>>,
}

impl<A: 'static> EventHub<A> {
    pub fn new(name: &'static str) -> Self {
        Self { name, registry: Arc::new(Mutex::new(Registry { next_id: 0, listeners: Vec::new() })) }
    }

    pub fn name(&self) -> &'static str { self.name }

    fn registry(&self) -> MutexGuard<'_, Registry<A>> {
        self.registry.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Register a listener. It stays registered until the guard is released.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Sender, &A) + Send + Sync + 'static,
    {
        let id = {
            let mut reg = self.registry();
            reg.next_id += 1;
            let id = SubscriptionId(reg.next_id);
            reg.listeners.push((id, Arc::new(listener)));
            id
        };
        let weak = Arc::downgrade(&self.registry);
        let weak: Weak<dyn Unsubscribe> = weak;
        Subscription { id, hub: self.name, registry: Some(weak) }
    }

    /// Invoke every listener registered at the time of the call, in
    /// registration order. Listeners run outside the registry lock.
    pub fn emit(&self, sender: &Sender, args: &A) -> usize {
        let snapshot: Vec<Listener<A>> = self.registry().listeners.iter().map(|(_, l)| l.clone()).collect();
        for listener in &snapshot {
            listener(sender, args);
        }
        snapshot.len()
    }

    pub fn len(&self) -> usize { self.registry().listeners.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl<A> fmt::Debug for EventHub<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.registry.lock().map(|r| r.listeners.len()).unwrap_or(0);
        f.debug_struct("EventHub").field("name", &self.name).field("listeners", &count).finish()
    }
}

/// Registration handle. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    id: SubscriptionId,
    hub: &'static str,
    registry: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId { self.id }
    pub fn hub(&self) -> &'static str { self.hub }

    /// Remove the listener now. Returns false if the hub is already gone.
    pub fn unsubscribe(mut self) -> bool { self.release() }

    fn release(&mut self) -> bool {
        match self.registry.take().and_then(|w| w.upgrade()) {
            Some(registry) => registry.remove(self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) { self.release(); }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).field("hub", &self.hub).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&Sender, &()) + Send + Sync + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        (hits, move |_: &Sender, _: &()| { h.fetch_add(1, Ordering::SeqCst); })
    }

    #[test]
    fn emit_reaches_each_listener_once() {
        let hub: EventHub<()> = EventHub::new("ready");
        let (a, la) = counter();
        let (b, lb) = counter();
        let _sa = hub.subscribe(la);
        let _sb = hub.subscribe(lb);

        assert_eq!(hub.emit(&Sender::new("test"), &()), 2);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_unsubscribes() {
        let hub: EventHub<()> = EventHub::new("paused");
        let (hits, l) = counter();
        let sub = hub.subscribe(l);
        assert_eq!(hub.len(), 1);
        drop(sub);
        assert!(hub.is_empty());
        hub.emit(&Sender::new("test"), &());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_after_hub_dropped_is_harmless() {
        let hub: EventHub<()> = EventHub::new("gone");
        let (_hits, l) = counter();
        let sub = hub.subscribe(l);
        drop(hub);
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn listeners_may_subscribe_reentrantly() {
        let hub: Arc<EventHub<u32>> = Arc::new(EventHub::new("reentrant"));
        let late = Arc::new(Mutex::new(Vec::new()));
        let (h, l) = (hub.clone(), late.clone());
        let _sub = hub.subscribe(move |_, n| {
            let sub = h.subscribe(|_, _| {});
            l.lock().unwrap().push((*n, sub));
        });

        // The listener added during emit is not invoked by that same emit.
        assert_eq!(hub.emit(&Sender::new("test"), &7), 1);
        assert_eq!(hub.len(), 2);
        late.lock().unwrap().clear();
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn sender_is_passed_through() {
        let hub: EventHub<String> = EventHub::new("result");
        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        let _sub = hub.subscribe(move |sender, payload| {
            *s.lock().unwrap() = Some((sender.clone(), payload.clone()));
        });
        hub.emit(&Sender::new("session-1"), &"0xabc".to_string());
        let (sender, payload) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(sender.as_str(), "session-1");
        assert_eq!(payload, "0xabc");
    }
}
