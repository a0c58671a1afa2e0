//! Typed event bus for domain events
//!
//! Synchronous publish/subscribe over the closed [`GameEvent`] variant set.
//! This variant set is the wire contract consumed by external subsystems
//! (narration, visual effects, audio); changing a variant's fields changes
//! the protocol.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use nalgebra::Point2;

use super::entity::Entity;

/// Domain events published by the simulation systems
///
/// Events are transient: they exist for the duration of an
/// [`EventBus::emit`] call and are never stored by the bus. All timestamps
/// are simulation-clock milliseconds (see `World::now`).
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Excitatory post-synaptic potential delivered to a membrane
    Epsp {
        /// Receiving entity (the lock target)
        entity: Entity,
        /// Synaptic strength, always positive
        strength: f64,
        /// When the synaptic event occurred
        timestamp: f64,
    },

    /// Inhibitory post-synaptic potential delivered to a membrane
    Ipsp {
        /// Receiving entity (the lock target)
        entity: Entity,
        /// Synaptic strength, always positive (negated by the integrator)
        strength: f64,
        /// When the synaptic event occurred
        timestamp: f64,
    },

    /// A membrane potential crossed its spike threshold
    ActionPotential {
        /// The spiking entity
        entity: Entity,
        /// When the spike fired
        timestamp: f64,
    },

    /// An ion locked onto a receptor and was consumed
    IonLocked {
        /// The consumed ion
        ion: Entity,
        /// The receptor it locked onto
        target: Entity,
        /// When the lock happened
        timestamp: f64,
    },

    /// A receptor gate finished its cooldown and opened
    GateOpened {
        /// The receptor entity
        entity: Entity,
        /// When the gate opened
        timestamp: f64,
    },

    /// A receptor gate closed
    GateClosed {
        /// The receptor entity
        entity: Entity,
        /// When the gate closed
        timestamp: f64,
    },

    /// An astrocyte recycled a stray ion (consumed by the fx layer)
    AstrocyteUptake {
        /// The recycled ion
        ion: Entity,
        /// Where the uptake happened
        position: Point2<f64>,
        /// When the uptake happened
        timestamp: f64,
    },

    /// Narration line for the UI overlay
    NarratorSpeak {
        /// Text to display
        text: String,
        /// How long to keep it on screen, in milliseconds
        duration_ms: f64,
        /// When the line was queued
        timestamp: f64,
    },
}

impl GameEvent {
    /// The kind tag listeners subscribe on
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Epsp { .. } => EventKind::Epsp,
            Self::Ipsp { .. } => EventKind::Ipsp,
            Self::ActionPotential { .. } => EventKind::ActionPotential,
            Self::IonLocked { .. } => EventKind::IonLocked,
            Self::GateOpened { .. } => EventKind::GateOpened,
            Self::GateClosed { .. } => EventKind::GateClosed,
            Self::AstrocyteUptake { .. } => EventKind::AstrocyteUptake,
            Self::NarratorSpeak { .. } => EventKind::NarratorSpeak,
        }
    }

    /// Simulation-clock timestamp carried by every variant
    pub const fn timestamp(&self) -> f64 {
        match self {
            Self::Epsp { timestamp, .. }
            | Self::Ipsp { timestamp, .. }
            | Self::ActionPotential { timestamp, .. }
            | Self::IonLocked { timestamp, .. }
            | Self::GateOpened { timestamp, .. }
            | Self::GateClosed { timestamp, .. }
            | Self::AstrocyteUptake { timestamp, .. }
            | Self::NarratorSpeak { timestamp, .. } => *timestamp,
        }
    }
}

/// Discriminant tags for [`GameEvent`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`GameEvent::Epsp`]
    Epsp,
    /// [`GameEvent::Ipsp`]
    Ipsp,
    /// [`GameEvent::ActionPotential`]
    ActionPotential,
    /// [`GameEvent::IonLocked`]
    IonLocked,
    /// [`GameEvent::GateOpened`]
    GateOpened,
    /// [`GameEvent::GateClosed`]
    GateClosed,
    /// [`GameEvent::AstrocyteUptake`]
    AstrocyteUptake,
    /// [`GameEvent::NarratorSpeak`]
    NarratorSpeak,
}

/// Handle identifying one listener registration
///
/// Closures have no usable identity in Rust, so [`EventBus::on`] hands back
/// a handle and [`EventBus::off`] takes it. Registering the same closure
/// twice yields two handles and two invocations per emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

type Listener = Rc<RefCell<dyn FnMut(&GameEvent)>>;

/// Synchronous typed publish/subscribe channel
///
/// `emit` invokes listeners in registration order, reentrantly: a listener
/// may emit further events (delivered before the outer `emit` returns) and
/// may subscribe or unsubscribe listeners. Listeners added during an emit do
/// not see the in-flight event; listeners removed during an emit still
/// receive it. The bus provides no fault isolation: a panicking listener
/// unwinds through `emit` and aborts the current tick.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<HashMap<EventKind, Vec<(ListenerHandle, Listener)>>>,
    next_handle: Cell<u64>,
}

impl EventBus {
    /// Create a bus with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a listener to one event kind
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerHandle
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let handle = ListenerHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);

        let listener: Listener = Rc::new(RefCell::new(listener));
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((handle, listener));
        handle
    }

    /// Unsubscribe a previously registered listener
    ///
    /// Returns `true` if the registration existed. Unknown or stale handles
    /// are a no-op.
    pub fn off(&self, kind: EventKind, handle: ListenerHandle) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.get_mut(&kind) {
            Some(registered) => {
                let before = registered.len();
                registered.retain(|(existing, _)| *existing != handle);
                registered.len() != before
            }
            None => false,
        }
    }

    /// Synchronously deliver an event to every listener of its kind
    pub fn emit(&self, event: &GameEvent) {
        // Snapshot the registration list so listeners can subscribe,
        // unsubscribe, and emit without holding the map borrow.
        let snapshot: Vec<Listener> = {
            let listeners = self.listeners.borrow();
            match listeners.get(&event.kind()) {
                Some(registered) => registered.iter().map(|(_, l)| Rc::clone(l)).collect(),
                None => return,
            }
        };

        for listener in snapshot {
            (&mut *listener.borrow_mut())(event);
        }
    }

    /// Remove every listener for every kind
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Number of listeners currently registered for a kind
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_event(ion: u64, target: u64) -> GameEvent {
        GameEvent::IonLocked {
            ion: Entity::new(ion),
            target: Entity::new(target),
            timestamp: 100.0,
        }
    }

    #[test]
    fn test_listeners_receive_matching_kind_only() {
        let bus = EventBus::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&received);
        bus.on(EventKind::IonLocked, move |event| {
            sink.borrow_mut().push(event.clone());
        });

        bus.emit(&lock_event(1, 2));
        bus.emit(&GameEvent::GateOpened {
            entity: Entity::new(3),
            timestamp: 120.0,
        });

        let received = received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0], lock_event(1, 2));
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let sink = Rc::clone(&order);
            bus.on(EventKind::IonLocked, move |_| sink.borrow_mut().push(tag));
        }

        bus.emit(&lock_event(1, 2));
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_registration_invokes_twice() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));

        // Two registrations of equivalent closures are two listeners
        for _ in 0..2 {
            let counter = Rc::clone(&count);
            bus.on(EventKind::Epsp, move |_| counter.set(counter.get() + 1));
        }

        bus.emit(&GameEvent::Epsp {
            entity: Entity::new(1),
            strength: 0.1,
            timestamp: 0.0,
        });
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_off_removes_only_that_registration() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));

        let counter = Rc::clone(&count);
        let kept = bus.on(EventKind::IonLocked, move |_| {
            counter.set(counter.get() + 1);
        });
        let counter = Rc::clone(&count);
        let dropped = bus.on(EventKind::IonLocked, move |_| {
            counter.set(counter.get() + 10);
        });

        assert!(bus.off(EventKind::IonLocked, dropped));
        bus.emit(&lock_event(1, 2));
        assert_eq!(count.get(), 1);
        assert_eq!(bus.listener_count(EventKind::IonLocked), 1);

        // A handle that was never registered (or already removed) is a no-op
        assert!(!bus.off(EventKind::IonLocked, dropped));
        assert!(!bus.off(EventKind::Epsp, kept));
    }

    #[test]
    fn test_emit_is_reentrant() {
        let bus = Rc::new(EventBus::new());
        let narration = Rc::new(RefCell::new(Vec::new()));

        // A lock listener that narrates the lock through the same bus
        let inner_bus = Rc::clone(&bus);
        bus.on(EventKind::IonLocked, move |event| {
            inner_bus.emit(&GameEvent::NarratorSpeak {
                text: "an ion found its channel".to_string(),
                duration_ms: 1500.0,
                timestamp: event.timestamp(),
            });
        });

        let sink = Rc::clone(&narration);
        bus.on(EventKind::NarratorSpeak, move |event| {
            if let GameEvent::NarratorSpeak { text, .. } = event {
                sink.borrow_mut().push(text.clone());
            }
        });

        bus.emit(&lock_event(4, 5));
        assert_eq!(*narration.borrow(), vec!["an ion found its channel"]);
    }

    #[test]
    fn test_clear_removes_all_listeners() {
        let bus = EventBus::new();
        bus.on(EventKind::Epsp, |_| {});
        bus.on(EventKind::Ipsp, |_| {});

        bus.clear();
        assert_eq!(bus.listener_count(EventKind::Epsp), 0);
        assert_eq!(bus.listener_count(EventKind::Ipsp), 0);
    }

    #[test]
    fn test_every_variant_reports_its_timestamp() {
        let events = [
            GameEvent::Epsp {
                entity: Entity::new(1),
                strength: 0.1,
                timestamp: 1.0,
            },
            GameEvent::ActionPotential {
                entity: Entity::new(1),
                timestamp: 2.0,
            },
            GameEvent::AstrocyteUptake {
                ion: Entity::new(2),
                position: Point2::new(10.0, 20.0),
                timestamp: 3.0,
            },
        ];

        assert_eq!(events[0].timestamp(), 1.0);
        assert_eq!(events[1].timestamp(), 2.0);
        assert_eq!(events[2].timestamp(), 3.0);
    }
}
