//! Broadcast channels for kit events, one per topic.

use solar_core::{EntityId, KitEvent, Tick};
use tokio::sync::broadcast;

/// Event routing key. Consumers subscribe per topic.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Beam starts, stops and faults
    Beam,
    /// One-shot casts, flight and menu changes, rejections
    Ability,
    /// Exhaustion, recovery, mitigation, resurrection
    Gauge,
    /// Capability grants, revocations, saves and loads
    Lifecycle,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Beam, Topic::Ability, Topic::Gauge, Topic::Lifecycle];

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Granted { owner: EntityId },
    Revoked { owner: EntityId },
    Saved { slot: String, kits: usize },
    Loaded { slot: String, kits: usize },
}

/// Everything published on the bus. Kit events carry the tick and owner
/// they happened to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Kit {
        tick: Tick,
        owner: EntityId,
        event: KitEvent,
    },
    Lifecycle(LifecycleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Kit { event, .. } => match event {
                KitEvent::BeamStarted { .. }
                | KitEvent::BeamStopped(_)
                | KitEvent::BeamFaulted(_) => Topic::Beam,
                KitEvent::Cast(_)
                | KitEvent::CastFaulted { .. }
                | KitEvent::Rejected(_)
                | KitEvent::FlightChanged { .. }
                | KitEvent::MenusChanged(_) => Topic::Ability,
                KitEvent::Exhausted
                | KitEvent::Recovered
                | KitEvent::DamageMitigated(_)
                | KitEvent::LethalPrevented
                | KitEvent::Resurrected => Topic::Gauge,
            },
            Event::Lifecycle(_) => Topic::Lifecycle,
        }
    }
}

/// Channels for every topic exist from construction, so publishing and
/// subscribing never fail. The runtime is tick-driven and synchronous:
/// subscribers drain with `try_recv`.
#[derive(Clone)]
pub struct EventBus {
    channels: [broadcast::Sender<Event>; 4],
}

impl EventBus {
    /// 256 buffered events per topic.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Topic::ALL.map(|_| broadcast::channel(capacity).0),
        }
    }

    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // nobody is listening on this topic
            tracing::trace!(target: "runtime::events", ?topic, "no subscribers");
        }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// One receiver per topic, paired with the topic it listens to.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
