use std::collections::HashMap;

use uuid::Uuid;

use crate::protocol::{OpaquePayload, TransportDirection};

#[derive(Debug, Clone)]
pub struct Transport {
    pub id: String,
    pub direction: TransportDirection,
    pub connected: bool,
}

#[derive(Debug, Clone)]
pub struct Producer {
    pub id: String,
    pub transport_id: String,
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct Consumer {
    pub id: String,
    pub producer_id: String,
    pub transport_id: String,
    pub kind: String,
    pub paused: bool,
}

/// A room's SFU resource bundle: the set of transports, producers, and
/// consumers currently open against its router, plus the worker it was
/// placed on.
pub struct RouterBundle {
    pub worker_id: u64,
    pub rtp_capabilities: OpaquePayload,
    transports: HashMap<String, Transport>,
    producers: HashMap<String, Producer>,
    consumers: HashMap<String, Consumer>,
}

impl RouterBundle {
    pub fn new(worker_id: u64) -> Self {
        Self {
            worker_id,
            rtp_capabilities: default_rtp_capabilities(),
            transports: HashMap::new(),
            producers: HashMap::new(),
            consumers: HashMap::new(),
        }
    }

    /// `id` is caller-supplied (`"{connectionId}-{direction}"`) rather than
    /// engine-generated, so [`Self::cleanup_connection`] can find every
    /// transport belonging to a connection by prefix.
    pub fn create_transport(&mut self, id: String, direction: TransportDirection) -> Transport {
        let transport = Transport {
            id,
            direction,
            connected: false,
        };
        self.transports.insert(transport.id.clone(), transport.clone());
        transport
    }

    pub fn connect_transport(&mut self, transport_id: &str) -> bool {
        match self.transports.get_mut(transport_id) {
            Some(transport) => {
                transport.connected = true;
                true
            }
            None => false,
        }
    }

    pub fn produce(&mut self, transport_id: &str, kind: &str) -> Option<Producer> {
        if !self.transports.contains_key(transport_id) {
            return None;
        }
        let producer = Producer {
            id: Uuid::new_v4().to_string(),
            transport_id: transport_id.to_string(),
            kind: kind.to_string(),
        };
        self.producers.insert(producer.id.clone(), producer.clone());
        Some(producer)
    }

    /// Consumers start unpaused; `resumeConsumer` is still a required call
    /// for clients to make on their expected flow, it is simply a no-op
    /// against an already-running consumer.
    pub fn consume(&mut self, transport_id: &str, producer_id: &str) -> Option<Consumer> {
        if !self.transports.contains_key(transport_id) {
            return None;
        }
        let producer = self.producers.get(producer_id)?;
        let consumer = Consumer {
            id: Uuid::new_v4().to_string(),
            producer_id: producer_id.to_string(),
            transport_id: transport_id.to_string(),
            kind: producer.kind.clone(),
            paused: false,
        };
        self.consumers.insert(consumer.id.clone(), consumer.clone());
        Some(consumer)
    }

    pub fn resume_consumer(&mut self, consumer_id: &str) -> bool {
        match self.consumers.get_mut(consumer_id) {
            Some(consumer) => {
                consumer.paused = false;
                true
            }
            None => false,
        }
    }

    pub fn producer_ids(&self) -> Vec<String> {
        self.producers.keys().cloned().collect()
    }

    pub fn close_producer(&mut self, producer_id: &str) -> bool {
        let removed = self.producers.remove(producer_id).is_some();
        self.consumers.retain(|_, c| c.producer_id != producer_id);
        removed
    }

    pub fn close_transport(&mut self, transport_id: &str) -> bool {
        let removed = self.transports.remove(transport_id).is_some();
        self.producers.retain(|_, p| p.transport_id != transport_id);
        self.consumers.retain(|_, c| c.transport_id != transport_id);
        removed
    }

    /// Closes every transport whose id starts with `prefix`. If any were
    /// closed, also closes ALL producers in the room (producer ownership is
    /// not tracked per connection at the engine level) and returns their
    /// ids so the caller can broadcast `producerClosed` for each.
    pub fn cleanup_connection(&mut self, connection_id_prefix: &str) -> Vec<String> {
        let matching: Vec<String> = self
            .transports
            .keys()
            .filter(|id| id.starts_with(connection_id_prefix))
            .cloned()
            .collect();
        if matching.is_empty() {
            return Vec::new();
        }
        for id in &matching {
            self.transports.remove(id);
        }
        let closed_producers: Vec<String> = self.producers.keys().cloned().collect();
        self.producers.clear();
        self.consumers.clear();
        closed_producers
    }
}

fn default_rtp_capabilities() -> OpaquePayload {
    serde_json::json!({ "codecs": [], "headerExtensions": [] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produce_requires_existing_transport() {
        let mut bundle = RouterBundle::new(0);
        assert!(bundle.produce("missing", "video").is_none());
    }

    #[test]
    fn consume_requires_existing_producer() {
        let mut bundle = RouterBundle::new(0);
        let transport = bundle.create_transport("c1-send".to_string(), TransportDirection::Send);
        assert!(bundle.consume(&transport.id, "missing-producer").is_none());
    }

    #[test]
    fn produce_then_consume_round_trips() {
        let mut bundle = RouterBundle::new(0);
        let send = bundle.create_transport("c1-send".to_string(), TransportDirection::Send);
        let recv = bundle.create_transport("c1-recv".to_string(), TransportDirection::Recv);
        let producer = bundle.produce(&send.id, "video").unwrap();
        let consumer = bundle.consume(&recv.id, &producer.id).unwrap();
        assert!(!consumer.paused);
        assert_eq!(consumer.producer_id, producer.id);
    }

    #[test]
    fn cleanup_connection_closes_all_producers_when_any_transport_matches() {
        let mut bundle = RouterBundle::new(0);
        let t1 = bundle.create_transport("c1-send".to_string(), TransportDirection::Send);
        let t2 = bundle.create_transport("c1-recv".to_string(), TransportDirection::Recv);
        let p1 = bundle.produce(&t1.id, "video").unwrap();
        let _p2 = bundle.produce(&t2.id, "audio").unwrap();

        let closed = bundle.cleanup_connection("c1-");
        assert_eq!(closed.len(), 2);
        assert!(closed.contains(&p1.id));
        assert!(bundle.producer_ids().is_empty());
    }

    #[test]
    fn cleanup_connection_is_noop_when_prefix_matches_nothing() {
        let mut bundle = RouterBundle::new(0);
        let t1 = bundle.create_transport("c1-send".to_string(), TransportDirection::Send);
        bundle.produce(&t1.id, "video").unwrap();
        let closed = bundle.cleanup_connection("no-such-prefix");
        assert!(closed.is_empty());
        assert_eq!(bundle.producer_ids().len(), 1);
    }
}
