use alloy::{primitives::B256, rpc::types::Log, sol_types::SolEvent};

use crate::{error::ParserError, handler::EventAttributes};

pub type DecodeFn = fn(&Log) -> Result<EventAttributes, ParserError>;

/// One event type the indexer replays.
#[derive(Clone, Copy)]
pub struct EventConsumer {
    pub name: &'static str,
    pub signature: B256,
    pub decode: DecodeFn,
}

/// Consumers in registration order. A pass scans them in this order.
#[derive(Clone, Default)]
pub struct EventRegistry {
    consumers: Vec<EventConsumer>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `E` under its ABI name. Registering the same event again
    /// replaces the decoder but keeps its position.
    pub fn register<E: SolEvent>(&mut self, decode: DecodeFn) -> &mut Self {
        let consumer = EventConsumer {
            name: event_name(E::SIGNATURE),
            signature: E::SIGNATURE_HASH,
            decode,
        };

        match self
            .consumers
            .iter_mut()
            .find(|c| c.signature == consumer.signature)
        {
            Some(existing) => *existing = consumer,
            None => self.consumers.push(consumer),
        }
        self
    }

    pub fn consumers(&self) -> &[EventConsumer] {
        &self.consumers
    }
}

fn event_name(signature: &'static str) -> &'static str {
    signature.split('(').next().unwrap_or(signature)
}
