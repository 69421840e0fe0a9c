//! Binding of local terminal state to one external text endpoint.

use tracing::{debug, info};

use super::protocol::{SyncOutcome, SyncProtocol};
use crate::endpoint::TextEndpoint;
use crate::errors::EndpointError;
use crate::packet::Packet;

/// Owns the local [`Packet`] and the endpoint it is mirrored to.
///
/// Call [`update`](Self::update) once per tick. Each call reads the endpoint
/// exactly once and writes it at most once.
pub struct Terminal<E: TextEndpoint> {
    packet: Packet,
    endpoint: E,
}

impl<E: TextEndpoint> Terminal<E> {
    /// Bind a default packet to `endpoint`.
    pub fn new(endpoint: E) -> Self {
        Self::with_packet(endpoint, Packet::new())
    }

    pub fn with_packet(endpoint: E, packet: Packet) -> Self {
        debug!(endpoint = %endpoint.describe(), "terminal bound to endpoint");
        Self { packet, endpoint }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn packet_mut(&mut self) -> &mut Packet {
        &mut self.packet
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }

    pub fn into_parts(self) -> (Packet, E) {
        (self.packet, self.endpoint)
    }

    /// Run one sync tick.
    ///
    /// Returns `true` when the external text holds an edit that was accepted
    /// this cycle and must not be overwritten.
    pub fn update(&mut self) -> Result<bool, EndpointError> {
        Ok(self.tick()?.is_external_edit())
    }

    /// Run one sync tick and report the full outcome.
    pub fn tick(&mut self) -> Result<SyncOutcome, EndpointError> {
        let external = self.endpoint.get_text()?;
        let outcome = SyncProtocol::reconcile(self.packet.store_mut(), &external);

        if outcome.needs_push() {
            self.push()?;
        }

        debug!(outcome = %outcome, "tick complete");
        Ok(outcome)
    }

    /// Write the local canonical text to the endpoint unconditionally.
    pub fn push(&mut self) -> Result<(), EndpointError> {
        let text = self.packet.serialize();
        info!(endpoint = %self.endpoint.describe(), bytes = text.len(), "pushing local state");
        self.endpoint.set_text(&text)
    }
}
