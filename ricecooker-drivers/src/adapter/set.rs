//! Ordered adapter subscriptions

use heapless::Vec;
use ricecooker_core::traits::{BinarySink, Channel, TemperatureSink};
use ricecooker_protocol::StatusFrame;

/// Maximum number of attached adapters
pub const MAX_ADAPTERS: usize = 8;

/// Handle returned by attach, used to detach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdapterId(u16);

/// Errors when attaching an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttachError {
    /// All `MAX_ADAPTERS` slots are taken
    Full,
    /// Sink kind does not match the channel's value type
    WrongChannel,
}

impl core::fmt::Display for AttachError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AttachError::Full => f.write_str("adapter set is full"),
            AttachError::WrongChannel => f.write_str("sink does not match channel"),
        }
    }
}

#[derive(Clone, Copy)]
enum Sink<'a> {
    Temperature(&'a dyn TemperatureSink),
    Binary(&'a dyn BinarySink),
}

impl Sink<'_> {
    /// Data address, for recognising the same sink attached twice
    fn addr(&self) -> *const () {
        match *self {
            Sink::Temperature(sink) => {
                let ptr: *const _ = sink;
                ptr.cast::<()>()
            }
            Sink::Binary(sink) => {
                let ptr: *const _ = sink;
                ptr.cast::<()>()
            }
        }
    }
}

#[derive(Clone, Copy)]
struct Subscription<'a> {
    id: AdapterId,
    channel: Channel,
    sink: Sink<'a>,
}

/// Adapters in attach order
///
/// Only changed through `&mut self`, so never while a publish is running.
pub struct AdapterSet<'a> {
    subscriptions: Vec<Subscription<'a>, MAX_ADAPTERS>,
    next_id: u16,
}

impl Default for AdapterSet<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> AdapterSet<'a> {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    /// Subscribe a temperature sink to a temperature channel
    pub fn attach_temperature(
        &mut self,
        channel: Channel,
        sink: &'a dyn TemperatureSink,
    ) -> Result<AdapterId, AttachError> {
        if !channel.is_temperature() {
            return Err(AttachError::WrongChannel);
        }
        self.attach(channel, Sink::Temperature(sink))
    }

    /// Subscribe a binary sink to a binary channel
    pub fn attach_binary(
        &mut self,
        channel: Channel,
        sink: &'a dyn BinarySink,
    ) -> Result<AdapterId, AttachError> {
        if channel.is_temperature() {
            return Err(AttachError::WrongChannel);
        }
        self.attach(channel, Sink::Binary(sink))
    }

    fn attach(&mut self, channel: Channel, sink: Sink<'a>) -> Result<AdapterId, AttachError> {
        // Attaching the same sink to the same channel again is a no-op
        if let Some(existing) = self
            .subscriptions
            .iter()
            .find(|s| s.channel == channel && s.sink.addr() == sink.addr())
        {
            return Ok(existing.id);
        }

        let id = AdapterId(self.next_id);
        self.subscriptions
            .push(Subscription { id, channel, sink })
            .map_err(|_| AttachError::Full)?;
        self.next_id = self.next_id.wrapping_add(1);
        Ok(id)
    }

    /// Remove a subscription; returns false if it was not attached
    pub fn detach(&mut self, id: AdapterId) -> bool {
        match self.subscriptions.iter().position(|s| s.id == id) {
            Some(index) => {
                self.subscriptions.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: AdapterId) -> bool {
        self.subscriptions.iter().any(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Push the frame's values to every subscription, in attach order
    pub fn publish(&self, frame: &StatusFrame) {
        for subscription in &self.subscriptions {
            match (subscription.channel, subscription.sink) {
                (Channel::TopTemperature, Sink::Temperature(sink)) => {
                    sink.publish_celsius(frame.top_temp_c)
                }
                (Channel::BottomTemperature, Sink::Temperature(sink)) => {
                    sink.publish_celsius(frame.bottom_temp_c)
                }
                (Channel::WifiStatus, Sink::Binary(sink)) => sink.write_state(frame.wifi_led_on),
                // Ruled out by the attach checks
                _ => {}
            }
        }
    }
}
