//! UART link state machine

/// Link states
///
/// `Active` is terminal: a link that goes quiet is reported through
/// staleness, not by leaving `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No byte source attached yet (setup only)
    AwaitingUart,
    /// Receiving bytes, no valid frame yet
    Syncing,
    /// At least one valid frame applied
    Active,
}

/// Events that move the link forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// A UART was attached to the driver
    UartAttached,
    /// A valid frame was applied to the device state
    FrameAccepted,
}

impl LinkState {
    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            (AwaitingUart, UartAttached) => Syncing,
            (Syncing, FrameAccepted) => Active,
            // Everything else leaves the state unchanged
            (state, _) => state,
        }
    }

    /// True once a frame has been received
    pub fn is_active(&self) -> bool {
        matches!(self, LinkState::Active)
    }
}
