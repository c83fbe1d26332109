//! Driver counters

/// Running counters, reported by [`super::RiceCooker::stats`]
///
/// All counters saturate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverStats {
    /// Bytes read from the UART
    pub bytes_received: u32,
    /// Status frames applied to the device state
    pub frames_accepted: u32,
    /// Corrupted frames rejected on checksum, counted once per frame
    pub frames_dropped: u32,
    /// Failed UART reads
    pub rx_errors: u32,
    /// Failed UART writes
    pub tx_errors: u32,
    /// Publish rounds delivered to adapters
    pub publishes: u32,
}

pub(crate) fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}
