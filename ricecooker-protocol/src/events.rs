//! Front-panel key events reported in the status frame KEY byte

/// Keys on the rice cooker panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// Timer key
    Timer,
    /// Cancel key
    Cancel,
    /// Menu / select key
    Select,
    /// Start key
    Start,
}

// Wire format values. Bit 7 flags a key press, bits 0..3 name the key.
const KEY_TIMER: u8 = 0x81;
const KEY_CANCEL: u8 = 0x82;
const KEY_SELECT: u8 = 0x84;
const KEY_START: u8 = 0x88;

impl KeyEvent {
    /// Parse a key from the status frame KEY byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            KEY_TIMER => Some(KeyEvent::Timer),
            KEY_CANCEL => Some(KeyEvent::Cancel),
            KEY_SELECT => Some(KeyEvent::Select),
            KEY_START => Some(KeyEvent::Start),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            KeyEvent::Timer => KEY_TIMER,
            KeyEvent::Cancel => KEY_CANCEL,
            KeyEvent::Select => KEY_SELECT,
            KeyEvent::Start => KEY_START,
        }
    }
}
