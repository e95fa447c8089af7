//! Asynchronous input events.
//!
//! Written to the host between command responses whenever the panel is
//! touched or the user button changes state.

use serde::Serialize;

use crate::response::{to_line, EncodeError, ResponseLine};

/// Input event reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceEvent {
    /// Panel touched at pixel coordinates
    Touch { x: u16, y: u16 },
    /// Button pressed
    ButtonDown,
    /// Button released
    ButtonUp,
}

#[derive(Serialize)]
struct EventMessage {
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<u16>,
}

impl DeviceEvent {
    /// Encode as a single JSON line
    pub fn encode(&self) -> Result<ResponseLine, EncodeError> {
        let message = match *self {
            DeviceEvent::Touch { x, y } => EventMessage {
                event: "touch",
                x: Some(x),
                y: Some(y),
            },
            DeviceEvent::ButtonDown => EventMessage {
                event: "button_down",
                x: None,
                y: None,
            },
            DeviceEvent::ButtonUp => EventMessage {
                event: "button_up",
                x: None,
                y: None,
            },
        };
        to_line(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_event() {
        let line = DeviceEvent::Touch { x: 120, y: 88 }.encode().unwrap();
        assert_eq!(line.as_str(), r#"{"event":"touch","x":120,"y":88}"#);
    }

    #[test]
    fn test_button_events() {
        assert_eq!(
            DeviceEvent::ButtonDown.encode().unwrap().as_str(),
            r#"{"event":"button_down"}"#
        );
        assert_eq!(
            DeviceEvent::ButtonUp.encode().unwrap().as_str(),
            r#"{"event":"button_up"}"#
        );
    }
}
