//! Button edge detection

/// Minimum time between accepted button edges
pub const DEBOUNCE_MS: u64 = 50;

/// A debounced button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    Pressed,
    Released,
}

/// Turns raw button levels into debounced edges
///
/// A level change is accepted only if the previous accepted change is more
/// than the debounce interval ago; contact bounce inside that window is
/// ignored.
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    debounce_ms: u64,
    pressed: bool,
    last_edge_ms: Option<u64>,
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_MS)
    }
}

impl ButtonDebouncer {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            pressed: false,
            last_edge_ms: None,
        }
    }

    /// Start from a known level without reporting an edge
    pub fn with_initial(mut self, pressed: bool) -> Self {
        self.pressed = pressed;
        self
    }

    /// Debounced pressed state
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Feed the current raw level
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEdge> {
        if pressed == self.pressed {
            return None;
        }
        if let Some(last) = self.last_edge_ms {
            if now_ms.saturating_sub(last) <= self.debounce_ms {
                return None;
            }
        }
        self.pressed = pressed;
        self.last_edge_ms = Some(now_ms);
        Some(if pressed {
            ButtonEdge::Pressed
        } else {
            ButtonEdge::Released
        })
    }
}
