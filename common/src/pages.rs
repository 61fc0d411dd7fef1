//! Display pages.

/// Which page the display shows.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Page {
    /// Camera view with the overlay layers.
    #[default]
    Overlay,
    /// Counters and the event log.
    Debug,
}

impl Page {
    /// The other page.
    pub const fn toggle(self) -> Self {
        match self {
            Self::Overlay => Self::Debug,
            Self::Debug => Self::Overlay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_overlay() {
        assert_eq!(Page::default(), Page::Overlay);
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Page::Overlay.toggle(), Page::Debug);
        assert_eq!(Page::Debug.toggle(), Page::Overlay);
    }
}
