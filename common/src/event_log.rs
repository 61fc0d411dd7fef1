//! Session event log.
//!
//! A fixed-capacity ring buffer of short messages shown on the debug page:
//! session start/end, engagement changes, profile stage advances.
//!
//! ```ignore
//! let mut log = EventLog::new();
//! log.push("Onroad");
//! log.push("Engaged");
//!
//! for line in log.iter() {
//!     println!("{}", line);
//! }
//! ```

use heapless::{Deque, String};

/// Number of events kept.
pub const EVENT_LOG_SIZE: usize = 8;

/// Maximum characters per event, including room for the cut-off.
pub const EVENT_LINE_LENGTH: usize = 40;

/// Ring buffer of recent events, oldest first.
pub struct EventLog {
    buffer: Deque<String<EVENT_LINE_LENGTH>, EVENT_LOG_SIZE>,
    total: u32,
}

impl EventLog {
    pub const fn new() -> Self {
        Self {
            buffer: Deque::new(),
            total: 0,
        }
    }

    /// Append an event, dropping the oldest one when full.
    ///
    /// Messages longer than a line are cut off.
    pub fn push(
        &mut self,
        msg: &str,
    ) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }

        let mut line: String<EVENT_LINE_LENGTH> = String::new();
        for c in msg.chars().take(EVENT_LINE_LENGTH - 1) {
            if line.push(c).is_err() {
                break;
            }
        }

        self.buffer.push_back(line).ok();
        self.total = self.total.wrapping_add(1);
    }

    /// Iterate over events (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.buffer.iter().map(heapless::string::StringInner::as_str) }

    /// Most recent event.
    pub fn latest(&self) -> Option<&str> { self.buffer.back().map(heapless::string::StringInner::as_str) }

    /// Events pushed since creation, including dropped ones.
    #[inline]
    pub const fn total(&self) -> u32 { self.total }

    #[inline]
    pub const fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    /// Drop every event. The running total is kept.
    pub fn clear(&mut self) { self.buffer.clear(); }
}

impl Default for EventLog {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
