//! Equality-gated memoization of layer state.
//!
//! Every tick derives a fresh value for each layer. The gate compares it with
//! the value retained from the last redraw and only reports a change when the
//! two differ. On equality the retained value is kept and the fresh one is
//! dropped, so a run of identical ticks produces no redraw requests.
//!
//! | Input | needs redraw | retained afterwards |
//! |-------|--------------|---------------------|
//! | `new == retained` | `false` | old value |
//! | `new != retained` | `true` | `new` |

use core::mem;

/// Compare a freshly derived value against the retained one.
///
/// Returns whether a redraw is needed and the value to retain.
#[inline]
pub fn should_update<T: PartialEq>(
    new: T,
    retained: T,
) -> (bool, T) {
    if new == retained { (false, retained) } else { (true, new) }
}

/// Holder for the last value that was handed to the painter.
#[derive(Debug, Default, Clone)]
pub struct ChangeGate<T> {
    retained: T,
}

impl<T: PartialEq + Default> ChangeGate<T> {
    /// Create a gate retaining the empty default value.
    pub fn new() -> Self { Self { retained: T::default() } }

    /// Create a gate retaining a specific initial value.
    pub const fn with_initial(value: T) -> Self { Self { retained: value } }

    /// Retain `new` if it differs from the current value.
    ///
    /// Returns `true` if the value changed and a redraw is needed.
    pub fn compare_and_swap(
        &mut self,
        new: T,
    ) -> bool {
        let retained = mem::take(&mut self.retained);
        let (changed, keep) = should_update(new, retained);
        self.retained = keep;
        changed
    }

    /// Drop the retained value back to the empty default.
    pub fn reset(&mut self) { self.retained = T::default(); }

    /// The value last handed to the painter.
    #[inline]
    pub const fn current(&self) -> &T { &self.retained }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn test_equal_values_need_no_redraw() {
        for v in [0, 1, -7, i32::MAX] {
            let (redraw, kept) = should_update(v, v);
            assert!(!redraw, "Equal values must not request a redraw");
            assert_eq!(kept, v);
        }
    }

    #[test]
    fn test_unequal_values_retain_new() {
        let (redraw, kept) = should_update(String::from("b"), String::from("a"));
        assert!(redraw);
        assert_eq!(kept, "b");
    }

    #[test]
    fn test_equal_keeps_old_instance() {
        // Capacity identifies the instance that survived the comparison
        let mut old = String::with_capacity(64);
        old.push_str("same");
        let new = String::from("same");
        let (redraw, kept) = should_update(new, old);
        assert!(!redraw);
        assert!(kept.capacity() >= 64, "Retained value should be the old instance");
    }

    #[test]
    fn test_gate_signals_once_per_change() {
        let mut gate: ChangeGate<Vec<String>> = ChangeGate::new();
        let status = vec![String::from("Stock Mode"), String::from("Disengaged")];

        assert!(gate.compare_and_swap(status.clone()), "First real value differs from empty");
        for _ in 0..10 {
            assert!(!gate.compare_and_swap(status.clone()), "Identical ticks must not redraw");
        }
        assert_eq!(gate.current(), &status);
    }

    #[test]
    fn test_reset_forces_next_redraw() {
        let mut gate = ChangeGate::with_initial(5_u32);
        assert!(!gate.compare_and_swap(5));
        gate.reset();
        assert_eq!(*gate.current(), 0);
        assert!(gate.compare_and_swap(5), "Value seen before reset must redraw again");
    }
}
