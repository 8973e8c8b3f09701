//! Edge-triggered toggle switches
//!
//! Each panel switch carries a persistent boolean that flips on every
//! press. There is deliberately no debounce filtering: a noisy
//! transition counts as a real edge. The panel switches are latching
//! enough in practice that this has not been a problem.

/// A switch input with edge-triggered toggle semantics
///
/// Feed [`update`](Self::update) the normalized level once per control
/// cycle ("pressed" = `true`). The toggle flips exactly once per rising
/// edge and never on a falling or held level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToggleSwitch {
    previous: bool,
    current: bool,
    toggle: bool,
}

impl ToggleSwitch {
    /// Create a switch with the toggle off
    pub const fn new() -> Self {
        Self {
            previous: false,
            current: false,
            toggle: false,
        }
    }

    /// Create a switch with the toggle already on
    ///
    /// The mist-enable switch starts engaged so that a machine powered
    /// on with the process signal present begins misting immediately.
    pub const fn engaged() -> Self {
        Self {
            previous: false,
            current: false,
            toggle: true,
        }
    }

    /// Sample the switch level for this cycle
    pub fn update(&mut self, pressed: bool) {
        self.current = pressed;

        // rising edge
        if self.current && !self.previous {
            self.previous = self.current;
            self.toggle = !self.toggle;
        }

        if !self.current && self.previous {
            self.previous = self.current;
        }
    }

    /// Current toggle state
    pub fn is_on(&self) -> bool {
        self.toggle
    }

    /// Level sampled by the last [`update`](Self::update) call
    ///
    /// The manual-boost button acts on the held level rather than the
    /// toggle.
    pub fn is_pressed(&self) -> bool {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rising_edge_flips() {
        let mut sw = ToggleSwitch::new();

        sw.update(true);
        assert!(sw.is_on());

        sw.update(false);
        assert!(sw.is_on());

        sw.update(true);
        assert!(!sw.is_on());
    }

    #[test]
    fn test_held_level_flips_once() {
        let mut sw = ToggleSwitch::new();

        sw.update(true);
        sw.update(true);
        sw.update(true);
        assert!(sw.is_on());

        sw.update(false);
        assert!(sw.is_on());
    }

    #[test]
    fn test_falling_edge_does_not_flip() {
        let mut sw = ToggleSwitch::new();

        sw.update(true);
        sw.update(false);
        sw.update(false);
        assert!(sw.is_on());
    }

    #[test]
    fn test_engaged_start() {
        let mut sw = ToggleSwitch::engaged();
        assert!(sw.is_on());

        // First press turns it off
        sw.update(true);
        assert!(!sw.is_on());
    }

    #[test]
    fn test_pressed_tracks_level() {
        let mut sw = ToggleSwitch::new();

        sw.update(true);
        assert!(sw.is_pressed());
        sw.update(false);
        assert!(!sw.is_pressed());
    }

    proptest! {
        /// For any level sequence the toggle flips exactly once per
        /// rising edge, never on falling or held levels.
        #[test]
        fn toggle_follows_rising_edges(levels in prop::collection::vec(any::<bool>(), 0..64)) {
            let mut sw = ToggleSwitch::new();
            let mut expected = false;
            let mut prev = false;

            for &level in &levels {
                sw.update(level);
                if level && !prev {
                    expected = !expected;
                }
                prev = level;
                prop_assert_eq!(sw.is_on(), expected);
                prop_assert_eq!(sw.is_pressed(), level);
            }
        }
    }
}
