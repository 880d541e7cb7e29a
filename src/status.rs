//! Device status flags shown as glyphs.
//!
//! Every setter only touches `changed` on a real transition, so repeated
//! readings of the same state never cause a glyph refresh.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    changed: bool,
    is_charging: bool,
    is_battery_discharged: bool,
    is_bluetooth_connected: bool,
    is_quiet_time: bool,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            changed: true,
            is_charging: false,
            is_battery_discharged: false,
            is_bluetooth_connected: false,
            is_quiet_time: false,
        }
    }
}

/// Update `flag`, marking `changed` on a transition.
fn transition(flag: &mut bool, changed: &mut bool, value: bool) -> bool {
    if *flag == value {
        return false;
    }
    *flag = value;
    *changed = true;
    true
}

impl Status {
    /// All flags off, glyphs pending refresh.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_charging(&mut self, charging: bool) -> bool {
        transition(&mut self.is_charging, &mut self.changed, charging)
    }

    pub fn set_battery_discharged(&mut self, discharged: bool) -> bool {
        transition(&mut self.is_battery_discharged, &mut self.changed, discharged)
    }

    pub fn set_bluetooth_connected(&mut self, connected: bool) -> bool {
        transition(&mut self.is_bluetooth_connected, &mut self.changed, connected)
    }

    pub fn set_quiet_time(&mut self, quiet: bool) -> bool {
        transition(&mut self.is_quiet_time, &mut self.changed, quiet)
    }

    /// Force a glyph refresh without a flag transition.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Whether the glyphs need refreshing. Does not clear the bit; the
    /// renderer calls [`Status::acknowledge`] once the glyphs match.
    pub fn consume_changed(&self) -> bool {
        self.changed
    }

    /// Clear the dirty bit. Only the renderer calls this.
    pub(crate) fn acknowledge(&mut self) {
        self.changed = false;
    }

    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    pub fn is_battery_discharged(&self) -> bool {
        self.is_battery_discharged
    }

    pub fn is_bluetooth_connected(&self) -> bool {
        self.is_bluetooth_connected
    }

    pub fn is_quiet_time(&self) -> bool {
        self.is_quiet_time
    }
}
