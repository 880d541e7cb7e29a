//! Battery readings and the voltage-to-charge curve.

/// Battery reading as reported by the charger and fuel gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryChargeState {
    pub charge_percent: u8,
    pub is_charging: bool,
    pub is_plugged: bool,
}

/// Estimate LiPo charge from cell voltage.
///
/// Piecewise linear: empty below 3.45 V, 50 % at 3.7 V, full from 4.2 V.
pub fn charge_percent_from_millivolts(mv: u16) -> u8 {
    (match mv {
        0..=3449 => 0,
        3450..=3699 => (mv - 3450) / 5,
        3700..=4199 => 50 + (mv - 3700) / 10,
        _ => 100,
    }) as u8
}

/// Cell voltage from a 12-bit SAADC sample (gain 1/6, 0.6 V reference,
/// 1:2 divider in front of the pin).
pub fn millivolts_from_sample(raw: i16) -> u16 {
    (raw.max(0) as u32 * 3600 * 2 / 4096) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_end_points() {
        assert_eq!(charge_percent_from_millivolts(0), 0);
        assert_eq!(charge_percent_from_millivolts(3449), 0);
        assert_eq!(charge_percent_from_millivolts(3450), 0);
        assert_eq!(charge_percent_from_millivolts(3700), 50);
        assert_eq!(charge_percent_from_millivolts(4199), 99);
        assert_eq!(charge_percent_from_millivolts(4200), 100);
        assert_eq!(charge_percent_from_millivolts(u16::MAX), 100);
    }

    #[test]
    fn curve_is_monotonic() {
        let mut last = 0;
        for mv in 3000..4400 {
            let pct = charge_percent_from_millivolts(mv);
            assert!(pct >= last);
            last = pct;
        }
    }

    #[test]
    fn sample_conversion() {
        assert_eq!(millivolts_from_sample(-12), 0);
        assert_eq!(millivolts_from_sample(0), 0);
        // 2048 counts = half scale = 1.8 V at the pin, 3.6 V at the cell.
        assert_eq!(millivolts_from_sample(2048), 3600);
    }
}
