//! Seek bar model shared by the controller and the manager screen.

/// Formats milliseconds as `m:ss`.
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Position indicator for the open recording, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeekBar {
    value: u64,
    maximum: u64,
    dragging: bool,
}

impl SeekBar {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn maximum(&self) -> u64 {
        self.maximum
    }

    /// Whether the handle is currently held by the user.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Sets the range to `0..=maximum` and resets the value.
    pub fn set_range(&mut self, maximum: u64) {
        self.maximum = maximum;
        self.value = 0;
        self.dragging = false;
    }

    pub fn set_value(&mut self, value: u64) {
        self.value = value.min(self.maximum);
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Position as a ratio in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.maximum == 0 {
            0.0
        } else {
            self.value as f64 / self.maximum as f64
        }
    }

    /// Maps a column inside a bar of `width` cells to a value.
    pub fn value_at(&self, column: u16, width: u16) -> u64 {
        if width <= 1 {
            return 0;
        }
        let column = column.min(width - 1);
        self.maximum * u64::from(column) / u64::from(width - 1)
    }

    /// Column of the handle inside a bar of `width` cells.
    pub fn handle_column(&self, width: u16) -> u16 {
        if width <= 1 {
            return 0;
        }
        (self.ratio() * f64::from(width - 1)).round() as u16
    }

    /// Elapsed time label shown next to the bar.
    pub fn label(&self) -> String {
        format_clock(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9_999), "0:09");
        assert_eq!(format_clock(61_000), "1:01");
        assert_eq!(format_clock(3_600_000), "60:00");
    }

    #[test]
    fn test_value_is_clamped_to_range() {
        let mut bar = SeekBar::default();
        bar.set_range(5_000);
        bar.set_value(9_000);
        assert_eq!(bar.value(), 5_000);
        assert_eq!(bar.label(), "0:05");
    }

    #[test]
    fn test_column_mapping() {
        let mut bar = SeekBar::default();
        bar.set_range(10_000);
        assert_eq!(bar.value_at(0, 11), 0);
        assert_eq!(bar.value_at(5, 11), 5_000);
        assert_eq!(bar.value_at(40, 11), 10_000);

        bar.set_value(5_000);
        assert_eq!(bar.handle_column(11), 5);
    }
}
