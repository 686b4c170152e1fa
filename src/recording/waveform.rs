//! Scrolling history for the recording level meter.

/// Appends the latest level and drops the oldest once the meter is full.
pub fn update_waveform(history: &mut Vec<u64>, level: u8, max_width: usize) {
    history.push(level as u64);
    if history.len() > max_width {
        let excess = history.len() - max_width;
        history.drain(..excess);
    }
}

/// Fits the history to a new terminal width.
///
/// Shrinking drops the oldest values; growing pads silence on the left so the
/// newest level stays at the right edge.
pub fn resize_waveform(history: &mut Vec<u64>, target_width: usize) {
    if history.len() > target_width {
        let excess = history.len() - target_width;
        history.drain(..excess);
    } else if history.len() < target_width {
        let missing = target_width - history.len();
        history.splice(0..0, std::iter::repeat(0).take(missing));
    }
}
