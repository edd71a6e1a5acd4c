use crate::validation::PositioningError;

/// Lazy rolling-mean iterator over an RSSI series
///
/// For window size `w`, the first `w - 1` input positions have no output
/// at all (insufficient history); from then on each output is the exact
/// arithmetic mean of the trailing `w` inputs. Callers that need aligned
/// indices must account for the `w - 1` offset rather than padding with
/// zeros.
#[derive(Debug)]
pub struct MovingAverage<'a> {
    values: &'a [f64],
    window: usize,
    /// Index of the next window start
    next: usize,
    /// Running sum of the current window, updated incrementally
    sum: f64,
}

impl<'a> Iterator for MovingAverage<'a> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let end = self.next + self.window;
        if end > self.values.len() {
            return None;
        }
        if self.next == 0 {
            self.sum = self.values[..self.window].iter().sum();
        } else {
            self.sum += self.values[end - 1] - self.values[self.next - 1];
        }
        self.next += 1;
        Some(self.sum / self.window as f64)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.values.len() + 1).saturating_sub(self.next + self.window);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for MovingAverage<'a> {}

/// Create a rolling-mean iterator over `values` with the given window size
///
/// Fails with [`PositioningError::InsufficientData`] when the series is
/// empty, the window is zero, or the window exceeds the series length.
pub fn moving_average(
    values: &[f64],
    window: usize,
) -> Result<MovingAverage<'_>, PositioningError> {
    if window == 0 || values.is_empty() || window > values.len() {
        return Err(PositioningError::InsufficientData {
            available: values.len(),
            required: window.max(1),
        });
    }
    Ok(MovingAverage {
        values,
        window,
        next: 0,
        sum: 0.0,
    })
}
