//! Running-average palm smoothing with jump reset

/// Averages palm x/y over the current steady hold.
///
/// When a new sample departs from the running average by more than the
/// jump threshold on either axis the hand is treated as having moved, and
/// averaging restarts from that sample.
#[derive(Debug, Clone)]
pub struct PalmAverager {
    jump: f64,
    sum: (f64, f64),
    count: u32,
}

impl PalmAverager {
    pub fn new(jump: f64) -> Self {
        Self {
            jump,
            sum: (0.0, 0.0),
            count: 0,
        }
    }

    pub fn reset(&mut self) {
        self.sum = (0.0, 0.0);
        self.count = 0;
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Add a sample and return the smoothed position
    pub fn push(&mut self, x: f64, y: f64) -> (f64, f64) {
        if let Some((avg_x, avg_y)) = self.average() {
            if (x - avg_x).abs() > self.jump || (y - avg_y).abs() > self.jump {
                self.reset();
            }
        }

        self.sum.0 += x;
        self.sum.1 += y;
        self.count += 1;

        self.average().unwrap_or((x, y))
    }

    pub fn average(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some((self.sum.0 / n, self.sum.1 / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_steady_hold() {
        let mut avg = PalmAverager::new(55.0);

        assert_eq!(avg.push(100.0, 10.0), (100.0, 10.0));
        assert_eq!(avg.push(110.0, 20.0), (105.0, 15.0));
        assert_eq!(avg.push(120.0, 30.0), (110.0, 20.0));
        assert_eq!(avg.len(), 3);
    }

    #[test]
    fn test_jump_restarts_average() {
        let mut avg = PalmAverager::new(55.0);

        avg.push(100.0, 0.0);
        avg.push(102.0, 0.0);
        // 99mm away from the average of 101
        assert_eq!(avg.push(200.0, 0.0), (200.0, 0.0));
        assert_eq!(avg.len(), 1);
    }

    #[test]
    fn test_jump_on_either_axis() {
        let mut avg = PalmAverager::new(55.0);

        avg.push(0.0, 0.0);
        assert_eq!(avg.push(0.0, -60.0), (0.0, -60.0));
        assert_eq!(avg.push(50.0, -60.0), (25.0, -60.0));
    }

    #[test]
    fn test_reset() {
        let mut avg = PalmAverager::new(55.0);
        avg.push(1.0, 1.0);
        avg.reset();
        assert!(avg.is_empty());
        assert_eq!(avg.average(), None);
    }
}
