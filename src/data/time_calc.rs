use std::time::Duration;

/// Running latency accumulator for the end-of-run summary.
#[derive(Debug, Default, Clone)]
pub struct TimeCalc {
    n: usize,
    total: Duration,
    max: Duration,
}

#[allow(dead_code)]
impl TimeCalc {
    pub fn push(&mut self, x: Duration) {
        self.n += 1;
        self.total += x;
        self.max = self.max.max(x);
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Zero until the first sample.
    pub fn avg(&self) -> Duration {
        if self.n == 0 {
            return Duration::ZERO;
        }
        self.total / self.n as u32
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_samples() {
        let mut t = TimeCalc::default();
        assert_eq!(t.avg(), Duration::ZERO);
        t.push(Duration::from_millis(10));
        t.push(Duration::from_millis(30));
        assert_eq!(t.n(), 2);
        assert_eq!(t.avg(), Duration::from_millis(20));
        assert_eq!(t.max(), Duration::from_millis(30));
        t.clear();
        assert_eq!(t.n(), 0);
    }
}
