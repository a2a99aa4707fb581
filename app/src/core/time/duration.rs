#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    pub(super) delegate: chrono::Duration,
}

impl Duration {
    pub(super) fn new(delegate: chrono::Duration) -> Self {
        Self { delegate }
    }

    pub fn seconds(seconds: i64) -> Self {
        Self::new(chrono::Duration::seconds(seconds))
    }

    #[cfg(test)]
    pub fn millis(millis: i64) -> Self {
        Self::new(chrono::Duration::milliseconds(millis))
    }

    #[cfg(test)]
    pub fn micros(micros: i64) -> Self {
        Self::new(chrono::Duration::microseconds(micros))
    }

    pub fn as_secs(&self) -> i64 {
        self.delegate.num_seconds()
    }

    /// Elapsed whole seconds, a started second counts as a full one.
    pub fn as_secs_ceil(&self) -> i64 {
        //num_seconds truncates towards zero, subsec_nanos carries the sign of the duration
        let secs = self.delegate.num_seconds();
        if self.delegate.subsec_nanos() > 0 { secs + 1 } else { secs }
    }
}

impl From<Duration> for std::time::Duration {
    fn from(val: Duration) -> Self {
        //std durations are unsigned
        let millis = val.delegate.num_milliseconds().max(0);
        std::time::Duration::from_millis(millis as u64)
    }
}
