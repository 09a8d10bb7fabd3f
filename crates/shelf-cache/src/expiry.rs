use std::time::Duration;

/// How long a cache entry stays resolvable after insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// Five minutes. The default for decoded assets.
    Short,
    /// Twenty-four hours.
    Long,
    /// An explicit duration.
    Custom(Duration),
}

impl Expiry {
    /// The concrete duration this policy maps to.
    pub fn duration(&self) -> Duration {
        match self {
            Expiry::Short => Duration::from_secs(5 * 60),
            Expiry::Long => Duration::from_secs(24 * 60 * 60),
            Expiry::Custom(duration) => *duration,
        }
    }
}

impl Default for Expiry {
    fn default() -> Self {
        Self::Short
    }
}

impl From<Duration> for Expiry {
    fn from(duration: Duration) -> Self {
        Self::Custom(duration)
    }
}
