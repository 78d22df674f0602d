use tokio::time::{Duration, Instant};

pub fn get_instant() -> Instant {
    Instant::now()
}

/// Instant `millis` from now, used as an upstream deadline.
pub fn deadline_after_ms(millis: u64) -> Instant {
    get_instant() + Duration::from_millis(millis)
}
