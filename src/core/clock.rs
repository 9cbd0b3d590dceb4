use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};

/// Source of wall-clock time for session expiry checks and default query dates.
///
/// The client holds one clock for its whole lifetime. [`SystemClock`] is used unless
/// another one is supplied via [`IssClientBuilder::clock`](crate::IssClientBuilder::clock).
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current instant, used to evaluate cookie expiry.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in the local timezone.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }

    /// The date before [`Clock::today`]; the ISS default for daily statistics.
    fn yesterday(&self) -> NaiveDate {
        let today = self.today();
        today.checked_sub_signed(TimeDelta::days(1)).unwrap_or(today)
    }
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
