use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of the current time for anything that stamps records.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Produces the random tail of an order number (`ORD-20260118-<suffix>`).
pub trait OrderNumberSuffix: Send + Sync {
    fn next_suffix(&self) -> String;
}

/// Six upper-case hex characters taken from a fresh v4 UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSuffix;

impl OrderNumberSuffix for RandomSuffix {
    fn next_suffix(&self) -> String {
        let simple = Uuid::new_v4().simple().to_string();
        simple[..6].to_uppercase()
    }
}

pub fn format_order_number(now: DateTime<Utc>, suffix: &str) -> String {
    format!("ORD-{}-{}", now.format("%Y%m%d"), suffix)
}
