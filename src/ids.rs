//! Identifier and clock sources
//!
//! The store never reaches for ambient time or randomness. Every id and
//! timestamp comes from an [`IdSource`] that the owner injects, so tests can
//! run against [`SequentialIds`] and a [`FixedClock`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a schema in the registry (e.g. `g1`, `g1718000000000`)
    SchemaId
);
string_id!(
    /// Identifier of a data row, unique within its schema's rows
    RowId
);
string_id!(
    /// Identifier of a queued toast
    ToastId
);

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Generator for the three identifier kinds the store hands out
pub trait IdGenerator {
    fn schema_id(&mut self, now: DateTime<Utc>) -> SchemaId;
    fn row_id(&mut self, now: DateTime<Utc>) -> RowId;
    fn toast_id(&mut self, now: DateTime<Utc>) -> ToastId;
}

/// Timestamp-derived ids in the dashboard's format.
///
/// Schema ids are `g{millis}`, forced strictly increasing so two schemas
/// created in the same millisecond still differ. Row and toast ids are
/// `{millis}{suffix}` where the suffix is a 9-character base36 sequence number.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last_schema_millis: i64,
    sequence: u64,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn suffixed(&mut self, now: DateTime<Utc>) -> String {
        self.sequence += 1;
        format!("{}{:0>9}", now.timestamp_millis(), base36(self.sequence))
    }
}

impl IdGenerator for TimestampIds {
    fn schema_id(&mut self, now: DateTime<Utc>) -> SchemaId {
        let millis = now.timestamp_millis().max(self.last_schema_millis + 1);
        self.last_schema_millis = millis;
        SchemaId(format!("g{}", millis))
    }

    fn row_id(&mut self, now: DateTime<Utc>) -> RowId {
        RowId(self.suffixed(now))
    }

    fn toast_id(&mut self, now: DateTime<Utc>) -> ToastId {
        ToastId(self.suffixed(now))
    }
}

/// Deterministic counters: `g1, g2, ...`, `r1, r2, ...`, `t1, t2, ...`
#[derive(Debug, Default)]
pub struct SequentialIds {
    schemas: u64,
    rows: u64,
    toasts: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn schema_id(&mut self, _now: DateTime<Utc>) -> SchemaId {
        self.schemas += 1;
        SchemaId(format!("g{}", self.schemas))
    }

    fn row_id(&mut self, _now: DateTime<Utc>) -> RowId {
        self.rows += 1;
        RowId(format!("r{}", self.rows))
    }

    fn toast_id(&mut self, _now: DateTime<Utc>) -> ToastId {
        self.toasts += 1;
        ToastId(format!("t{}", self.toasts))
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Generator plus clock, owned by the store and lent to the containers
pub struct IdSource {
    generator: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl IdSource {
    pub fn new(generator: impl IdGenerator + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            generator: Box::new(generator),
            clock: Box::new(clock),
        }
    }

    /// Timestamp ids on the wall clock
    pub fn system() -> Self {
        Self::new(TimestampIds::new(), SystemClock)
    }

    /// Counter ids on the wall clock
    pub fn sequential() -> Self {
        Self::new(SequentialIds::new(), SystemClock)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Next schema id that `taken` does not already claim
    pub fn schema_id(&mut self, taken: impl Fn(&SchemaId) -> bool) -> SchemaId {
        loop {
            let id = self.generator.schema_id(self.clock.now());
            if !taken(&id) {
                return id;
            }
        }
    }

    pub fn row_id(&mut self) -> RowId {
        self.generator.row_id(self.clock.now())
    }

    pub fn toast_id(&mut self) -> ToastId {
        self.generator.toast_id(self.clock.now())
    }
}

impl fmt::Debug for IdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdSource").field("now", &self.now()).finish()
    }
}
