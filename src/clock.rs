use core::cell::Cell;

use alloc::rc::Rc;

pub trait Clock {
    fn now(&mut self) -> Timestamp;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub ms_since_1970: u64,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { ms_since_1970: 0 };

    pub fn from_ms(ms_since_1970: u64) -> Self {
        Self { ms_since_1970 }
    }

    pub fn adding(&self, ms: u64) -> Self {
        Self {
            ms_since_1970: self.ms_since_1970.saturating_add(ms),
        }
    }

    pub fn removing(&self, ms: u64) -> Self {
        Self {
            ms_since_1970: self.ms_since_1970.saturating_sub(ms),
        }
    }

    pub fn difference(&self, other: &Self) -> Option<u64> {
        self.ms_since_1970.checked_sub(other.ms_since_1970)
    }

    pub fn min(&self, other: Self) -> Self {
        Timestamp {
            ms_since_1970: self.ms_since_1970.min(other.ms_since_1970),
        }
    }

    pub fn max(&self, other: Self) -> Self {
        Timestamp {
            ms_since_1970: self.ms_since_1970.max(other.ms_since_1970),
        }
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}ms", self.ms_since_1970)
    }
}

// A clock driven by the caller, as in a discrete-event simulation.
// Clones share the same time so the driver can keep a handle
//  while the strategy owns another.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start.ms_since_1970)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now.ms_since_1970);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    pub fn current(&self) -> Timestamp {
        Timestamp::from_ms(self.now.get())
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Timestamp {
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock, Timestamp};

    #[test]
    fn test_timestamp_arithmetic() {
        let t = Timestamp::from_ms(100);
        assert_eq!(t.adding(50), Timestamp::from_ms(150));
        assert_eq!(t.removing(150), Timestamp::ZERO);
        assert_eq!(Timestamp::from_ms(u64::MAX).adding(1).ms_since_1970, u64::MAX);
        assert_eq!(t.difference(&Timestamp::from_ms(40)), Some(60));
        assert_eq!(t.difference(&Timestamp::from_ms(140)), None);
    }

    #[test]
    fn test_manual_clock_is_shared() {
        let driver = ManualClock::new(Timestamp::from_ms(10));
        let mut owned = driver.clone();
        driver.advance(5);
        assert_eq!(owned.now(), Timestamp::from_ms(15));
        driver.set(Timestamp::from_ms(3));
        assert_eq!(owned.now(), Timestamp::from_ms(3));
    }
}
