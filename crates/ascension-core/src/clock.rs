//! World clock for the Ascension simulation.
//!
//! One tick is one simulated month. The tick counter is the only stored
//! temporal state; year and month are always derived from it:
//! `year = start_year + tick / 12`, `month = tick % 12 + 1`.

use std::fmt;

use ascension_agents::lifespan::MONTHS_PER_YEAR;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// The simulation's calendar.
///
/// The clock holds the tick that is about to run (or is running). It
/// starts at 0 and the driver advances it after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldClock {
    /// Current tick number (0-indexed).
    tick: u64,

    /// Calendar year of tick 0.
    start_year: u64,
}

impl WorldClock {
    /// A clock at tick 0 of `start_year`.
    pub const fn new(start_year: u64) -> Self {
        Self {
            tick: 0,
            start_year,
        }
    }

    /// A clock at an arbitrary tick (used when restoring a snapshot).
    pub const fn from_parts(tick: u64, start_year: u64) -> Self {
        Self { tick, start_year }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Calendar year of tick 0.
    pub const fn start_year(&self) -> u64 {
        self.start_year
    }

    /// Current calendar year.
    pub const fn year(&self) -> u64 {
        self.start_year
            .saturating_add(self.tick / MONTHS_PER_YEAR)
    }

    /// Current month, 1 through 12.
    pub const fn month(&self) -> u64 {
        (self.tick % MONTHS_PER_YEAR).saturating_add(1)
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new(1)
    }
}

impl fmt::Display for WorldClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Year {}, Month {}", self.year(), self.month())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_the_first_month() {
        let clock = WorldClock::new(100);
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.year(), 100);
        assert_eq!(clock.month(), 1);
    }

    #[test]
    fn twelve_ticks_make_a_year() {
        let mut clock = WorldClock::new(1);
        for _ in 0..11 {
            clock.advance().unwrap();
        }
        assert_eq!((clock.year(), clock.month()), (1, 12));
        assert_eq!(clock.advance().unwrap(), 12);
        assert_eq!((clock.year(), clock.month()), (2, 1));
        assert_eq!(clock.to_string(), "Year 2, Month 1");
    }

    #[test]
    fn advance_detects_overflow() {
        let mut clock = WorldClock::from_parts(u64::MAX, 1);
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn year_saturates_instead_of_wrapping() {
        let clock = WorldClock::from_parts(u64::MAX, u64::MAX);
        assert_eq!(clock.year(), u64::MAX);
    }
}
