//! Age and lifespan.
//!
//! Age advances one month per tick. An actor whose age in whole years
//! reaches `max_years` dies of old age. A failed breakthrough costs years
//! off `max_years`; a successful one raises it to at least the new realm's
//! baseline.

use serde::{Deserialize, Serialize};

/// Months in a simulated year.
pub const MONTHS_PER_YEAR: u64 = 12;

/// An actor's age and life expectancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifespan {
    /// Age in months.
    pub age_months: u64,
    /// Age in years at which the actor dies.
    pub max_years: u32,
}

impl Lifespan {
    /// A newborn with the given life expectancy.
    pub const fn new(max_years: u32) -> Self {
        Self {
            age_months: 0,
            max_years,
        }
    }

    /// Builder: start at the given age in years.
    #[must_use]
    pub fn with_age_years(mut self, years: u32) -> Self {
        self.age_months = u64::from(years).saturating_mul(MONTHS_PER_YEAR);
        self
    }

    /// Age in whole years.
    pub const fn age_years(&self) -> u64 {
        self.age_months / MONTHS_PER_YEAR
    }

    /// Whole years left before death by old age.
    pub fn remaining_years(&self) -> u64 {
        u64::from(self.max_years).saturating_sub(self.age_years())
    }

    /// Advance one month.
    pub const fn advance_month(&mut self) {
        self.age_months = self.age_months.saturating_add(1);
    }

    /// Whether the actor has reached the end of their life.
    pub fn is_expired(&self) -> bool {
        self.age_years() >= u64::from(self.max_years)
    }

    /// Lose `years` of life expectancy (floored at zero). Returns the years
    /// actually lost.
    pub const fn apply_penalty(&mut self, years: u32) -> u32 {
        let before = self.max_years;
        self.max_years = self.max_years.saturating_sub(years);
        before.saturating_sub(self.max_years)
    }

    /// Raise life expectancy to at least `baseline`; never lowers it.
    pub const fn raise_floor(&mut self, baseline: u32) {
        if self.max_years < baseline {
            self.max_years = baseline;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_at_max_years() {
        let mut life = Lifespan::new(1);
        for _ in 0..11 {
            life.advance_month();
            assert!(!life.is_expired());
        }
        life.advance_month();
        assert!(life.is_expired());
    }

    #[test]
    fn penalty_saturates() {
        let mut life = Lifespan::new(3);
        assert_eq!(life.apply_penalty(5), 3);
        assert_eq!(life.max_years, 0);
    }

    #[test]
    fn floor_only_raises() {
        let mut life = Lifespan::new(150);
        life.raise_floor(100);
        assert_eq!(life.max_years, 150);
        life.raise_floor(200);
        assert_eq!(life.max_years, 200);
    }

    #[test]
    fn starting_age() {
        let life = Lifespan::new(100).with_age_years(16);
        assert_eq!(life.age_years(), 16);
        assert_eq!(life.remaining_years(), 84);
    }
}
