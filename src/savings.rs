//! The rules for turning a salary and expenses into a savings rate and status.

use serde::{Deserialize, Serialize};

/// Savings rates above this percentage are [SavingsStatus::Rich].
pub const RICH_SAVINGS_RATE: f64 = 40.0;
/// Savings rates below this percentage are [SavingsStatus::Poor].
pub const POOR_SAVINGS_RATE: f64 = 15.0;

/// How healthy a month's savings rate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavingsStatus {
    Rich,
    Neutral,
    Poor,
}

impl SavingsStatus {
    /// Classify a savings rate given as a percentage.
    ///
    /// Both thresholds are [SavingsStatus::Neutral].
    pub fn classify(savings_rate: f64) -> Self {
        if savings_rate > RICH_SAVINGS_RATE {
            SavingsStatus::Rich
        } else if savings_rate >= POOR_SAVINGS_RATE {
            SavingsStatus::Neutral
        } else {
            SavingsStatus::Poor
        }
    }
}

/// What is left of a salary after expenses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Savings {
    /// Salary minus expenses.
    pub remaining: f64,
    /// `remaining` as a percentage of salary, unrounded.
    pub rate: f64,
    pub status: SavingsStatus,
}

impl Savings {
    /// Compute the savings for a month.
    ///
    /// The rate is zero when `salary` is not positive.
    pub fn new(salary: f64, expenses: f64) -> Self {
        let remaining = salary - expenses;
        let rate = if salary > 0.0 {
            remaining * 100.0 / salary
        } else {
            0.0
        };

        Self {
            remaining,
            rate,
            status: SavingsStatus::classify(rate),
        }
    }

    /// The savings rate rounded to two decimal places for display.
    pub fn rounded_rate(&self) -> f64 {
        round_to_two_decimals(self.rate)
    }
}

fn round_to_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
