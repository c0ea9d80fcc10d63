//! Per-member availability marks and derived tallies.

use serde::{Deserialize, Serialize};

/// A member's availability mark for one time block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Yes,
    Maybe,
    No,
}

impl Availability {
    /// Whether this mark counts toward `count_available`.
    pub fn is_available(self) -> bool {
        matches!(self, Availability::Yes)
    }

    /// Flip a yes/no mark: `Yes` becomes `No`, anything else becomes `Yes`.
    ///
    /// Absent and `Maybe` both flip to `Yes`, matching a quick-toggle UI
    /// where the button reads as "I'm in".
    pub fn toggled(current: Option<Availability>) -> Availability {
        match current {
            Some(Availability::Yes) => Availability::No,
            _ => Availability::Yes,
        }
    }
}

/// Aggregated response counts for one time block.
///
/// Derived by scanning member response maps; never stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityTally {
    pub yes: usize,
    pub maybe: usize,
    pub no: usize,
}

impl AvailabilityTally {
    pub fn record(&mut self, value: Availability) {
        match value {
            Availability::Yes => self.yes += 1,
            Availability::Maybe => self.maybe += 1,
            Availability::No => self.no += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.yes + self.maybe + self.no
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_yes_and_no() {
        assert_eq!(Availability::toggled(None), Availability::Yes);
        assert_eq!(
            Availability::toggled(Some(Availability::Yes)),
            Availability::No
        );
        assert_eq!(
            Availability::toggled(Some(Availability::No)),
            Availability::Yes
        );
        assert_eq!(
            Availability::toggled(Some(Availability::Maybe)),
            Availability::Yes
        );
    }

    #[test]
    fn test_only_yes_counts_as_available() {
        assert!(Availability::Yes.is_available());
        assert!(!Availability::Maybe.is_available());
        assert!(!Availability::No.is_available());
    }

    #[test]
    fn test_tally_record() {
        let mut tally = AvailabilityTally::default();
        tally.record(Availability::Yes);
        tally.record(Availability::Yes);
        tally.record(Availability::Maybe);
        tally.record(Availability::No);
        assert_eq!(tally.yes, 2);
        assert_eq!(tally.maybe, 1);
        assert_eq!(tally.no, 1);
        assert_eq!(tally.total(), 4);
    }
}
