use std::fmt;

/// Found/missing counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    pub found: usize,
    pub missing: usize,
}

impl RunTally {
    pub fn record_found(&mut self) {
        self.found += 1;
    }

    pub fn record_missing(&mut self) {
        self.missing += 1;
    }

    pub fn total(&self) -> usize {
        self.found + self.missing
    }
}

impl fmt::Display for RunTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Found: {}, Missing: {}", self.found, self.missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counters_are_independent() {
        let mut tally = RunTally::default();
        tally.record_found();
        tally.record_missing();
        tally.record_missing();

        assert_eq!(tally, RunTally { found: 1, missing: 2 });
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.to_string(), "Found: 1, Missing: 2");
    }
}
