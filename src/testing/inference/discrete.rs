use crate::testing::{Alternative, TestResult};
use statrs::function::factorial::ln_binomial;

/// Relative tolerance when comparing table probabilities in the two-sided test.
const PMF_RELATIVE_TOLERANCE: f64 = 1.0 + 1e-7;

/// A 2x2 table of set membership counts.
///
/// ```text
///               in query   not in query
/// in set           a            b
/// not in set      c            d
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContingencyTable {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

impl ContingencyTable {
    pub fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        ContingencyTable { a, b, c, d }
    }

    /// Size of the universe the table was drawn from.
    pub fn total(&self) -> u64 {
        self.a + self.b + self.c + self.d
    }

    /// Members of the reference set (`a + b`).
    pub fn set_size(&self) -> u64 {
        self.a + self.b
    }

    /// Members of the query (`a + c`).
    pub fn query_size(&self) -> u64 {
        self.a + self.c
    }

    /// Support of the overlap count given the table margins.
    fn overlap_support(&self) -> (u64, u64) {
        let lo = self.a.saturating_sub(self.d);
        let hi = self.set_size().min(self.query_size());
        (lo, hi)
    }

    fn ln_pmf(&self, overlap: u64) -> f64 {
        let total = self.total();
        let set_size = self.set_size();
        let query_size = self.query_size();
        ln_binomial(set_size, overlap) + ln_binomial(total - set_size, query_size - overlap)
            - ln_binomial(total, query_size)
    }
}

/// Natural log of the odds ratio with `ha_corr` added to every cell.
///
/// The Haldane-Anscombe correction keeps the ratio finite when a cell is zero;
/// with `ha_corr == 0` an empty cell gives an infinite (or NaN) statistic.
pub fn log_odds_ratio(table: &ContingencyTable, ha_corr: f64) -> f64 {
    let a = table.a as f64 + ha_corr;
    let b = table.b as f64 + ha_corr;
    let c = table.c as f64 + ha_corr;
    let d = table.d as f64 + ha_corr;
    ((a * d) / (b * c)).ln()
}

/// Fisher's exact test on a 2x2 table.
///
/// Probabilities come from the hypergeometric distribution of the overlap `a`
/// with the table margins held fixed, summed in log space. `Greater` tests for
/// over-representation, P(X >= a). The two-sided p-value sums every table no
/// more likely than the observed one.
///
/// The returned statistic is the observed overlap `a`.
pub fn fisher_exact_test(table: &ContingencyTable, alternative: Alternative) -> TestResult<f64> {
    let (lo, hi) = table.overlap_support();
    let observed = table.a;
    let statistic = observed as f64;

    let p_value = match alternative {
        Alternative::Greater if observed <= lo => 1.0,
        Alternative::Greater => sum_pmf(table, observed..=hi),
        Alternative::Less if observed >= hi => 1.0,
        Alternative::Less => sum_pmf(table, lo..=observed),
        Alternative::TwoSided => {
            let threshold = table.ln_pmf(observed) + PMF_RELATIVE_TOLERANCE.ln();
            (lo..=hi)
                .map(|i| table.ln_pmf(i))
                .filter(|&ln_p| ln_p <= threshold)
                .map(f64::exp)
                .sum::<f64>()
        }
    };

    TestResult::new(statistic, p_value.clamp(0.0, 1.0))
}

fn sum_pmf(table: &ContingencyTable, overlaps: std::ops::RangeInclusive<u64>) -> f64 {
    overlaps.map(|i| table.ln_pmf(i).exp()).sum()
}
