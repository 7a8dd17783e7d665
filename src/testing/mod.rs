use single_utilities::traits::FloatOps;

pub mod correction;
pub mod inference;

pub mod utils;

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    TwoSided,
    Less,
    Greater,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult<T> {
    /// The test statistic value (e.g. the observed overlap for exact tests)
    pub statistic: T,
    /// The p-value of the test
    pub p_value: T,
}

impl<T> TestResult<T>
where
    T: FloatOps,
{
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult { statistic, p_value }
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: T) -> bool {
        self.p_value < alpha
    }
}
