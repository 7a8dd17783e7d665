/// Feature indices of source `j` in a CSR-style connectivity layout.
pub fn getset<'a>(cnct: &'a [usize], offsets: &[usize], j: usize) -> &'a [usize] {
    let srt = offsets[j];
    let end = offsets[j + 1];
    &cnct[srt..end]
}

/// Number of features per source from CSR row offsets.
pub fn set_sizes(offsets: &[usize]) -> Vec<usize> {
    offsets.windows(2).map(|w| w[1] - w[0]).collect()
}
