//! Benjamini-Hochberg false discovery rate correction.
//!
//! The matrix engine treats every row as an independent family of tests and
//! adjusts rows in parallel; the slice variant runs the same kernel on a single
//! family.

use anyhow::Result;
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewD, ArrayViewMut1, Ix2, Zip};
use num_traits::{Float, NumCast};
use single_utilities::traits::FloatOpsTS;

use crate::error::ValidationError;
use crate::testing::utils::{scatter_by_permutation, sort_permutation};

/// Apply Benjamini-Hochberg correction to every row of a p-value matrix.
///
/// Rows are independent families of `m = ncols` tests. Each row is sorted,
/// scaled by `m / rank`, made monotone with a reverse running minimum, restored
/// to column order and clipped to `[0, 1]`. Rows are processed in parallel and
/// each worker writes only its own output row.
///
/// With `m <= 1` no correction is possible and a copy of the input is returned.
///
/// # Errors
/// Returns [`ValidationError::NonNumeric`] for NaN entries and
/// [`ValidationError::OutOfRange`] for entries outside `[0, 1]`. Validation runs
/// over the whole matrix before any row is adjusted.
///
/// # Example
/// ```
/// use ndarray::array;
/// use single_enrichment::testing::correction::correct_pvalues;
///
/// let ps = array![[0.01f64, 0.02, 0.03, 0.50]];
/// let adjusted = correct_pvalues(ps.view()).unwrap();
/// assert!((adjusted[[0, 0]] - 0.04).abs() < 1e-12);
/// ```
pub fn correct_pvalues<T>(p_values: ArrayView2<T>) -> Result<Array2<T>>
where
    T: FloatOpsTS,
{
    validate_matrix(&p_values)?;

    let (n_rows, m) = p_values.dim();
    if m <= 1 {
        log::debug!("correct_pvalues - {} test(s) per row, returning input", m);
        return Ok(p_values.to_owned());
    }

    log::debug!("correct_pvalues - adjusting {} rows of {} tests", n_rows, m);
    let mut adjusted = Array2::<T>::zeros((n_rows, m));
    Zip::from(adjusted.rows_mut())
        .and(p_values.rows())
        .par_for_each(|out_row, row| bh_adjust_row(row, out_row));

    Ok(adjusted)
}

/// Same as [`correct_pvalues`] for an array of unknown dimensionality.
///
/// # Errors
/// Returns [`ValidationError::NotTwoDimensional`] unless the input has exactly
/// two axes, then validates as [`correct_pvalues`].
pub fn correct_pvalues_dyn<T>(p_values: ArrayViewD<T>) -> Result<Array2<T>>
where
    T: FloatOpsTS,
{
    let ndim = p_values.ndim();
    let matrix = p_values
        .into_dimensionality::<Ix2>()
        .map_err(|_| ValidationError::NotTwoDimensional { ndim })?;
    correct_pvalues(matrix)
}

/// Apply Benjamini-Hochberg correction to a single family of p-values.
///
/// Returns an empty vector for empty input. Shares its kernel with
/// [`correct_pvalues`].
pub fn benjamini_hochberg_correction<T>(p_values: &[T]) -> Result<Vec<T>>
where
    T: FloatOpsTS,
{
    let row = ArrayView2::from_shape((1, p_values.len()), p_values)?;
    let adjusted = correct_pvalues(row)?;
    Ok(adjusted.into_raw_vec_and_offset().0)
}

fn validate_matrix<T>(p_values: &ArrayView2<T>) -> Result<(), ValidationError>
where
    T: FloatOpsTS,
{
    for ((row, col), &p) in p_values.indexed_iter() {
        if Float::is_nan(p) {
            return Err(ValidationError::NonNumeric { row, col });
        }
        if p < T::zero() || p > T::one() {
            return Err(ValidationError::OutOfRange {
                row,
                col,
                value: p.to_f64().unwrap_or(f64::NAN),
            });
        }
    }
    Ok(())
}

fn bh_adjust_row<T>(row: ArrayView1<T>, mut out: ArrayViewMut1<T>)
where
    T: FloatOpsTS,
{
    let m = row.len();
    let values: Vec<T> = row.iter().copied().collect();

    let mut order = Vec::with_capacity(m);
    sort_permutation(&values, &mut order);

    let m_t: T = <T as NumCast>::from(m).unwrap_or_else(<T as Float>::infinity);
    let mut scaled: Vec<T> = order
        .iter()
        .enumerate()
        .map(|(i, &orig_idx)| {
            let rank = <T as NumCast>::from(i + 1).unwrap_or_else(T::one);
            values[orig_idx] * (m_t / rank)
        })
        .collect();

    // reverse running minimum, rank m down to 1
    for i in (0..m.saturating_sub(1)).rev() {
        scaled[i] = Float::min(scaled[i], scaled[i + 1]);
    }

    let mut restored = vec![T::zero(); m];
    scatter_by_permutation(&scaled, &order, &mut restored);

    for (slot, value) in out.iter_mut().zip(restored) {
        *slot = Float::max(T::zero(), Float::min(T::one(), value));
    }
}
