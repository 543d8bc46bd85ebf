//! Whole-table transforms over the store's columns.
//!
//! Every function here is a single bulk pass: it reads its inputs in full and
//! produces its output before returning, so consecutive calls behave like
//! barriers between passes. With the `parallel` feature the passes that touch
//! every row run on the rayon pool; otherwise they run in a plain loop. Both
//! paths produce identical output, including ordering.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Returns the indices of every element matching `pred`, in ascending order.
#[cfg(feature = "parallel")]
pub(crate) fn pack<V, F>(data: &[V], pred: F) -> Vec<u32>
where
    V: Sync,
    F: Fn(&V) -> bool + Sync + Send,
{
    data.par_iter()
        .enumerate()
        .filter(|(_, v)| pred(v))
        .map(|(i, _)| i as u32)
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn pack<V, F>(data: &[V], pred: F) -> Vec<u32>
where
    V: Sync,
    F: Fn(&V) -> bool + Sync + Send,
{
    data.iter()
        .enumerate()
        .filter(|(_, v)| pred(v))
        .map(|(i, _)| i as u32)
        .collect()
}

/// Builds a fresh column by evaluating `f` for every row index.
#[cfg(feature = "parallel")]
pub(crate) fn map_indexed<R, F>(len: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(usize) -> R + Sync + Send,
{
    (0..len).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_indexed<R, F>(len: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(usize) -> R + Sync + Send,
{
    (0..len).map(f).collect()
}

/// Subtracts one from every element.
#[cfg(feature = "parallel")]
pub(crate) fn decrement_all(values: &mut [i64]) {
    values.par_iter_mut().for_each(|v| *v -= 1);
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn decrement_all(values: &mut [i64]) {
    values.iter_mut().for_each(|v| *v -= 1);
}

/// Sorts `values` by the parallel `keys` column, stable on ties.
#[cfg(feature = "parallel")]
pub(crate) fn sort_by_key<K, V>(keys: &mut Vec<K>, values: &mut Vec<V>)
where
    K: Ord + Copy + Send,
    V: Copy + Send,
{
    debug_assert_eq!(keys.len(), values.len());
    let mut zipped: Vec<(K, V)> = keys.iter().copied().zip(values.iter().copied()).collect();
    zipped.par_sort_by_key(|&(k, _)| k);
    let (sorted_keys, sorted_values): (Vec<K>, Vec<V>) = zipped.into_iter().unzip();
    *keys = sorted_keys;
    *values = sorted_values;
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn sort_by_key<K, V>(keys: &mut Vec<K>, values: &mut Vec<V>)
where
    K: Ord + Copy + Send,
    V: Copy + Send,
{
    debug_assert_eq!(keys.len(), values.len());
    let mut zipped: Vec<(K, V)> = keys.iter().copied().zip(values.iter().copied()).collect();
    zipped.sort_by_key(|&(k, _)| k);
    let (sorted_keys, sorted_values): (Vec<K>, Vec<V>) = zipped.into_iter().unzip();
    *keys = sorted_keys;
    *values = sorted_values;
}

/// Marks every row that is flagged or whose composition references a flagged row.
///
/// One step of the eviction closure; callers iterate it to a fixed point.
#[cfg(feature = "parallel")]
pub(crate) fn depends_on_flagged(seqs: &[(u32, u32)], flagged: &[bool]) -> Vec<bool> {
    debug_assert_eq!(seqs.len(), flagged.len());
    seqs.par_iter()
        .zip(flagged.par_iter())
        .map(|(&(left, right), &own)| own || references_flagged(left, right, flagged))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn depends_on_flagged(seqs: &[(u32, u32)], flagged: &[bool]) -> Vec<bool> {
    debug_assert_eq!(seqs.len(), flagged.len());
    seqs.iter()
        .zip(flagged.iter())
        .map(|(&(left, right), &own)| own || references_flagged(left, right, flagged))
        .collect()
}

#[inline]
fn references_flagged(left: u32, right: u32, flagged: &[bool]) -> bool {
    // (0, 0) is the leaf marker, not a reference to row 0
    if left == 0 && right == 0 {
        return false;
    }
    flagged[left as usize] || flagged[right as usize]
}

/// Copies `source[i]` for every index, in index order.
pub(crate) fn gather<V: Copy>(indices: &[u32], source: &[V]) -> Vec<V> {
    indices.iter().map(|&i| source[i as usize]).collect()
}

/// Writes `value` at every index of `output`.
pub(crate) fn scatter_value<V: Copy>(indices: &[u32], value: V, output: &mut [V]) {
    for &i in indices {
        output[i as usize] = value;
    }
}

/// Running sum, inclusive of the current element.
pub(crate) fn inclusive_scan(data: &[usize]) -> Vec<usize> {
    data.iter()
        .scan(0usize, |acc, &x| {
            *acc += x;
            Some(*acc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_preserves_order() {
        let data = [0i64, -1, 0, -3, 0];
        assert_eq!(pack(&data, |&v| v == 0), vec![0, 2, 4]);
        assert!(pack(&data, |&v| v > 0).is_empty());
    }

    #[test]
    fn test_map_indexed() {
        let squares: Vec<usize> = map_indexed(5, |i| i * i);
        assert_eq!(squares, vec![0, 1, 4, 9, 16]);
    }

    #[test]
    fn test_decrement_all() {
        let mut values = vec![0, -1, 5];
        decrement_all(&mut values);
        assert_eq!(values, vec![-1, -2, 4]);
    }

    #[test]
    fn test_sort_by_key_is_stable() {
        let mut keys = vec![3u64, 1, 2, 1];
        let mut values = vec![10u32, 20, 30, 40];
        sort_by_key(&mut keys, &mut values);
        assert_eq!(keys, vec![1, 1, 2, 3]);
        assert_eq!(values, vec![20, 40, 30, 10]);
    }

    #[test]
    fn test_depends_on_flagged_single_step() {
        // 0 ground, 1 and 2 atoms, 3 = (1,2), 4 = (3,2)
        let seqs = vec![(0, 0), (0, 0), (0, 0), (1, 2), (3, 2)];
        let flagged = vec![false, true, false, false, false];

        let step = depends_on_flagged(&seqs, &flagged);
        assert_eq!(step, vec![false, true, false, true, false]);

        let step = depends_on_flagged(&seqs, &step);
        assert_eq!(step, vec![false, true, false, true, true]);
    }

    #[test]
    fn test_gather_and_scatter() {
        let source = [5i64, 6, 7, 8];
        assert_eq!(gather(&[3, 0, 3], &source), vec![8, 5, 8]);

        let mut output = vec![-1i64; 4];
        scatter_value(&[1, 3], 0, &mut output);
        assert_eq!(output, vec![-1, 0, -1, 0]);
    }

    #[test]
    fn test_inclusive_scan() {
        assert_eq!(inclusive_scan(&[2, 0, 1, 3]), vec![2, 2, 3, 6]);
        assert!(inclusive_scan(&[]).is_empty());
    }
}
