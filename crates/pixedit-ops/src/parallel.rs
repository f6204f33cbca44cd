//! Row and pixel iteration, parallel when the `parallel` feature is on.
//!
//! Every helper hands each chunk to exactly one closure call, so output
//! samples are written once and the per-chunk arithmetic is the same with
//! or without rayon. Results are bit-identical across both builds.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(row_index, row)` for every `row_len`-sized row of `dst`.
///
/// `row_len` must be non-zero.
pub(crate) fn for_each_row<T, F>(dst: &mut [T], row_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    debug_assert!(row_len > 0);

    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Applies `f` to every `channels`-sized pixel of `data` in place.
pub(crate) fn map_pixels<F>(data: &mut [u8], channels: usize, f: F)
where
    F: Fn(&mut [u8]) + Send + Sync,
{
    if channels == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    data.par_chunks_exact_mut(channels).for_each(f);

    #[cfg(not(feature = "parallel"))]
    data.chunks_exact_mut(channels).for_each(f);
}

/// Applies `f` to every sample of `data` in place.
pub(crate) fn map_samples<F>(data: &mut [u8], f: F)
where
    F: Fn(u8) -> u8 + Send + Sync,
{
    #[cfg(feature = "parallel")]
    data.par_iter_mut().for_each(|v| *v = f(*v));

    #[cfg(not(feature = "parallel"))]
    data.iter_mut().for_each(|v| *v = f(*v));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_each_row_indices() {
        let mut dst = vec![0usize; 4 * 3];
        for_each_row(&mut dst, 4, |y, row| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = y * 10 + x;
            }
        });
        assert_eq!(&dst[..4], &[0, 1, 2, 3]);
        assert_eq!(&dst[8..], &[20, 21, 22, 23]);
    }

    #[test]
    fn test_map_pixels() {
        let mut data = vec![1, 2, 3, 4, 5, 6];
        map_pixels(&mut data, 3, |px| px.reverse());
        assert_eq!(data, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_map_samples() {
        let mut data = vec![0, 100, 250];
        map_samples(&mut data, |v| v.saturating_add(10));
        assert_eq!(data, vec![10, 110, 255]);
    }
}
