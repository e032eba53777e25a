//! Balanced partitioning of a voter count across tables.

use crate::error::{Result, ServerError};

/// Split `total` units into `buckets` sizes that differ by at most one.
///
/// The first `total % buckets` buckets get the larger size, so the output is
/// non-increasing and always sums to `total`. When `buckets > total` the tail
/// is padded with zeros; callers that forbid empty tables must check that
/// themselves.
pub fn balanced_sizes(total: u32, buckets: u32) -> Result<Vec<u32>> {
    if buckets == 0 {
        return Err(ServerError::InvalidRequest(
            "There must be at least one table".to_string(),
        ));
    }

    let base = total / buckets;
    let extra = total % buckets;

    Ok((0..buckets)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remainder_goes_to_leading_tables() {
        assert_eq!(balanced_sizes(10, 3).unwrap(), vec![4, 3, 3]);
        assert_eq!(balanced_sizes(11, 3).unwrap(), vec![4, 4, 3]);
    }

    #[test]
    fn test_even_split() {
        assert_eq!(balanced_sizes(9, 3).unwrap(), vec![3, 3, 3]);
        assert_eq!(balanced_sizes(5, 1).unwrap(), vec![5]);
    }

    #[test]
    fn test_zero_buckets_rejected() {
        assert!(balanced_sizes(10, 0).is_err());
        assert!(balanced_sizes(0, 0).is_err());
    }

    #[test]
    fn test_more_buckets_than_units_pads_with_zeros() {
        assert_eq!(balanced_sizes(2, 4).unwrap(), vec![1, 1, 0, 0]);
        assert_eq!(balanced_sizes(0, 2).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_sizes_are_balanced() {
        for buckets in 1..=12u32 {
            for total in buckets..=60u32 {
                let sizes = balanced_sizes(total, buckets).unwrap();
                assert_eq!(sizes.len(), buckets as usize);
                assert_eq!(sizes.iter().sum::<u32>(), total);

                let floor = total / buckets;
                let ceil = (total + buckets - 1) / buckets;
                assert!(sizes.iter().all(|&s| s == floor || s == ceil));
                assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }
}
