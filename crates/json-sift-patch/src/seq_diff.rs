//! Generic sequence differencing.
//!
//! Produces the minimal set of non-overlapping mismatch spans between two
//! ordered sequences: items outside all spans are pairwise equal in order.
//! Built on a longest-common-subsequence dynamic program.

/// One mismatch span: `first_len` items of the first sequence starting at
/// `first_start` correspond to `second_len` items of the second sequence
/// starting at `second_start`. Either length may be zero (pure insertion or
/// pure removal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRange {
    pub first_start: usize,
    pub first_len: usize,
    pub second_start: usize,
    pub second_len: usize,
}

/// Computes the mismatch spans between `first` and `second` under `eq`.
///
/// Spans are returned in ascending order and never touch: an equal item
/// always separates two spans.
pub fn diff_ranges<T, F>(first: &[T], second: &[T], eq: F) -> Vec<DiffRange>
where
    F: Fn(&T, &T) -> bool,
{
    // trim the common prefix and suffix so the quadratic table only covers
    // the changed middle
    let max_trim = first.len().min(second.len());
    let mut prefix = 0;
    while prefix < max_trim && eq(&first[prefix], &second[prefix]) {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < max_trim - prefix
        && eq(&first[first.len() - 1 - suffix], &second[second.len() - 1 - suffix])
    {
        suffix += 1;
    }
    let first = &first[prefix..first.len() - suffix];
    let second = &second[prefix..second.len() - suffix];

    let n = first.len();
    let m = second.len();

    if n == 0 && m == 0 {
        return Vec::new();
    }
    if n == 0 || m == 0 {
        return vec![DiffRange {
            first_start: prefix,
            first_len: n,
            second_start: prefix,
            second_len: m,
        }];
    }

    // dp[i][j] = LCS length of first[i..] and second[j..]
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if eq(&first[i], &second[j]) {
                1 + dp[i + 1][j + 1]
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut ranges = Vec::new();
    let mut span: Option<(usize, usize)> = None;
    let (mut i, mut j) = (0usize, 0usize);

    let mut close = |span: &mut Option<(usize, usize)>, i: usize, j: usize| {
        if let Some((first_start, second_start)) = span.take() {
            ranges.push(DiffRange {
                first_start: prefix + first_start,
                first_len: i - first_start,
                second_start: prefix + second_start,
                second_len: j - second_start,
            });
        }
    };

    while i < n && j < m {
        if eq(&first[i], &second[j]) {
            close(&mut span, i, j);
            i += 1;
            j += 1;
        } else {
            span.get_or_insert((i, j));
            if dp[i + 1][j] >= dp[i][j + 1] {
                i += 1;
            } else {
                j += 1;
            }
        }
    }
    if i < n || j < m {
        span.get_or_insert((i, j));
        i = n;
        j = m;
    }
    close(&mut span, i, j);

    ranges
}
