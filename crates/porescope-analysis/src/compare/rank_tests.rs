//! Rank-based tests: Kruskal–Wallis H and Mann–Whitney U.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::distributions::{chi_squared_sf, normal_two_sided_p};

/// Kruskal–Wallis H test result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KruskalWallisResult {
    /// Tie-corrected H statistic.
    pub h: f64,
    /// Degrees of freedom (groups - 1).
    pub df: usize,
    pub p_value: f64,
    /// Total number of observations ranked.
    pub n: usize,
}

impl KruskalWallisResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Mann–Whitney U test result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyResult {
    /// U statistic of the first sample.
    pub u: f64,
    /// Continuity-corrected normal deviate.
    pub z: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

impl MannWhitneyResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Ranks of `values` (1-based), ties sharing their average rank.
///
/// Also returns `Σ (t³ - t)` over tie groups of size `t`.
pub(crate) fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &k in &order[i..j] {
            ranks[k] = avg_rank;
        }
        let t = (j - i) as f64;
        tie_term += t * t * t - t;
        i = j;
    }
    (ranks, tie_term)
}

fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Kruskal–Wallis H test across `groups`.
///
/// Non-finite values are dropped and groups left empty are excluded. Returns
/// `None` when fewer than two non-empty groups remain. If every observation
/// is tied, H is 0 and the p-value 1.
#[must_use]
pub fn kruskal_wallis(groups: &[&[f64]]) -> Option<KruskalWallisResult> {
    let groups: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| finite(g))
        .filter(|g| !g.is_empty())
        .collect();
    if groups.len() < 2 {
        return None;
    }

    let pooled: Vec<f64> = groups.iter().flatten().copied().collect();
    let n = pooled.len();
    let nf = n as f64;
    let (ranks, tie_term) = average_ranks(&pooled);

    let mut offset = 0;
    let mut weighted = 0.0;
    for group in &groups {
        let rank_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
        weighted += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }
    let raw_h = 12.0 / (nf * (nf + 1.0)) * weighted - 3.0 * (nf + 1.0);
    let correction = 1.0 - tie_term / (nf * nf * nf - nf);

    let df = groups.len() - 1;
    let h = if correction > 0.0 {
        (raw_h / correction).max(0.0)
    } else {
        0.0
    };
    Some(KruskalWallisResult {
        h,
        df,
        p_value: chi_squared_sf(h, df),
        n,
    })
}

/// Two-sided Mann–Whitney U test of `a` against `b`.
///
/// Uses the normal approximation with tie and continuity corrections.
/// Non-finite values are dropped; returns `None` if either side is then empty.
#[must_use]
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Option<MannWhitneyResult> {
    let a = finite(a);
    let b = finite(b);
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let nf = n1 + n2;
    let pooled: Vec<f64> = a.iter().chain(&b).copied().collect();
    let (ranks, tie_term) = average_ranks(&pooled);

    let r1: f64 = ranks[..a.len()].iter().sum();
    let u1 = r1 - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let mean = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)));

    let (z, p_value) = if variance > 0.0 {
        let z = ((u1.max(u2) - mean - 0.5) / variance.sqrt()).max(0.0);
        (z, normal_two_sided_p(z))
    } else {
        (0.0, 1.0)
    };
    Some(MannWhitneyResult { u: u1, z, p_value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_ranks_with_ties() {
        let (ranks, tie_term) = average_ranks(&[3.0, 1.0, 3.0, 2.0, 3.0]);
        assert_eq!(ranks, vec![4.0, 1.0, 4.0, 2.0, 4.0]);
        // One tie group of size 3.
        assert!((tie_term - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kruskal_wallis_interleaved_groups() {
        let a = [1.0, 4.0, 7.0, 10.0, 13.0];
        let b = [2.0, 5.0, 8.0, 11.0, 14.0];
        let c = [3.0, 6.0, 9.0, 12.0, 15.0];
        let result = kruskal_wallis(&[&a, &b, &c]).unwrap();
        // Rank sums 35, 40, 45 over N = 15.
        assert!((result.h - 0.5).abs() < 1e-12);
        assert_eq!(result.df, 2);
        assert_eq!(result.n, 15);
        assert!((result.p_value - (-0.25f64).exp()).abs() < 1e-9);
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn test_kruskal_wallis_separated_groups() {
        let a = [0.01, 0.02, 0.015, 0.012, 0.018];
        let b = [0.11, 0.12, 0.115, 0.112, 0.118];
        let c = [0.31, 0.32, 0.315, 0.312, 0.318];
        let result = kruskal_wallis(&[&a, &b, &c]).unwrap();
        assert!((result.h - 12.5).abs() < 1e-9);
        assert!(result.p_value < 0.01);
        assert!(result.is_significant(0.01));
    }

    #[test]
    fn test_kruskal_wallis_needs_two_groups() {
        let a = [1.0, 2.0];
        let empty: [f64; 0] = [];
        let nan = [f64::NAN];
        assert!(kruskal_wallis(&[&a]).is_none());
        assert!(kruskal_wallis(&[&a, &empty, &nan]).is_none());
        assert!(kruskal_wallis(&[]).is_none());
    }

    #[test]
    fn test_kruskal_wallis_all_tied() {
        let a = [0.0, 0.0, 0.0];
        let b = [0.0, 0.0];
        let result = kruskal_wallis(&[&a, &b]).unwrap();
        assert!(result.h.abs() < f64::EPSILON);
        assert!((result.p_value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kruskal_wallis_tie_correction_raises_h() {
        let a = [0.0, 0.0, 0.0, 0.1];
        let b = [0.0, 0.2, 0.3, 0.4];
        let result = kruskal_wallis(&[&a, &b]).unwrap();
        // Ranks: zeros share 2.5; a = 2.5 * 3 + 5, b = 2.5 + 6 + 7 + 8.
        let raw = 12.0 / 72.0 * (12.5f64.powi(2) / 4.0 + 23.5f64.powi(2) / 4.0) - 27.0;
        let correction = 1.0 - 60.0 / 504.0;
        assert!((result.h - raw / correction).abs() < 1e-12);
        assert!(result.h > raw);
    }

    #[test]
    fn test_mann_whitney_separated_samples() {
        let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert!(result.u.abs() < f64::EPSILON);
        // Asymptotic two-sided p with continuity correction.
        assert!((result.p_value - 0.080_856).abs() < 1e-4);
    }

    #[test]
    fn test_mann_whitney_is_symmetric() {
        let a = [0.1, 0.4, 0.4, 0.9, 1.3];
        let b = [0.2, 0.4, 0.8, 1.1];
        let ab = mann_whitney_u(&a, &b).unwrap();
        let ba = mann_whitney_u(&b, &a).unwrap();
        assert!((ab.p_value - ba.p_value).abs() < 1e-12);
        assert!((ab.u + ba.u - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_mann_whitney_degenerate_inputs() {
        assert!(mann_whitney_u(&[], &[1.0]).is_none());
        assert!(mann_whitney_u(&[f64::NAN], &[1.0]).is_none());
        let tied = mann_whitney_u(&[0.0, 0.0], &[0.0, 0.0, 0.0]).unwrap();
        assert!((tied.p_value - 1.0).abs() < f64::EPSILON);
        assert!(!tied.is_significant(0.05));
    }
}
