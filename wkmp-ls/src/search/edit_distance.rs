//! Bounded Levenshtein distance
//!
//! The fuzzy tier evaluates up to three fields for every candidate in its
//! pool, so the evaluator must give up as soon as the bound is unreachable
//! instead of filling the whole table.
//!
//! Only cells within `max_distance` of the diagonal are computed. Any path
//! leaving that band already costs more than the bound, so treating cells
//! outside it as "infinite" does not change results within the bound.
//!
//! Comparison is exact on `char`s. Callers lowercase both inputs first.

/// Sentinel returned when the distance is greater than the bound
pub const DISTANCE_EXCEEDED: usize = usize::MAX;

/// Levenshtein distance between `a` and `b` if it is `<= max_distance`,
/// otherwise [`DISTANCE_EXCEEDED`]
///
/// # Examples
/// ```
/// use wkmp_ls::search::edit_distance::{bounded_levenshtein, DISTANCE_EXCEEDED};
///
/// assert_eq!(bounded_levenshtein("beatles", "beatels", 2), 2);
/// assert_eq!(bounded_levenshtein("beatles", "stones", 2), DISTANCE_EXCEEDED);
/// ```
pub fn bounded_levenshtein(a: &str, b: &str, max_distance: usize) -> usize {
    if a == b {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    // Every edit changes length by at most one
    if m.abs_diff(n) > max_distance {
        return DISTANCE_EXCEEDED;
    }
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Stand-in for "outside the band"; saturating keeps the adds below safe
    let out_of_band = max_distance.saturating_add(1);

    let mut prev: Vec<usize> = (0..=n)
        .map(|j| if j <= max_distance { j } else { out_of_band })
        .collect();
    let mut curr = vec![out_of_band; n + 1];

    for i in 1..=m {
        let lo = i.saturating_sub(max_distance).max(1);
        let hi = i.saturating_add(max_distance).min(n);

        curr[0] = if i <= max_distance { i } else { out_of_band };
        if lo > 1 {
            curr[lo - 1] = out_of_band;
        }

        let mut row_min = curr[0];
        for j in lo..=hi {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let value = prev[j]
                .saturating_add(1)
                .min(curr[j - 1].saturating_add(1))
                .min(prev[j - 1].saturating_add(cost))
                .min(out_of_band);
            curr[j] = value;
            row_min = row_min.min(value);
        }
        if hi < n {
            curr[hi + 1] = out_of_band;
        }

        // No later row can get cheaper than the cheapest cell of this one
        if row_min > max_distance {
            return DISTANCE_EXCEEDED;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[n];
    if distance > max_distance {
        DISTANCE_EXCEEDED
    } else {
        distance
    }
}

/// Exact Levenshtein distance (no bound)
pub fn levenshtein(a: &str, b: &str) -> usize {
    let bound = a.chars().count().max(b.chars().count());
    bounded_levenshtein(a, b, bound)
}

/// True when `a` is within `max_edits` edits of `b`
pub fn fuzzy_matches(a: &str, b: &str, max_edits: usize) -> bool {
    bounded_levenshtein(a, b, max_edits) <= max_edits
}

/// Normalized similarity in `[0.0, 1.0]`: `1 - distance / longer_length`
pub fn similarity(a: &str, b: &str) -> f64 {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longer as f64
}
