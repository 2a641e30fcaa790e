//! Metric primitives shared by every analyzer.
//!
//! All helpers are pure and deterministic. Groupings are returned as
//! [`BTreeMap`]s so serialized output is stable across runs.

use std::collections::BTreeMap;

/// Bucket name for records whose grouping key is missing.
pub const UNKNOWN_KEY: &str = "unknown";

/// Grouping key for an optional value; empty and missing keys map to [`UNKNOWN_KEY`].
pub fn group_key<K: AsRef<str>>(key: Option<K>) -> String {
    match key {
        Some(k) if !k.as_ref().is_empty() => k.as_ref().to_string(),
        _ => UNKNOWN_KEY.to_string(),
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Count items per key. Missing keys land in the [`UNKNOWN_KEY`] bucket.
pub fn group_count<'a, T, K, F>(items: &'a [T], key: F) -> BTreeMap<String, i64>
where
    K: AsRef<str>,
    F: Fn(&'a T) -> Option<K>,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(group_key(key(item))).or_insert(0) += 1;
    }
    counts
}

/// Sum a value per key. Missing keys land in the [`UNKNOWN_KEY`] bucket.
pub fn group_sum<'a, T, K, F, V>(items: &'a [T], key: F, value: V) -> BTreeMap<String, f64>
where
    K: AsRef<str>,
    F: Fn(&'a T) -> Option<K>,
    V: Fn(&T) -> f64,
{
    let mut sums = BTreeMap::new();
    for item in items {
        *sums.entry(group_key(key(item))).or_insert(0.0) += finite_or_zero(value(item));
    }
    sums
}

/// Sum a value over all items; non-finite values count as 0.
pub fn sum<T, F>(items: &[T], value: F) -> f64
where
    F: Fn(&T) -> f64,
{
    items.iter().map(|item| finite_or_zero(value(item))).sum()
}

/// Mean of a value over all items; 0 for an empty slice.
pub fn average<T, F>(items: &[T], value: F) -> f64
where
    F: Fn(&T) -> f64,
{
    if items.is_empty() {
        return 0.0;
    }
    sum(items, value) / items.len() as f64
}

/// `numerator / denominator * scale`, or 0 when the denominator is 0 or not finite.
pub fn ratio(numerator: f64, denominator: f64, scale: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    finite_or_zero(numerator / denominator * scale)
}

/// [`ratio`] scaled to a percentage.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator, 100.0)
}
