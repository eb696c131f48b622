//! Version string comparison.

use std::cmp::Ordering;

/// Compares two dot-separated version strings segment by segment.
///
/// Segments are compared numerically; a segment that is missing or does not
/// parse as an integer counts as `0`, so `"1.2"` equals `"1.2.0"`. No prefix
/// is stripped: `"v1.2.3"` has a first segment of `0`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a: Vec<&str> = a.split('.').collect();
    let b: Vec<&str> = b.split('.').collect();
    let segment = |parts: &[&str], i: usize| -> i64 {
        parts.get(i).and_then(|s| s.parse().ok()).unwrap_or(0)
    };

    for i in 0..a.len().max(b.len()) {
        match segment(&a, i).cmp(&segment(&b, i)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Encodes `major.minor.patch` as `major * 10000 + minor * 100 + patch`.
///
/// A leading `v` is stripped. Returns `0.0` when fewer than three segments
/// are present; segments that fail to parse count as `0`.
pub fn version_to_number(version: &str) -> f64 {
    let version = version.strip_prefix('v').unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() < 3 {
        return 0.0;
    }
    let segment = |s: &str| s.parse::<f64>().unwrap_or(0.0);
    segment(parts[0]) * 10_000.0 + segment(parts[1]) * 100.0 + segment(parts[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_versions() {
        let cases = [
            ("2.2.15", "2.2.14", Ordering::Greater),
            ("1.0.0", "1.0.0", Ordering::Equal),
            ("1.2", "1.2.0", Ordering::Equal),
            ("1.10.0", "1.9.9", Ordering::Greater),
            ("0.9.0", "1.0.0", Ordering::Less),
            ("0.503.20214", "0.503.20215", Ordering::Less),
            ("2.2.16", "2.2.14", Ordering::Greater),
        ];
        for (a, b, expected) in cases {
            assert_eq!(compare_versions(a, b), expected, "compare({a}, {b})");
        }
    }

    #[test]
    fn test_non_numeric_segments_are_zero() {
        assert_eq!(compare_versions("1.x.3", "1.0.3"), Ordering::Equal);
        assert_eq!(compare_versions("", "0.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("2.2.14-beta", "2.2.0"), Ordering::Equal);
    }

    #[test]
    fn test_version_to_number() {
        assert_eq!(version_to_number("v1.2.3"), 10203.0);
        assert_eq!(version_to_number("2.2.14"), 20214.0);
        assert_eq!(version_to_number("1.18"), 0.0);
    }

    // Known discrepancy: version_to_number strips a leading "v" while
    // compare_versions does not. Kept as is; this pins the current behavior.
    #[test]
    fn test_prefix_handling_differs() {
        assert_eq!(version_to_number("v1.2.3"), version_to_number("1.2.3"));
        assert_eq!(compare_versions("v1.2.3", "1.2.3"), Ordering::Less);
        assert_eq!(compare_versions("v1.2.3", "0.2.3"), Ordering::Equal);
    }
}
