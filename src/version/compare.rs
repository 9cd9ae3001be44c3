//! Two-field version comparison.
//!
//! Docker Engine switched from CalVer (`YY.MM`) to SemVer (`Major.Minor`)
//! without ever making a newer release compare lower, so one comparison
//! works for both: first field, then second field. Patch levels and
//! pre-release suffixes are ignored.

use std::cmp::Ordering;

/// Whether `a` is the same as or newer than `b`.
///
/// ```
/// use dockstrap::version::version_compare;
///
/// assert!(version_compare("20.10", "18.09"));
/// assert!(version_compare("23.0", "23.0"));
/// assert!(!version_compare("19.03", "20.10"));
/// ```
pub fn version_compare(a: &str, b: &str) -> bool {
    compare(a, b) != Ordering::Less
}

/// Total order over the first two dot-separated fields.
pub fn compare(a: &str, b: &str) -> Ordering {
    let (major_a, minor_a) = fields(a);
    let (major_b, minor_b) = fields(b);
    major_a.cmp(&major_b).then(minor_a.cmp(&minor_b))
}

fn fields(version: &str) -> (u64, u64) {
    let mut parts = version.split('.');
    let major = parts.next().map(leading_number).unwrap_or(0);
    let minor = parts
        .next()
        .map(|minor| leading_number(minor.strip_prefix('0').unwrap_or(minor)))
        .unwrap_or(0);
    (major, minor)
}

/// Numeric value of the leading digits, `0` when there are none.
fn leading_number(field: &str) -> u64 {
    let digits: String = field.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_major_wins() {
        assert!(version_compare("24.0", "23.0"));
        assert!(!version_compare("23.0", "24.0"));
    }

    #[test]
    fn calver_months_compare_after_year() {
        assert!(version_compare("20.10", "18.09"));
        assert!(version_compare("18.09", "18.06"));
        assert!(!version_compare("18.06", "18.09"));
    }

    #[test]
    fn zero_padded_month_is_decimal() {
        // "08" and "09" are not octal.
        assert!(version_compare("18.09", "18.08"));
        assert_eq!(compare("18.09", "18.9"), Ordering::Equal);
    }

    #[test]
    fn equal_versions_are_gte() {
        for v in ["17.06", "18.09", "20.10", "23.0", "24.0", "27.5"] {
            assert!(version_compare(v, v), "{} >= {}", v, v);
        }
    }

    #[test]
    fn missing_minor_defaults_to_zero() {
        assert_eq!(compare("23", "23.0"), Ordering::Equal);
        assert!(!version_compare("23", "23.1"));
    }

    #[test]
    fn patch_and_prerelease_are_ignored() {
        assert_eq!(compare("20.10.24", "20.10"), Ordering::Equal);
        assert_eq!(compare("28.0.0-rc.1", "28.0"), Ordering::Equal);
        assert!(version_compare("19.03.15", "18.09"));
    }

    #[test]
    fn antisymmetric_unless_equal() {
        let versions = ["17.06", "17.12", "18.09", "19.03", "20.10", "23.0", "24.0", "28.1"];
        for a in versions {
            for b in versions {
                let ab = version_compare(a, b);
                let ba = version_compare(b, a);
                if compare(a, b) == Ordering::Equal {
                    assert!(ab && ba);
                } else {
                    assert_ne!(ab, ba, "{} vs {}", a, b);
                }
            }
        }
    }
}
