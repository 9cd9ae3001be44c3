//! End-of-life distribution releases.

use super::distribution::Distribution;

/// Fedora releases below this number are end-of-life.
const FEDORA_MINIMUM: u32 = 40;

/// `id.version` pairs that no longer receive packages.
const END_OF_LIFE: &[&str] = &[
    "centos.7",
    "centos.8",
    "rhel.7",
    "debian.jessie",
    "debian.stretch",
    "raspbian.jessie",
    "raspbian.stretch",
    "ubuntu.trusty",
    "ubuntu.xenial",
    "ubuntu.bionic",
    "ubuntu.cosmic",
    "ubuntu.disco",
    "ubuntu.eoan",
    "ubuntu.groovy",
    "ubuntu.hirsute",
    "ubuntu.impish",
    "ubuntu.kinetic",
    "ubuntu.lunar",
    "ubuntu.mantic",
];

/// Whether a distribution release has reached end-of-life.
pub fn is_deprecated(distribution: &Distribution) -> bool {
    if distribution.id == "fedora" {
        return distribution
            .version
            .parse::<u32>()
            .map(|release| release < FEDORA_MINIMUM)
            .unwrap_or(false);
    }
    END_OF_LIFE.contains(&distribution.to_string().as_str())
}

/// Warning text for an end-of-life release.
pub fn deprecation_notice(distribution: &Distribution) -> String {
    format!(
        "DEPRECATION WARNING\n    \
         This Linux distribution ({} {}) reached end-of-life and is no longer supported by this installer.\n    \
         No updates or security fixes will be released for this distribution, and users are recommended\n    \
         to upgrade to a currently maintained version of {}.",
        distribution.id, distribution.version, distribution.id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_entries_are_deprecated() {
        assert!(is_deprecated(&Distribution::new("centos", "7")));
        assert!(is_deprecated(&Distribution::new("rhel", "7")));
        assert!(is_deprecated(&Distribution::new("debian", "stretch")));
        assert!(is_deprecated(&Distribution::new("ubuntu", "mantic")));
    }

    #[test]
    fn supported_releases_are_not_deprecated() {
        assert!(!is_deprecated(&Distribution::new("ubuntu", "jammy")));
        assert!(!is_deprecated(&Distribution::new("debian", "bookworm")));
        assert!(!is_deprecated(&Distribution::new("centos", "9")));
        assert!(!is_deprecated(&Distribution::new("rhel", "9.3")));
    }

    #[test]
    fn fedora_below_forty_is_deprecated() {
        assert!(is_deprecated(&Distribution::new("fedora", "39")));
        assert!(!is_deprecated(&Distribution::new("fedora", "40")));
        assert!(!is_deprecated(&Distribution::new("fedora", "41")));
        // Rawhide and other non-numeric releases are left alone.
        assert!(!is_deprecated(&Distribution::new("fedora", "rawhide")));
    }

    #[test]
    fn notice_names_distribution() {
        let notice = deprecation_notice(&Distribution::new("centos", "7"));
        assert!(notice.starts_with("DEPRECATION WARNING"));
        assert!(notice.contains("(centos 7)"));
        assert!(notice.contains("maintained version of centos."));
    }
}
