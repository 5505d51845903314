//! Lenient dotted-numeric version handling
//!
//! Version strings in descriptors are inconsistently formatted: missing patch
//! numbers, `v` prefixes, non-numeric suffixes. Nothing in here fails on
//! malformed numeric parts. A token that is not a non-negative integer is
//! read as `0`, so comparison is total over every input.

use std::cmp::Ordering;
use std::fmt;

use crate::version::error::VersionError;

/// Normalized form returned for empty input
pub const ZERO_VERSION: &str = "0.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    /// Left side is strictly greater
    Newer,
    /// Left side is strictly smaller
    Older,
    Equal,
}

impl From<Ordering> for CompareResult {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => CompareResult::Newer,
            Ordering::Less => CompareResult::Older,
            Ordering::Equal => CompareResult::Equal,
        }
    }
}

/// Ordered sequence of numeric components.
///
/// Missing trailing components count as zero, so `1.2` and `1.2.0` are equal.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    components: Vec<u64>,
}

impl SemanticVersion {
    /// Split a raw version string into numeric components.
    ///
    /// A leading `v`/`V` is ignored; any component that does not parse as an
    /// integer becomes `0`.
    pub fn parse(raw: &str) -> Self {
        let stripped = strip_prefix(raw);
        let components = stripped
            .split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(0))
            .collect();
        Self { components }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Leading (major) component
    pub fn major(&self) -> u64 {
        self.components.first().copied().unwrap_or(0)
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| {
                let left = self.components.get(i).copied().unwrap_or(0);
                let right = other.components.get(i).copied().unwrap_or(0);
                left.cmp(&right)
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Trim whitespace and strip every leading `v`/`V`.
fn strip_prefix(raw: &str) -> &str {
    let mut version = raw.trim();
    while let Some(rest) = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
    {
        version = rest.trim_start();
    }
    version
}

/// Normalize a version string, failing only when nothing is left.
///
/// Strips the `v` prefix, trims whitespace and pads to at least three
/// dot-separated components:
/// - "2" -> "2.0.0"
/// - "v2.1" -> "2.1.0"
/// - "1.2.3.4" -> "1.2.3.4"
pub fn try_normalize(raw: &str) -> Result<String, VersionError> {
    let version = strip_prefix(raw);
    if version.is_empty() {
        return Err(VersionError::Empty(raw.to_string()));
    }

    let parts = version.split('.').count();
    let mut normalized = version.to_string();
    for _ in parts..3 {
        normalized.push_str(".0");
    }
    Ok(normalized)
}

/// Total form of [`try_normalize`]: empty input yields "0.0.0".
pub fn normalize(raw: &str) -> String {
    try_normalize(raw).unwrap_or_else(|_| ZERO_VERSION.to_string())
}

/// Compare `a` against `b`.
///
/// Returns `Newer` when `a` is strictly greater than `b`.
pub fn compare(a: &str, b: &str) -> CompareResult {
    SemanticVersion::parse(a)
        .cmp(&SemanticVersion::parse(b))
        .into()
}

/// Whether `candidate` is strictly newer than `current`
pub fn is_newer(candidate: &str, current: &str) -> bool {
    compare(candidate, current) == CompareResult::Newer
}

/// Major-version-only compatibility gate.
///
/// Unlike [`compare`], a non-numeric major component is treated as
/// incompatible rather than as zero.
pub fn is_major_compatible(required: &str, core: &str) -> bool {
    let leading = |raw: &str| -> Option<u64> {
        strip_prefix(raw).split('.').next()?.trim().parse().ok()
    };
    match (leading(required), leading(core)) {
        (Some(required), Some(core)) => required == core,
        _ => false,
    }
}

/// Strip rich-text decoration such as `<color=#ff0>1.2.0</color>`.
pub fn strip_markup(raw: &str) -> &str {
    if !raw.contains("<color=") {
        return raw;
    }
    match (raw.find('>'), raw.rfind('<')) {
        (Some(open), Some(close)) if open + 1 < close => &raw[open + 1..close],
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2", "2.0.0")]
    #[case("2.1", "2.1.0")]
    #[case("1.2.3", "1.2.3")]
    #[case("1.2.3.4", "1.2.3.4")]
    #[case("v1.4", "1.4.0")]
    #[case("V3", "3.0.0")]
    #[case("  v 1.0  ", "1.0.0")]
    #[case("", "0.0.0")]
    #[case("   ", "0.0.0")]
    #[case("v", "0.0.0")]
    #[case("1.x", "1.x.0")]
    fn normalize_returns_expected(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(raw), expected);
    }

    #[rstest]
    #[case("")]
    #[case("v")]
    #[case(" V ")]
    fn try_normalize_fails_on_empty_input(#[case] raw: &str) {
        assert!(matches!(try_normalize(raw), Err(VersionError::Empty(_))));
    }

    #[rstest]
    #[case("1")]
    #[case("vv1.2")]
    #[case("v v1")]
    #[case("1.")]
    #[case("garbage")]
    #[case(" 1.2.3-beta ")]
    #[case("")]
    fn normalize_is_idempotent(#[case] raw: &str) {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }

    #[rstest]
    #[case("1.2", "1.2.0", CompareResult::Equal)]
    #[case("2.0", "1.9.9", CompareResult::Newer)]
    #[case("1.2.3.1", "1.2.3", CompareResult::Newer)]
    #[case("1.2.3", "1.10.0", CompareResult::Older)]
    #[case("v1.2.0", "1.2", CompareResult::Equal)]
    #[case("abc", "0.0.0", CompareResult::Equal)]
    #[case("1.2.x", "1.2.0", CompareResult::Equal)]
    #[case("1.2.3-beta", "1.2.0", CompareResult::Equal)]
    fn compare_returns_expected(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: CompareResult,
    ) {
        assert_eq!(compare(a, b), expected);
    }

    #[rstest]
    #[case("1.0.0", "2.0.0")]
    #[case("0.9", "0.10")]
    #[case("garbage", "1")]
    #[case("1.2.3", "1.2.3")]
    fn compare_is_antisymmetric(#[case] a: &str, #[case] b: &str) {
        let forward = compare(a, b);
        let backward = compare(b, a);
        let expected = match forward {
            CompareResult::Newer => CompareResult::Older,
            CompareResult::Older => CompareResult::Newer,
            CompareResult::Equal => CompareResult::Equal,
        };
        assert_eq!(backward, expected);
        assert_eq!(compare(a, a), CompareResult::Equal);
    }

    #[test]
    fn equal_versions_are_never_newer() {
        assert!(!is_newer("1.0.0", "1.0"));
        assert!(is_newer("1.0.1", "1.0"));
    }

    #[test]
    fn semantic_version_display_keeps_components() {
        assert_eq!(SemanticVersion::parse("v1.2.x").to_string(), "1.2.0");
    }

    #[rstest]
    #[case("2.0.0", "1.4.2", false)]
    #[case("1.0.0", "1.0.0", true)]
    #[case("1.9.0", "1.0.0", true)]
    #[case("v1", "1.3", true)]
    #[case("one", "1.0.0", false)]
    #[case("", "1.0.0", false)]
    fn is_major_compatible_returns_expected(
        #[case] required: &str,
        #[case] core: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_major_compatible(required, core), expected);
    }

    #[rstest]
    #[case("<color=#ffcc00>1.2.0</color>", "1.2.0")]
    #[case("1.2.0", "1.2.0")]
    #[case("<color=red></color>", "<color=red></color>")]
    fn strip_markup_returns_expected(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(strip_markup(raw), expected);
    }
}
