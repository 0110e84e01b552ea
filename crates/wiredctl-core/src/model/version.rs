// Controller release gating.

use std::cmp::Ordering;
use std::fmt;

/// Oldest controller release that exposes the wired Layer-2 feature API.
pub const MINIMUM_CONTROLLER_VERSION: &str = "2.3.7.9";

/// A dotted numeric release such as `2.3.7.9`.
///
/// Missing trailing components compare as zero, so `2.3.7` < `2.3.7.9`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerVersion {
    parts: Vec<u32>,
    raw: String,
}

impl ControllerVersion {
    /// Parse the leading numeric components of a release string.
    ///
    /// Suffixes like `2.3.7.9-70301` or `2.3.7.9 (patch)` are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let numeric: String = trimmed
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let parts = numeric
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<u32>, _>>()
            .ok()?;
        if parts.is_empty() {
            return None;
        }
        Some(Self {
            parts,
            raw: trimmed.to_owned(),
        })
    }

    pub fn minimum() -> Self {
        Self {
            parts: vec![2, 3, 7, 9],
            raw: MINIMUM_CONTROLLER_VERSION.to_owned(),
        }
    }

    pub fn is_supported(&self) -> bool {
        *self >= Self::minimum()
    }
}

impl PartialOrd for ControllerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ControllerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for ControllerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
