use std::fmt;
use std::str::FromStr;

/// What a read-modify-write does when another writer got in between its read
/// and its write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Write unconditionally. The interleaved update is lost.
    #[default]
    LastWriteWins,
    /// Write with compare-and-set and fail with `Stale` on a mismatch.
    RejectStale,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::LastWriteWins => "last-write-wins",
            ConflictPolicy::RejectStale => "reject-stale",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the canonical names and the aliases `lww` and `optimistic`,
/// ignoring case and surrounding whitespace.
impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-write-wins" | "lww" => Ok(ConflictPolicy::LastWriteWins),
            "reject-stale" | "optimistic" => Ok(ConflictPolicy::RejectStale),
            other => Err(format!(
                "unknown conflict policy '{}', expected 'last-write-wins' or 'reject-stale'",
                other
            )),
        }
    }
}
