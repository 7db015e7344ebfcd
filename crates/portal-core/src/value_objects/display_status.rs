//! Display status - the normalized presence the portal renders

use serde::{Deserialize, Serialize};

/// Normalized presence status shown to portal users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayStatus {
    Available,
    Away,
    Busy,
    DoNotDisturb,
    OutOfOffice,
    #[default]
    Offline,
}

impl DisplayStatus {
    /// Every status, in display order
    pub const ALL: [DisplayStatus; 6] = [
        Self::Available,
        Self::Away,
        Self::Busy,
        Self::DoNotDisturb,
        Self::OutOfOffice,
        Self::Offline,
    ];

    /// Anything but offline counts as online
    #[inline]
    #[must_use]
    pub fn is_online(&self) -> bool {
        !matches!(self, Self::Offline)
    }

    /// Wire name of the status
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Away => "away",
            Self::Busy => "busy",
            Self::DoNotDisturb => "do-not-disturb",
            Self::OutOfOffice => "out-of-office",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DisplayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| format!("Invalid display status: {s}"))
    }
}
