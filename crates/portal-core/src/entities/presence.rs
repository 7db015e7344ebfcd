//! Raw presence - unnormalized signal reported by the presence provider
//!
//! Wire values use the provider's PascalCase names. Parsing ignores case and
//! `-`, `_` or space separators, so `DoNotDisturb`, `do-not-disturb` and
//! `DO_NOT_DISTURB` are the same value. Unrecognised values are kept verbatim
//! as `Unknown` rather than rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value_objects::IdentityId;

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Base availability of a person
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    AvailableIdle,
    Away,
    BeRightBack,
    Busy,
    BusyIdle,
    DoNotDisturb,
    Offline,
    PresenceUnknown,
    Unknown(String),
}

impl Availability {
    /// Parse a provider value, never failing
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "available" => Self::Available,
            "availableidle" => Self::AvailableIdle,
            "away" => Self::Away,
            "berightback" => Self::BeRightBack,
            "busy" => Self::Busy,
            "busyidle" => Self::BusyIdle,
            "donotdisturb" => Self::DoNotDisturb,
            "offline" => Self::Offline,
            "presenceunknown" => Self::PresenceUnknown,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    /// Provider wire name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "Available",
            Self::AvailableIdle => "AvailableIdle",
            Self::Away => "Away",
            Self::BeRightBack => "BeRightBack",
            Self::Busy => "Busy",
            Self::BusyIdle => "BusyIdle",
            Self::DoNotDisturb => "DoNotDisturb",
            Self::Offline => "Offline",
            Self::PresenceUnknown => "PresenceUnknown",
            Self::Unknown(raw) => raw,
        }
    }
}

/// What a person is currently doing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Activity {
    Available,
    Away,
    BeRightBack,
    Busy,
    DoNotDisturb,
    InACall,
    InAConferenceCall,
    Inactive,
    InAMeeting,
    Offline,
    OffWork,
    OutOfOffice,
    PresenceUnknown,
    Presenting,
    UrgentInterruptionsOnly,
    Unknown(String),
}

impl Activity {
    /// Parse a provider value, never failing
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "available" => Self::Available,
            "away" => Self::Away,
            "berightback" => Self::BeRightBack,
            "busy" => Self::Busy,
            "donotdisturb" => Self::DoNotDisturb,
            "inacall" | "incall" => Self::InACall,
            "inaconferencecall" | "inconferencecall" => Self::InAConferenceCall,
            "inactive" => Self::Inactive,
            "inameeting" | "inmeeting" => Self::InAMeeting,
            "offline" => Self::Offline,
            "offwork" => Self::OffWork,
            "outofoffice" => Self::OutOfOffice,
            "presenceunknown" => Self::PresenceUnknown,
            "presenting" => Self::Presenting,
            "urgentinterruptionsonly" => Self::UrgentInterruptionsOnly,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    /// Provider wire name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "Available",
            Self::Away => "Away",
            Self::BeRightBack => "BeRightBack",
            Self::Busy => "Busy",
            Self::DoNotDisturb => "DoNotDisturb",
            Self::InACall => "InACall",
            Self::InAConferenceCall => "InAConferenceCall",
            Self::Inactive => "Inactive",
            Self::InAMeeting => "InAMeeting",
            Self::Offline => "Offline",
            Self::OffWork => "OffWork",
            Self::OutOfOffice => "OutOfOffice",
            Self::PresenceUnknown => "PresenceUnknown",
            Self::Presenting => "Presenting",
            Self::UrgentInterruptionsOnly => "UrgentInterruptionsOnly",
            Self::Unknown(raw) => raw,
        }
    }
}

macro_rules! impl_wire_string {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $ty {
            fn from(raw: &str) -> Self {
                Self::parse(raw)
            }
        }

        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

impl_wire_string!(Availability);
impl_wire_string!(Activity);

/// Presence exactly as the provider reported it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPresence {
    pub identity_id: IdentityId,
    pub availability: Availability,
    pub activity: Activity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    /// Timestamp the provider attached to the status, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl RawPresence {
    /// Create a raw presence without status message or timestamp
    pub fn new(identity_id: IdentityId, availability: Availability, activity: Activity) -> Self {
        Self {
            identity_id,
            availability,
            activity,
            status_message: None,
            published_at: None,
        }
    }

    /// Set the status message
    #[must_use]
    pub fn with_status_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }

    /// Set the provider-reported timestamp
    #[must_use]
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}
