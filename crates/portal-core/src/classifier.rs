//! Status classifier
//!
//! Maps a provider `(availability, activity)` pair onto a [`DisplayStatus`].
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. out-of-office
//! 2. do-not-disturb
//! 3. busy
//! 4. away
//! 5. available
//! 6. offline (fallback, including unknown values)
//!
//! A person flagged do-not-disturb while in a meeting is therefore
//! do-not-disturb, not busy.

use crate::entities::{Activity, Availability, RawPresence};
use crate::value_objects::DisplayStatus;

/// Classify a raw availability/activity pair
pub fn classify(availability: &Availability, activity: &Activity) -> DisplayStatus {
    if is_out_of_office(activity) {
        DisplayStatus::OutOfOffice
    } else if is_do_not_disturb(availability, activity) {
        DisplayStatus::DoNotDisturb
    } else if is_busy(availability, activity) {
        DisplayStatus::Busy
    } else if is_away(availability, activity) {
        DisplayStatus::Away
    } else if is_available(availability, activity) {
        DisplayStatus::Available
    } else {
        DisplayStatus::Offline
    }
}

/// Classify an optional raw presence; absence is offline
pub fn classify_presence(presence: Option<&RawPresence>) -> DisplayStatus {
    presence.map_or(DisplayStatus::Offline, |p| {
        classify(&p.availability, &p.activity)
    })
}

fn is_out_of_office(activity: &Activity) -> bool {
    matches!(activity, Activity::OutOfOffice | Activity::OffWork)
}

fn is_do_not_disturb(availability: &Availability, activity: &Activity) -> bool {
    matches!(availability, Availability::DoNotDisturb)
        || matches!(
            activity,
            Activity::DoNotDisturb | Activity::UrgentInterruptionsOnly
        )
}

fn is_busy(availability: &Availability, activity: &Activity) -> bool {
    matches!(availability, Availability::Busy | Availability::BusyIdle)
        || matches!(
            activity,
            Activity::Busy
                | Activity::InACall
                | Activity::InAConferenceCall
                | Activity::InAMeeting
                | Activity::Presenting
        )
}

fn is_away(availability: &Availability, activity: &Activity) -> bool {
    matches!(availability, Availability::Away)
        || matches!(
            activity,
            Activity::BeRightBack | Activity::Away | Activity::Inactive
        )
}

fn is_available(availability: &Availability, activity: &Activity) -> bool {
    matches!(
        availability,
        Availability::Available | Availability::AvailableIdle
    ) || matches!(activity, Activity::Available)
}
