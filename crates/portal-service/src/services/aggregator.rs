//! Engineer status aggregator
//!
//! Joins a roster with fetched presence into a [`RosterView`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use portal_core::{EngineerStatus, Identity, IdentityId, RawPresence, RosterView};

/// Builds roster views from fetch results
pub struct EngineerStatusAggregator;

impl EngineerStatusAggregator {
    /// One entry per roster member, in roster order
    ///
    /// Members with no fetched presence are offline. Repeated members get one
    /// entry each.
    pub fn assemble(
        roster: &[Identity],
        fetched: &HashMap<IdentityId, Option<RawPresence>>,
        checked_at: DateTime<Utc>,
    ) -> RosterView {
        let entries = roster
            .iter()
            .map(|identity| {
                let presence = fetched.get(&identity.id).cloned().flatten();
                EngineerStatus::from_presence(identity.clone(), presence, checked_at)
            })
            .collect();

        RosterView::new(entries, checked_at)
    }
}
