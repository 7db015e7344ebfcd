//! Identity entity - a person on a roster

use serde::{Deserialize, Serialize};

use crate::value_objects::IdentityId;

/// A person whose presence can be queried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
    pub display_name: String,
}

impl Identity {
    /// Create a new Identity
    pub fn new(id: IdentityId, email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: display_name.into(),
        }
    }

    /// Identity known only by its id
    ///
    /// Used for caller-supplied ids that are not on the server roster.
    pub fn anonymous(id: IdentityId) -> Self {
        let display_name = id.to_string();
        Self {
            id,
            email: String::new(),
            display_name,
        }
    }
}
