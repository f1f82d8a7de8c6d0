//! Request generations.
//!
//! Every fetch carries the epoch of its resource at the time it was issued.
//! A newer request for the same resource advances the epoch, and results that
//! come back with an older one are dropped instead of overwriting newer state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Epoch(u64);

impl Epoch {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Epochs {
    user_ids: Epoch,
    addresses: Epoch,
    events: Epoch,
    event_details: Epoch,
}

impl Epochs {
    pub fn current(&self, resource: Resource) -> Epoch {
        match resource {
            Resource::UserIds => self.user_ids,
            Resource::Addresses => self.addresses,
            Resource::Events => self.events,
            Resource::EventDetails => self.event_details,
        }
    }

    pub fn is_current(&self, resource: Resource, epoch: Epoch) -> bool {
        self.current(resource) == epoch
    }

    /// Start a new generation for `resource` and everything loaded beneath it:
    /// new addresses invalidate events, new events invalidate details.
    pub fn advance(&mut self, resource: Resource) -> Epoch {
        match resource {
            Resource::UserIds => {
                self.user_ids = self.user_ids.next();
            }
            Resource::Addresses => {
                self.addresses = self.addresses.next();
                self.events = self.events.next();
                self.event_details = self.event_details.next();
            }
            Resource::Events => {
                self.events = self.events.next();
                self.event_details = self.event_details.next();
            }
            Resource::EventDetails => {
                self.event_details = self.event_details.next();
            }
        }
        self.current(resource)
    }
}
