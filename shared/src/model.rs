use indexmap::IndexSet;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::config::AppConfig;
use crate::epoch::{Epoch, Epochs};

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        /// Opaque server identifier. Accepts a JSON string or number.
        #[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                scalar_text(deserializer).map(Self)
            }
        }
    };
}

typed_id!(UserId);
typed_id!(AddressId);
typed_id!(EventId);

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// JSON truthiness: absent, `null`, `false`, `0` and `""` are all false.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

// --- Records ---

/// An address as the server sent it. Only `id` and the soft-delete marker
/// are interpreted; `raw` is kept untouched for display and serializes back
/// exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub id: AddressId,
    pub deleted: bool,
    pub raw: Value,
}

impl Address {
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Known {
            id: AddressId,
            #[serde(default, deserialize_with = "truthy")]
            deleted: bool,
        }

        let raw = Value::deserialize(deserializer)?;
        let Known { id, deleted } = Known::deserialize(&raw).map_err(de::Error::custom)?;
        Ok(Self { id, deleted, raw })
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "scalar_text")]
    pub created_at: String,
    pub id: EventId,
    /// Server-relative path of the full event details.
    pub url: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EventRecord {
    pub fn identifier(&self) -> EventIdentifier {
        EventIdentifier::new(self.created_at.clone(), self.id.clone())
    }
}

/// Composite key for an event: no single field is guaranteed unique.
///
/// Compared structurally, so distinct `(created_at, id)` pairs never collide
/// even when their display forms would.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventIdentifier {
    pub created_at: String,
    pub id: EventId,
}

impl EventIdentifier {
    pub fn new(created_at: impl Into<String>, id: EventId) -> Self {
        Self {
            created_at: created_at.into(),
            id,
        }
    }
}

impl fmt::Display for EventIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.created_at, self.id)
    }
}

/// Events picked for comparison, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: IndexSet<EventIdentifier>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identifier: &EventIdentifier) -> bool {
        self.entries.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventIdentifier> {
        self.entries.iter()
    }

    pub(crate) fn insert(&mut self, identifier: EventIdentifier) -> bool {
        self.entries.insert(identifier)
    }

    pub(crate) fn remove(&mut self, identifier: &EventIdentifier) -> bool {
        self.entries.shift_remove(identifier)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a EventIdentifier;
    type IntoIter = indexmap::set::Iter<'a, EventIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Full details of the two compared events, in selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub left: Value,
    pub right: Value,
}

// --- State ---

/// Everything the UI shows. Only `store::reduce` changes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub user_ids: Vec<UserId>,
    pub selected_user_id: Option<UserId>,
    pub addresses: Vec<Address>,
    pub selected_address_id: Option<AddressId>,
    pub events: Vec<EventRecord>,
    pub selected_events: SelectionSet,
    pub comparing_events: bool,
    pub comparison_json: Option<ComparisonResult>,
    pub error: Option<String>,
}

/// Detail fetches of one comparison, filled as responses come back.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingComparison {
    pub epoch: Epoch,
    slots: [Option<Value>; 2],
}

impl PendingComparison {
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            slots: [None, None],
        }
    }

    /// Store the detail for `slot`. Once both have arrived, returns them as a
    /// two-element JSON array in slot order, the shape the details resource
    /// decodes into a [`ComparisonResult`].
    pub fn fill(&mut self, slot: usize, value: Value) -> Option<Value> {
        let target = self.slots.get_mut(slot)?;
        *target = Some(value);

        if self.slots.iter().all(Option::is_some) {
            let details = std::mem::take(&mut self.slots)
                .into_iter()
                .map(|detail| detail.unwrap_or(Value::Null))
                .collect();
            return Some(Value::Array(details));
        }
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    pub ui: UiState,
    pub config: AppConfig,
    pub epochs: Epochs,
    pub user_ids_retries_remaining: u32,
    pub pending_comparison: Option<PendingComparison>,
}
