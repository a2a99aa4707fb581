use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Removes every occurrence of `pattern`. Ids not containing it are returned unchanged.
    pub fn without(&self, pattern: &str) -> Self {
        if pattern.is_empty() {
            return self.clone();
        }

        Self(self.0.replace(pattern, ""))
    }

    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Entity attributes as delivered by Home Assistant. Never interpreted, only passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct Attributes(Map<String, Value>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum BinaryState {
    #[display("on")]
    On,
    #[display("off")]
    Off,
}
