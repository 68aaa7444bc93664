use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Macro keeps all ID wrappers structurally identical, so fixture and runtime IDs compare the same way.
macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Ok(Self::new(raw))
            }
        }
    };
}

define_string_id!(ChatId);
define_string_id!(MessageId);
define_string_id!(SenderId);

impl MessageId {
    /// Mints a random identifier for a message created on this device.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_message_ids_are_distinct_uuids() {
        let first = MessageId::generate();
        let second = MessageId::generate();

        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = ChatId::from("chat-1");
        let encoded = serde_json::to_string(&id).unwrap();
        assert_eq!(encoded, "\"chat-1\"");

        let decoded: ChatId = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, id);
    }
}
