// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message and command identifier newtypes.

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `Display`, `From<String>`, `From<&str>`,
/// `PartialEq<str>`, `PartialEq<&str>`, and `Borrow<str>` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

crate::define_id! {
    /// Primary key of a delivered message. Dotted form
    /// `<service>.<namespace>.<command-id>.<instance-id>`; the command id
    /// is embedded at the third segment.
    #[derive(Default)]
    pub struct MessageId;
}

crate::define_id! {
    /// Identifier of the command a message carries.
    #[derive(Default)]
    pub struct CommandId;
}

impl CommandId {
    /// Extract the command id embedded in a dotted message id.
    ///
    /// Returns `None` when the message id has fewer than three segments.
    pub fn from_message_id(message_id: &MessageId) -> Option<Self> {
        message_id
            .as_str()
            .split('.')
            .nth(2)
            .filter(|s| !s.is_empty())
            .map(Self::new)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
