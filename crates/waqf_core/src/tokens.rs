//! Token types (`CauseId`, `SessionId`, `AdminId`, `RequestId`) with strict charset.
//!
//! Shape: `^[A-Za-z0-9_.:-]{1,64}$`, ASCII only. Deserialization goes through
//! `FromStr`, so a malformed token in a snapshot is rejected at parse time.

use core::fmt;
use core::str::FromStr;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const TOKEN_MAX_LEN: usize = 64;

#[inline]
pub fn is_valid_token(s: &str) -> bool {
    let len = s.len();
    if len == 0 || len > TOKEN_MAX_LEN {
        return false;
    }
    s.bytes().all(|b| matches!(b,
        b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
        b'_' | b'-' | b':' | b'.'
    ))
}

macro_rules! def_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if is_valid_token(s) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidToken) }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                if is_valid_token(&s) { Ok(Self(s)) } else { Err(CoreError::InvalidToken) }
            }
        }

        impl From<$name> for String {
            fn from(t: $name) -> String { t.0 }
        }
    };
}

def_token!(
    /// Catalog identifier of a cause.
    CauseId
);
def_token!(
    /// Donor session key; also the file stem of a stored snapshot.
    SessionId
);
def_token!(AdminId);
def_token!(RequestId);
