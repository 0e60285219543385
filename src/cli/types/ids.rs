//! ID types for Fantasy Premier League entities.

use crate::error::{FplError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

macro_rules! fpl_id {
    ($(#[$meta:meta])* $name:ident($inner:ty), $as_fn:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            pub fn new(id: $inner) -> Self {
                Self(id)
            }

            pub fn $as_fn(&self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = FplError;

            fn from_str(s: &str) -> Result<Self> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<$name> for Value {
            fn from(id: $name) -> Value {
                Value::from(id.0)
            }
        }
    };
}

fpl_id!(
    /// Premier League club id (`teams[].id`, 1..=20).
    TeamId(u32),
    as_u32
);

fpl_id!(
    /// Player ("element") id.
    ///
    /// ```rust
    /// use fpl_tables::PlayerId;
    ///
    /// let id: PlayerId = "233".parse().unwrap();
    /// assert_eq!(id.as_u32(), 233);
    /// ```
    PlayerId(u32),
    as_u32
);

fpl_id!(
    /// Game week ("event") id, 1..=38.
    GameWeekId(u32),
    as_u32
);

fpl_id!(
    /// FPL entry id of a manager, as shown in `/entry/{user_id}/event/{gw}` URLs.
    UserId(u64),
    as_u64
);

impl UserId {
    /// Read a user id out of a JSON value. The API is inconsistent and sends
    /// `entry` both as a number and as a string.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self),
            Value::String(s) => s.trim().parse().ok().map(Self),
            _ => None,
        }
    }
}
