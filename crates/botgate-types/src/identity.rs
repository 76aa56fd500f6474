//! Caller identity and capability names.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Opaque integer identity of an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(pub i64);

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse permission classes a caller may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "bots:read")]
    BotsRead,
    #[serde(rename = "bots:write")]
    BotsWrite,
    #[serde(rename = "bots:admin")]
    BotsAdmin,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::BotsRead,
        Capability::BotsWrite,
        Capability::BotsAdmin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::BotsRead => "bots:read",
            Capability::BotsWrite => "bots:write",
            Capability::BotsAdmin => "bots:admin",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown capability: '{s}'"))
    }
}
