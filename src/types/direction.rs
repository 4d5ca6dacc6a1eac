use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Pass direction of a sun-synchronous orbit over the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Descending pass, ground track heading from north-east to south-west.
    #[default]
    #[serde(rename = "NE->SW")]
    NeToSw,
    /// Ascending pass, ground track heading from south-east to north-west.
    #[serde(rename = "SE->NW")]
    SeToNw,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::NeToSw => "NE->SW",
            Direction::SeToNw => "SE->NW",
        }
    }

    #[inline] pub fn is_ascending(&self) -> bool { matches!(self, Direction::SeToNw) }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace(' ', "");
        match normalized.as_str() {
            "NE->SW" | "NE-SW" | "DESCENDING" => Ok(Direction::NeToSw),
            "SE->NW" | "SE-NW" | "ASCENDING" => Ok(Direction::SeToNw),
            _ => Err(Error::InvalidParameter(format!("unknown orbit direction: {s:?}"))),
        }
    }
}
