use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Length of a betting combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "2D")]
    D2,
    #[serde(rename = "3D")]
    D3,
    #[serde(rename = "4D")]
    D4,
    #[serde(rename = "5D")]
    D5,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [Dimension::D2, Dimension::D3, Dimension::D4, Dimension::D5];

    pub fn len(&self) -> usize {
        match self {
            Dimension::D2 => 2,
            Dimension::D3 => 3,
            Dimension::D4 => 4,
            Dimension::D5 => 5,
        }
    }

    pub fn from_len(k: usize) -> Option<Dimension> {
        match k {
            2 => Some(Dimension::D2),
            3 => Some(Dimension::D3),
            4 => Some(Dimension::D4),
            5 => Some(Dimension::D5),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        self.len() - 2
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.len())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix('D')
            .or_else(|| trimmed.strip_suffix('d'))
            .unwrap_or(trimmed);
        digits
            .parse::<usize>()
            .ok()
            .and_then(Dimension::from_len)
            .ok_or_else(|| format!("unknown dimension '{}' (expected 2D..5D)", s))
    }
}
