use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShareError;

/// Number of downloads a share link allows, in `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MaxDownloads(u8);

impl MaxDownloads {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for MaxDownloads {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for MaxDownloads {
    type Error = ShareError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            ShareError::InvalidInput(format!(
                "Max downloads must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            ))
        })
    }
}

/// Link lifetime offered by the upload form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ExpiryHours {
    One,
    Six,
    #[default]
    TwentyFour,
    SeventyTwo,
}

impl ExpiryHours {
    pub const ALL: [ExpiryHours; 4] = [
        ExpiryHours::One,
        ExpiryHours::Six,
        ExpiryHours::TwentyFour,
        ExpiryHours::SeventyTwo,
    ];

    pub fn hours(self) -> u32 {
        match self {
            ExpiryHours::One => 1,
            ExpiryHours::Six => 6,
            ExpiryHours::TwentyFour => 24,
            ExpiryHours::SeventyTwo => 72,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpiryHours::One => "1 hour",
            ExpiryHours::Six => "6 hours",
            ExpiryHours::TwentyFour => "24 hours",
            ExpiryHours::SeventyTwo => "72 hours",
        }
    }
}

impl TryFrom<u32> for ExpiryHours {
    type Error = ShareError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|option| option.hours() == value)
            .ok_or_else(|| {
                ShareError::InvalidInput(format!(
                    "Expiry must be one of 1, 6, 24 or 72 hours, got {}",
                    value
                ))
            })
    }
}

impl From<ExpiryHours> for u32 {
    fn from(value: ExpiryHours) -> Self {
        value.hours()
    }
}

impl FromStr for ExpiryHours {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hours = s
            .trim()
            .trim_end_matches('h')
            .parse::<u32>()
            .map_err(|_| ShareError::InvalidInput(format!("Invalid expiry: {}", s)))?;
        Self::try_from(hours)
    }
}

impl Display for ExpiryHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}
