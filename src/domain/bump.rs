use crate::error::ReleaseError;
use std::fmt;

/// How significantly a version must change, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BumpLevel {
    #[default]
    None = 0,
    Patch = 1,
    Minor = 2,
    Major = 3,
}

impl TryFrom<u8> for BumpLevel {
    type Error = ReleaseError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(BumpLevel::None),
            1 => Ok(BumpLevel::Patch),
            2 => Ok(BumpLevel::Minor),
            3 => Ok(BumpLevel::Major),
            other => Err(ReleaseError::InvalidBumpLevel(other)),
        }
    }
}

impl From<BumpLevel> for u8 {
    fn from(level: BumpLevel) -> Self {
        level as u8
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpLevel::None => "none",
            BumpLevel::Patch => "patch",
            BumpLevel::Minor => "minor",
            BumpLevel::Major => "major",
        };
        write!(f, "{}", name)
    }
}
