use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects which DH scalar is driven by the joint variable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointType {
    /// `theta` is driven by `q`, `d` is fixed.
    #[default]
    Revolute,
    /// `d` is driven by `q`, `theta` is fixed.
    Prismatic,
}

impl JointType {
    /// Integer encoding, 0 for revolute and 1 for prismatic.
    pub fn sigma(&self) -> u8 {
        match self {
            JointType::Revolute => 0,
            JointType::Prismatic => 1,
        }
    }

    /// Single letter used in a robot's structure string.
    pub fn letter(&self) -> char {
        match self {
            JointType::Revolute => 'R',
            JointType::Prismatic => 'P',
        }
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JointType::Revolute => write!(f, "revolute"),
            JointType::Prismatic => write!(f, "prismatic"),
        }
    }
}

/// Kinematic convention.
///
/// Standard DH follows Siciliano, Spong and Paul; modified DH follows Craig.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Convention {
    #[default]
    Standard,
    Modified,
}

impl Convention {
    /// Integer encoding, 0 for standard and 1 for modified.
    pub fn mdh(&self) -> u8 {
        match self {
            Convention::Standard => 0,
            Convention::Modified => 1,
        }
    }
}

impl From<bool> for Convention {
    fn from(mdh: bool) -> Self {
        if mdh {
            Convention::Modified
        } else {
            Convention::Standard
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Standard => write!(f, "stdDH"),
            Convention::Modified => write!(f, "modDH"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodings() {
        assert_eq!(JointType::Revolute.sigma(), 0);
        assert_eq!(JointType::Prismatic.sigma(), 1);
        assert_eq!(Convention::Standard.mdh(), 0);
        assert_eq!(Convention::Modified.mdh(), 1);
        assert_eq!(Convention::from(true), Convention::Modified);
        assert_eq!(Convention::from(false), Convention::Standard);
    }
}
