//! Denavit-Hartenberg link kinematics.
//!
//! A [`DhLink`] holds the four DH scalars of one link of a serial chain plus
//! its joint type and convention, and evaluates the homogeneous transform the
//! link contributes for a joint value `q`. Links are strung together into a
//! [`DhRobot`] with [`combine`].

pub mod base;
pub mod config;
pub mod joint_type;
pub mod link;
pub mod robot;

pub use base::{DynamicsFlag, LinkBase, LinkChange, LinkListener};
pub use config::{DhLinkConfig, DhRobotConfig};
pub use joint_type::{Convention, JointType};
pub use link::{link_transform, DhLink, DhParameters};
pub use robot::{combine, ChainOperand, DhRobot};

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DhErrors {
    #[error("{parameter} = {value} is not valid for {joint_type} joints")]
    InvalidParameter {
        parameter: DhParameter,
        value: f64,
        joint_type: JointType,
    },
    #[error("incompatible operand: {0}")]
    IncompatibleOperand(String),
    #[error("a robot needs at least one link")]
    EmptyChain,
    #[error("{0}")]
    Config(#[from] ron::error::SpannedError),
}

/// The joint-driven scalars of a link, used to name the offending field
/// when validation fails. `alpha` and `a` accept any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhParameter {
    D,
    Theta,
}

impl fmt::Display for DhParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhParameter::D => write!(f, "d"),
            DhParameter::Theta => write!(f, "theta"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let e = DhErrors::InvalidParameter {
            parameter: DhParameter::Theta,
            value: 0.5,
            joint_type: JointType::Revolute,
        };
        assert_eq!(e.to_string(), "theta = 0.5 is not valid for revolute joints");

        let e = DhErrors::InvalidParameter {
            parameter: DhParameter::D,
            value: -1.25,
            joint_type: JointType::Prismatic,
        };
        assert_eq!(e.to_string(), "d = -1.25 is not valid for prismatic joints");
    }
}
