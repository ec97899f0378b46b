use crate::{
    base::LinkBase,
    joint_type::{Convention, JointType},
    link::{DhLink, DhParameters},
    robot::DhRobot,
    DhErrors,
};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One link of a robot definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DhLinkConfig {
    pub name: Option<String>,
    pub joint_type: JointType,
    pub convention: Convention,
    pub d: f64,
    pub alpha: f64,
    pub theta: f64,
    pub a: f64,
    pub offset: f64,
    pub qlim: [f64; 2],
    pub flip: bool,
}

impl TryFrom<&DhLinkConfig> for DhLink {
    type Error = DhErrors;
    fn try_from(config: &DhLinkConfig) -> Result<Self, Self::Error> {
        let mut base = LinkBase::new(config.offset, config.qlim, config.flip);
        base.name = config.name.clone();
        DhLink::new(
            DhParameters::new(config.d, config.alpha, config.theta, config.a),
            config.joint_type,
            config.convention,
            base,
        )
    }
}

fn default_name() -> String {
    "noname".to_string()
}

fn default_gravity() -> [f64; 3] {
    [0.0, 0.0, 9.81]
}

/// A robot definition, usually read from a RON file.
///
/// ```text
/// (
///     name: "planar2",
///     links: [
///         (a: 1.0),
///         (a: 1.0, qlim: (-1.5, 1.5)),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DhRobotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],
    pub links: Vec<DhLinkConfig>,
}

impl DhRobotConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, DhErrors> {
        Ok(ron::from_str(s)?)
    }

    pub fn into_robot(self) -> Result<DhRobot, DhErrors> {
        DhRobot::try_from(self)
    }
}

impl TryFrom<DhRobotConfig> for DhRobot {
    type Error = DhErrors;
    fn try_from(config: DhRobotConfig) -> Result<Self, Self::Error> {
        let links = config
            .links
            .iter()
            .map(DhLink::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DhRobot::new(links)?
            .with_name(&config.name)
            .with_manufacturer(&config.manufacturer)
            .with_gravity(Vector3::from(config.gravity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUMA: &str = r#"
(
    name: "puma560",
    manufacturer: "Unimation",
    links: [
        (alpha: 1.5708, qlim: (-2.7925, 2.7925)),
        (a: 0.4318, qlim: (-3.9270, 0.7854)),
        (d: 0.15005, a: 0.0203, alpha: -1.5708),
        (d: 0.4318, alpha: 1.5708),
        (alpha: -1.5708),
        (name: Some("flange")),
    ],
)
"#;

    #[test]
    fn test_parse_robot() {
        let robot = DhRobotConfig::from_ron_str(PUMA)
            .unwrap()
            .into_robot()
            .unwrap();
        assert_eq!(robot.name(), "puma560");
        assert_eq!(robot.manufacturer(), "Unimation");
        assert_eq!(robot.n(), 6);
        assert_eq!(robot.structure(), "RRRRRR");
        assert_eq!(robot.gravity(), &Vector3::new(0.0, 0.0, 9.81));
        assert_eq!(robot.link(2).unwrap().a(), 0.4318);
        assert_eq!(robot.link(1).unwrap().qlim(), [-2.7925, 2.7925]);
        assert_eq!(robot.link(6).unwrap().name(), Some("flange"));
    }

    #[test]
    fn test_prismatic_and_modified() {
        let src = r#"
(
    gravity: (0.0, 0.0, -9.81),
    links: [
        (convention: Modified, a: 0.5),
        (joint_type: Prismatic, convention: Modified, theta: 0.25, flip: true, offset: 0.1),
    ],
)
"#;
        let robot = DhRobot::try_from(DhRobotConfig::from_ron_str(src).unwrap()).unwrap();
        assert_eq!(robot.name(), "noname");
        assert_eq!(robot.mdh(), 1);
        assert_eq!(robot.structure(), "RP");
        let link = robot.link(2).unwrap();
        assert!(link.flip());
        assert_eq!(link.offset(), 0.1);
        assert_eq!(link.theta(), 0.25);
    }

    #[test]
    fn test_invalid_parameter_in_file() {
        let src = "(links: [(theta: 0.5)])";
        let result = DhRobotConfig::from_ron_str(src).unwrap().into_robot();
        assert!(matches!(result, Err(DhErrors::InvalidParameter { .. })));
    }

    #[test]
    fn test_malformed_file() {
        let result = DhRobotConfig::from_ron_str("(links: [(a: )])");
        assert!(matches!(result, Err(DhErrors::Config(_))));
    }
}
