use crate::{joint_type::Convention, link::DhLink, DhErrors};
use nalgebra::Vector3;
use std::fmt;
use tracing::debug;
use transforms::Transform;

/// An ordered serial chain of DH links.
///
/// All links share one convention. The robot numbers its links from 1 so
/// that link `j` is driven by `qj`.
#[derive(Debug, Clone)]
pub struct DhRobot {
    links: Vec<DhLink>,
    name: String,
    manufacturer: String,
    base: Transform,
    tool: Transform,
    gravity: Vector3<f64>,
}

impl DhRobot {
    pub fn new(links: Vec<DhLink>) -> Result<Self, DhErrors> {
        let mut robot = Self {
            links: Vec::new(),
            name: "noname".to_string(),
            manufacturer: String::new(),
            base: Transform::identity(),
            tool: Transform::identity(),
            gravity: Vector3::new(0.0, 0.0, 9.81),
        };
        robot.set_links(links)?;
        Ok(robot)
    }

    fn set_links(&mut self, mut links: Vec<DhLink>) -> Result<(), DhErrors> {
        let Some(first) = links.first() else {
            return Err(DhErrors::EmptyChain);
        };
        let convention = first.convention();
        if links.iter().any(|link| link.convention() != convention) {
            debug!("rejected chain with mixed conventions");
            return Err(DhErrors::IncompatibleOperand(
                "robot has mixed D&H link conventions".to_string(),
            ));
        }
        for (j, link) in links.iter_mut().enumerate() {
            link.set_id(Some(j + 1));
        }
        self.links = links;
        Ok(())
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: &str) -> Self {
        self.manufacturer = manufacturer.to_string();
        self
    }

    pub fn with_base(mut self, base: Transform) -> Self {
        self.base = base;
        self
    }

    pub fn with_tool(mut self, tool: Transform) -> Self {
        self.tool = tool;
        self
    }

    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn base(&self) -> &Transform {
        &self.base
    }

    pub fn tool(&self) -> &Transform {
        &self.tool
    }

    pub fn gravity(&self) -> &Vector3<f64> {
        &self.gravity
    }

    pub fn links(&self) -> &[DhLink] {
        &self.links
    }

    /// Link `j`, counting from 1 like the joint variables.
    pub fn link(&self, j: usize) -> Option<&DhLink> {
        j.checked_sub(1).and_then(|i| self.links.get(i))
    }

    /// Number of joints.
    pub fn n(&self) -> usize {
        self.links.len()
    }

    pub fn convention(&self) -> Convention {
        self.links[0].convention()
    }

    /// 0 if standard DH, 1 if modified DH.
    pub fn mdh(&self) -> u8 {
        self.convention().mdh()
    }

    /// Joint types as a string, e.g. "RRPRRR".
    pub fn structure(&self) -> String {
        self.links
            .iter()
            .map(|link| link.joint_type().letter())
            .collect()
    }

    pub fn qlim(&self) -> Vec<[f64; 2]> {
        self.links.iter().map(|link| link.qlim()).collect()
    }
}

impl fmt::Display for DhRobot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.manufacturer.is_empty() {
            write!(f, " (by {})", self.manufacturer)?;
        }
        writeln!(
            f,
            ": {} axis, {}, {}",
            self.n(),
            self.structure(),
            self.convention()
        )?;
        for link in &self.links {
            writeln!(f, "  {}", link)?;
        }
        Ok(())
    }
}

/// The right-hand side of [`combine`]: a single link or a whole robot.
#[derive(Debug, Clone)]
pub enum ChainOperand {
    Link(DhLink),
    Robot(DhRobot),
}

impl From<DhLink> for ChainOperand {
    fn from(link: DhLink) -> Self {
        ChainOperand::Link(link)
    }
}

impl From<&DhLink> for ChainOperand {
    fn from(link: &DhLink) -> Self {
        ChainOperand::Link(link.clone())
    }
}

impl From<DhRobot> for ChainOperand {
    fn from(robot: DhRobot) -> Self {
        ChainOperand::Robot(robot)
    }
}

impl From<&DhRobot> for ChainOperand {
    fn from(robot: &DhRobot) -> Self {
        ChainOperand::Robot(robot.clone())
    }
}

/// Builds a new robot with `link` first, followed by `other`.
///
/// A link operand yields a two link robot. A robot operand yields its links
/// prefixed by `link`, keeping the robot's name, manufacturer, base, tool
/// and gravity. Neither operand is modified. Fails with
/// [`DhErrors::IncompatibleOperand`] when the operands mix conventions.
pub fn combine(link: &DhLink, other: impl Into<ChainOperand>) -> Result<DhRobot, DhErrors> {
    match other.into() {
        ChainOperand::Link(other) => DhRobot::new(vec![link.clone(), other]),
        ChainOperand::Robot(robot) => {
            let DhRobot {
                links,
                name,
                manufacturer,
                base,
                tool,
                gravity,
            } = robot;
            let mut chain = Vec::with_capacity(links.len() + 1);
            chain.push(link.clone());
            chain.extend(links);
            debug!(n = chain.len(), %name, "prepended link to robot");
            Ok(DhRobot::new(chain)?
                .with_name(&name)
                .with_manufacturer(&manufacturer)
                .with_base(base)
                .with_tool(tool)
                .with_gravity(gravity))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn params(robot: &DhRobot) -> Vec<(f64, f64, f64, f64)> {
        robot
            .links()
            .iter()
            .map(|l| (l.d(), l.a(), l.alpha(), l.theta()))
            .collect()
    }

    #[test]
    fn test_new_assigns_ids() {
        let robot = DhRobot::new(vec![
            DhLink::revolute_dh(0.1, 0.0, PI / 2.0),
            DhLink::prismatic_dh(0.0, 0.0, 0.0),
            DhLink::revolute_dh(0.0, 0.5, 0.0),
        ])
        .unwrap();
        let ids: Vec<_> = robot.links().iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(robot.n(), 3);
        assert_eq!(robot.structure(), "RPR");
        assert_eq!(robot.mdh(), 0);
        assert_eq!(robot.link(2).unwrap().sigma(), 1);
        assert!(robot.link(0).is_none());
        assert!(robot.link(4).is_none());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(DhRobot::new(vec![]), Err(DhErrors::EmptyChain)));
    }

    #[test]
    fn test_mixed_conventions_rejected() {
        let result = DhRobot::new(vec![
            DhLink::revolute_dh(0.0, 1.0, 0.0),
            DhLink::revolute_mdh(0.0, 1.0, 0.0),
        ]);
        assert!(matches!(result, Err(DhErrors::IncompatibleOperand(_))));
    }

    #[test]
    fn test_combine_link_link() {
        let a = DhLink::revolute_dh(0.1, 1.0, 0.0);
        let b = DhLink::revolute_dh(0.2, 2.0, 0.0);
        let robot = combine(&a, &b).unwrap();
        assert_eq!(params(&robot), vec![(0.1, 1.0, 0.0, 0.0), (0.2, 2.0, 0.0, 0.0)]);
        assert_eq!(robot.name(), "noname");
        // operands untouched
        assert_eq!(a.id(), None);
        assert_eq!(b.id(), None);
    }

    #[test]
    fn test_combine_link_robot_copies_metadata() {
        let tail = DhRobot::new(vec![
            DhLink::revolute_mdh(0.0, 1.0, 0.0),
            DhLink::prismatic_mdh(0.3, 0.0, PI / 2.0),
        ])
        .unwrap()
        .with_name("arm")
        .with_manufacturer("acme")
        .with_base(Transform::from_translation(0.0, 0.0, 1.0))
        .with_tool(Transform::rotation_z(0.5))
        .with_gravity(Vector3::new(0.0, 0.0, -9.81));

        let head = DhLink::revolute_mdh(0.5, 0.0, 0.0);
        let robot = head.combine(&tail).unwrap();

        assert_eq!(robot.n(), 3);
        assert_eq!(robot.structure(), "RRP");
        assert_eq!(robot.name(), "arm");
        assert_eq!(robot.manufacturer(), "acme");
        assert_eq!(robot.base(), tail.base());
        assert_eq!(robot.tool(), tail.tool());
        assert_eq!(robot.gravity(), tail.gravity());
        assert_eq!(robot.link(1).unwrap().d(), 0.5);
        assert_eq!(robot.link(3).unwrap().id(), Some(3));
        // the original robot keeps its numbering
        assert_eq!(tail.link(1).unwrap().id(), Some(1));
        assert_eq!(tail.n(), 2);
    }

    #[test]
    fn test_combine_mixed_conventions() {
        let a = DhLink::revolute_dh(0.0, 1.0, 0.0);
        let b = DhLink::revolute_mdh(0.0, 1.0, 0.0);
        assert!(matches!(combine(&a, b), Err(DhErrors::IncompatibleOperand(_))));
    }

    #[test]
    fn test_chain_building_associates() {
        let a = DhLink::revolute_dh(0.1, 1.0, 0.0);
        let b = DhLink::prismatic_dh(0.2, 2.0, 0.0);
        let c = DhLink::revolute_dh(0.3, 3.0, PI);

        let nested = combine(&a, combine(&b, &c).unwrap()).unwrap();
        let flat = DhRobot::new(vec![a.clone(), b.clone(), c.clone()]).unwrap();
        assert_eq!(params(&nested), params(&flat));
        assert_eq!(nested.structure(), flat.structure());
    }

    #[test]
    fn test_display() {
        let robot = combine(
            &DhLink::revolute_dh(1.0, 0.0, 0.0),
            DhLink::prismatic_dh(0.0, 0.0, 0.0),
        )
        .unwrap()
        .with_name("two");
        let text = robot.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "two: 2 axis, RP, stdDH");
        assert_eq!(
            lines[1],
            "  Revolute   theta=q1 + 0.00,  d= 1.00,  a= 0.00,  alpha= 0.00"
        );
        assert!(lines[2].contains("d=q2"));
    }

    #[test]
    fn test_qlim_per_joint() {
        let robot = combine(
            &DhLink::revolute_dh(0.0, 1.0, 0.0).with_qlim([-1.0, 1.0]),
            DhLink::revolute_dh(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_eq!(robot.qlim(), vec![[-1.0, 1.0], [0.0, 0.0]]);
    }
}
