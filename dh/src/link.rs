use crate::{
    base::{LinkBase, LinkChange, LinkListener},
    joint_type::{Convention, JointType},
    robot::{combine, ChainOperand, DhRobot},
    DhErrors, DhParameter,
};
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use sim_value::SimValue;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use transforms::Transform;

/// The four Denavit-Hartenberg scalars of a link.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DhParameters {
    /// link offset
    pub d: f64,
    /// link twist
    pub alpha: f64,
    /// joint angle
    pub theta: f64,
    /// link length
    pub a: f64,
}

impl DhParameters {
    pub fn new(d: f64, alpha: f64, theta: f64, a: f64) -> Self {
        Self { d, alpha, theta, a }
    }

    /// Checks the parameters against a joint type. The driven parameter must
    /// be exactly zero, its value comes from the joint variable instead.
    pub fn validate(&self, joint_type: JointType) -> Result<(), DhErrors> {
        check_d(self.d, joint_type)?;
        check_theta(self.theta, joint_type)
    }
}

fn check_d(d: f64, joint_type: JointType) -> Result<(), DhErrors> {
    if joint_type == JointType::Prismatic && d != 0.0 {
        debug!(d, "rejected d for prismatic joint");
        return Err(DhErrors::InvalidParameter {
            parameter: DhParameter::D,
            value: d,
            joint_type,
        });
    }
    Ok(())
}

fn check_theta(theta: f64, joint_type: JointType) -> Result<(), DhErrors> {
    if joint_type == JointType::Revolute && theta != 0.0 {
        debug!(theta, "rejected theta for revolute joint");
        return Err(DhErrors::InvalidParameter {
            parameter: DhParameter::Theta,
            value: theta,
            joint_type,
        });
    }
    Ok(())
}

/// One link of a serial chain described by Denavit-Hartenberg parameters.
///
/// The joint variable `q` drives `theta` for a revolute joint and `d` for a
/// prismatic joint, so the driven field is held at zero. Every setter checks
/// this before storing anything, and reports a successful write to the
/// listener injected through the [`LinkBase`].
///
/// Links are not comparable; a chain identifies them by position through
/// [`DhLink::id`].
#[derive(Debug, Clone)]
pub struct DhLink {
    parameters: DhParameters,
    joint_type: JointType,
    convention: Convention,
    base: LinkBase,
    id: Option<usize>,
}

impl DhLink {
    pub fn new(
        parameters: DhParameters,
        joint_type: JointType,
        convention: Convention,
        base: LinkBase,
    ) -> Result<Self, DhErrors> {
        parameters.validate(joint_type)?;
        Ok(Self {
            parameters,
            joint_type,
            convention,
            base,
            id: None,
        })
    }

    fn with_kind(
        parameters: DhParameters,
        joint_type: JointType,
        convention: Convention,
    ) -> Self {
        Self {
            parameters,
            joint_type,
            convention,
            base: LinkBase::default(),
            id: None,
        }
    }

    /// Revolute link, standard DH: `Rz(q) * Tz(d) * Tx(a) * Rx(alpha)`.
    pub fn revolute_dh(d: f64, a: f64, alpha: f64) -> Self {
        Self::with_kind(
            DhParameters::new(d, alpha, 0.0, a),
            JointType::Revolute,
            Convention::Standard,
        )
    }

    /// Prismatic link, standard DH: `Rz(theta) * Tz(q) * Tx(a) * Rx(alpha)`.
    pub fn prismatic_dh(theta: f64, a: f64, alpha: f64) -> Self {
        Self::with_kind(
            DhParameters::new(0.0, alpha, theta, a),
            JointType::Prismatic,
            Convention::Standard,
        )
    }

    /// Revolute link, modified DH: `Tx(a) * Rx(alpha) * Rz(q) * Tz(d)`.
    pub fn revolute_mdh(d: f64, a: f64, alpha: f64) -> Self {
        Self::with_kind(
            DhParameters::new(d, alpha, 0.0, a),
            JointType::Revolute,
            Convention::Modified,
        )
    }

    /// Prismatic link, modified DH: `Tx(a) * Rx(alpha) * Rz(theta) * Tz(q)`.
    pub fn prismatic_mdh(theta: f64, a: f64, alpha: f64) -> Self {
        Self::with_kind(
            DhParameters::new(0.0, alpha, theta, a),
            JointType::Prismatic,
            Convention::Modified,
        )
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.base.offset = offset;
        self
    }

    pub fn with_qlim(mut self, qlim: [f64; 2]) -> Self {
        self.base.qlim = qlim;
        self
    }

    pub fn with_flip(mut self, flip: bool) -> Self {
        self.base.flip = flip;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.base.name = Some(name.to_string());
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn LinkListener>) -> Self {
        self.base.set_listener(listener);
        self
    }

    pub fn with_base(mut self, base: LinkBase) -> Self {
        self.base = base;
        self
    }

    pub fn d(&self) -> f64 {
        self.parameters.d
    }

    pub fn alpha(&self) -> f64 {
        self.parameters.alpha
    }

    pub fn theta(&self) -> f64 {
        self.parameters.theta
    }

    pub fn a(&self) -> f64 {
        self.parameters.a
    }

    pub fn parameters(&self) -> DhParameters {
        self.parameters
    }

    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// 0 if revolute, 1 if prismatic.
    pub fn sigma(&self) -> u8 {
        self.joint_type.sigma()
    }

    /// 0 if standard DH, 1 if modified DH.
    pub fn mdh(&self) -> u8 {
        self.convention.mdh()
    }

    pub fn is_revolute(&self) -> bool {
        self.joint_type == JointType::Revolute
    }

    pub fn is_prismatic(&self) -> bool {
        self.joint_type == JointType::Prismatic
    }

    pub fn base(&self) -> &LinkBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut LinkBase {
        &mut self.base
    }

    pub fn offset(&self) -> f64 {
        self.base.offset
    }

    pub fn flip(&self) -> bool {
        self.base.flip
    }

    pub fn qlim(&self) -> [f64; 2] {
        self.base.qlim
    }

    pub fn name(&self) -> Option<&str> {
        self.base.name.as_deref()
    }

    /// Position in the owning chain, starting at 1. `None` until the link
    /// joins a chain.
    pub fn id(&self) -> Option<usize> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Option<usize>) {
        self.id = id;
    }

    pub fn set_d(&mut self, d: f64) -> Result<(), DhErrors> {
        check_d(d, self.joint_type)?;
        self.parameters.d = d;
        self.base.notify(LinkChange::D);
        Ok(())
    }

    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), DhErrors> {
        self.parameters.alpha = alpha;
        self.base.notify(LinkChange::Alpha);
        Ok(())
    }

    pub fn set_theta(&mut self, theta: f64) -> Result<(), DhErrors> {
        check_theta(theta, self.joint_type)?;
        self.parameters.theta = theta;
        self.base.notify(LinkChange::Theta);
        Ok(())
    }

    pub fn set_a(&mut self, a: f64) -> Result<(), DhErrors> {
        self.parameters.a = a;
        self.base.notify(LinkChange::A);
        Ok(())
    }

    /// Changes the joint type. Rejected when the current `d` or `theta`
    /// would break the new joint type's zero rule.
    pub fn set_joint_type(&mut self, joint_type: JointType) -> Result<(), DhErrors> {
        self.parameters.validate(joint_type)?;
        self.joint_type = joint_type;
        self.base.notify(LinkChange::JointType);
        Ok(())
    }

    pub fn set_convention(&mut self, convention: Convention) -> Result<(), DhErrors> {
        self.convention = convention;
        self.base.notify(LinkChange::Convention);
        Ok(())
    }

    /// Whether `q` lies inside the advisory joint limits. Always true when no
    /// limits are set.
    pub fn is_within_limits(&self, q: f64) -> bool {
        !self.base.has_qlim() || (self.base.qlim[0] <= q && q <= self.base.qlim[1])
    }

    /// Link transform for the joint variable `q`.
    ///
    /// This is the pose of this link's frame relative to the previous link's
    /// frame. For a revolute joint `theta` is replaced by `q`, for a prismatic
    /// joint `d` is replaced by `q`. The offset is added to `q` first, after
    /// negating `q` if the joint is flipped.
    ///
    /// `q` is not checked against the joint limits, and non-finite values
    /// propagate into the result.
    pub fn transform<T>(&self, q: T) -> Transform<T>
    where
        T: SimValue,
    {
        let offset = T::from_f64(self.base.offset);
        let q = if self.base.flip { -q + offset } else { q + offset };

        let (sa, ca) = T::from_f64(self.parameters.alpha).sin_cos();
        let a = T::from_f64(self.parameters.a);

        let (st, ct, d) = match self.joint_type {
            JointType::Revolute => {
                let (st, ct) = q.sin_cos();
                (st, ct, T::from_f64(self.parameters.d))
            }
            JointType::Prismatic => {
                let (st, ct) = T::from_f64(self.parameters.theta).sin_cos();
                (st, ct, q)
            }
        };

        let (o, l) = (T::zero(), T::one());
        #[rustfmt::skip]
        let m = match self.convention {
            Convention::Standard => Matrix4::new(
                ct, -st * ca,  st * sa, a * ct,
                st,  ct * ca, -ct * sa, a * st,
                o,   sa,       ca,      d,
                o,   o,        o,       l,
            ),
            Convention::Modified => Matrix4::new(
                ct,      -st,      o,   a,
                st * ca,  ct * ca, -sa, -sa * d,
                st * sa,  ct * sa,  ca,  ca * d,
                o,        o,        o,   l,
            ),
        };

        // orthonormal by construction for real inputs
        Transform::from_matrix_unchecked(m)
    }

    /// Builds a new robot with this link first, followed by `other`.
    pub fn combine(&self, other: impl Into<ChainOperand>) -> Result<DhRobot, DhErrors> {
        combine(self, other)
    }
}

/// Free-function form of [`DhLink::transform`].
pub fn link_transform<T>(link: &DhLink, q: T) -> Transform<T>
where
    T: SimValue,
{
    link.transform(q)
}

// fixed two decimals with a space in place of a plus sign
fn fmt_signed(value: f64) -> String {
    if value.is_sign_negative() {
        format!("{:.2}", value)
    } else {
        format!(" {:.2}", value)
    }
}

impl fmt::Display for DhLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = match self.id {
            Some(id) => format!("q{}", id),
            None => "q".to_string(),
        };
        match self.joint_type {
            JointType::Revolute => write!(
                f,
                "Revolute   theta={} +{},  d={},  a={},  alpha={}",
                q,
                fmt_signed(self.base.offset),
                fmt_signed(self.parameters.d),
                fmt_signed(self.parameters.a),
                fmt_signed(self.parameters.alpha),
            ),
            JointType::Prismatic => write!(
                f,
                "Prismatic  theta={},  d={} +{},  a={},  alpha={}",
                fmt_signed(self.parameters.theta),
                q,
                fmt_signed(self.base.offset),
                fmt_signed(self.parameters.a),
                fmt_signed(self.parameters.alpha),
            ),
        }
    }
}
