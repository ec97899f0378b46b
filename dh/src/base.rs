use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Which kinematic attribute of a link was just committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChange {
    D,
    Alpha,
    Theta,
    A,
    JointType,
    Convention,
}

/// Hook invoked after a validated setter commits a kinematic attribute.
///
/// Owners that cache quantities derived from the link (dynamics, chain
/// transforms) inject one of these to learn when the cache is stale.
pub trait LinkListener: Send + Sync {
    fn kinematics_changed(&self, change: LinkChange);
}

impl<F> LinkListener for F
where
    F: Fn(LinkChange) + Send + Sync,
{
    fn kinematics_changed(&self, change: LinkChange) {
        self(change)
    }
}

/// A listener that only records that something changed.
#[derive(Debug, Default)]
pub struct DynamicsFlag(AtomicBool);

impl DynamicsFlag {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Returns whether the flag was set and clears it.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl LinkListener for DynamicsFlag {
    fn kinematics_changed(&self, _change: LinkChange) {
        self.0.store(true, Ordering::Release);
    }
}

/// Joint attributes shared by every kind of link: the joint variable
/// adjustment applied before evaluation and the advisory joint limits.
#[derive(Clone, Default)]
pub struct LinkBase {
    pub name: Option<String>,
    /// Added to the joint variable before evaluation.
    pub offset: f64,
    /// The joint moves in the opposite direction.
    pub flip: bool,
    /// Joint variable limits `[min, max]`. `[0, 0]` means unset. Never
    /// enforced by the evaluator.
    pub qlim: [f64; 2],
    listener: Option<Arc<dyn LinkListener>>,
}

impl LinkBase {
    pub fn new(offset: f64, qlim: [f64; 2], flip: bool) -> Self {
        Self {
            offset,
            qlim,
            flip,
            ..Default::default()
        }
    }

    pub fn set_listener(&mut self, listener: Arc<dyn LinkListener>) {
        self.listener = Some(listener);
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    pub fn has_qlim(&self) -> bool {
        self.qlim != [0.0, 0.0]
    }

    pub(crate) fn notify(&self, change: LinkChange) {
        if let Some(listener) = &self.listener {
            trace!(?change, name = ?self.name, "link kinematics changed");
            listener.kinematics_changed(change);
        }
    }
}

impl fmt::Debug for LinkBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkBase")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("flip", &self.flip)
            .field("qlim", &self.qlim)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
