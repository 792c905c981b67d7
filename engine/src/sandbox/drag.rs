//! Drag Session
//!
//! Pointer dragging as a temporary physical constraint. On grab, a collider-less
//! kinematic anchor body is created at the hit point and tied to the grabbed
//! body's local pivot with a point joint. Pointer moves teleport the anchor;
//! the solver pulls the body after it, so contacts with other bodies keep
//! working. The anchor is never registered and never selectable.

use glam::Vec3;
use tracing::debug;

use super::{BodyEntry, BodyId};
use crate::physics::{BodyDesc, BodyHandle, DynamicsWorld, JointHandle};

/// Everything owned by one grab gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Registered body being dragged
    pub target: BodyId,
    /// Its dynamics body
    pub body: BodyHandle,
    /// Transient anchor body
    pub anchor: BodyHandle,
    /// Point joint between `body` and `anchor`
    pub joint: JointHandle,
    /// Grab point in the body's own frame, fixed for the whole gesture
    pub local_pivot: Vec3,
}

/// State of the single-pointer drag interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress
    #[default]
    Idle,
    /// Pointer pressed on a body, not moved yet
    Armed(DragSession),
    /// Pointer moving with a body in tow
    Dragging(DragSession),
}

impl DragState {
    /// Grab `entry` at `hit_point`. Any previous gesture is ended first so at
    /// most one drag joint ever exists.
    pub fn begin(&mut self, world: &mut DynamicsWorld, entry: &BodyEntry, hit_point: Vec3) -> bool {
        self.end(world);

        let Some(local_pivot) = world.world_to_local(entry.body, hit_point) else {
            return false;
        };
        let anchor = world.add_body(&BodyDesc::kinematic(hit_point));
        let Some(joint) = world.add_point_joint(entry.body, anchor, local_pivot, Vec3::ZERO) else {
            world.remove_body(anchor);
            return false;
        };

        debug!("drag start on {} at {:?} (pivot {:?})", entry.id, hit_point, local_pivot);
        *self = DragState::Armed(DragSession {
            target: entry.id,
            body: entry.body,
            anchor,
            joint,
            local_pivot,
        });
        true
    }

    /// Move the anchor to `point`, zeroing its velocity.
    pub fn retarget(&mut self, world: &mut DynamicsWorld, point: Vec3) -> bool {
        let session = match *self {
            DragState::Idle => return false,
            DragState::Armed(session) | DragState::Dragging(session) => session,
        };
        world.set_translation(session.anchor, point);
        world.reset_motion(session.anchor);
        *self = DragState::Dragging(session);
        true
    }

    /// Tear down the joint and anchor. Safe to call repeatedly; only the first
    /// call after a grab does anything.
    pub fn end(&mut self, world: &mut DynamicsWorld) -> bool {
        let session = match std::mem::take(self) {
            DragState::Idle => return false,
            DragState::Armed(session) | DragState::Dragging(session) => session,
        };
        world.remove_joint(session.joint);
        world.remove_body(session.anchor);
        debug!("drag end on {}", session.target);
        true
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Idle => None,
            DragState::Armed(session) | DragState::Dragging(session) => Some(session),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, DragState::Idle)
    }

    /// Id of the body being dragged, if any.
    pub fn target(&self) -> Option<BodyId> {
        self.session().map(|session| session.target)
    }
}
