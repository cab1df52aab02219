//! Meditation-pose rig that follows each tracked palm
//!
//! Purely cosmetic: no physics, no constraints. Each rig is the fixed pose
//! below, translated to sit a fixed distance under its palm.

use glam::Vec3;
use palm_physics::{HandSnapshot, RIG_VERTICAL_OFFSET};

pub const JOINT_COUNT: usize = 21;

#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Pelvis = 0,
    Spine,
    Chest,
    Neck,
    Head,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    LeftHand,
    RightShoulder,
    RightElbow,
    RightWrist,
    RightHand,
    LeftHip,
    LeftKnee,
    LeftAnkle,
    LeftFoot,
    RightHip,
    RightKnee,
    RightAnkle,
    RightFoot,
}

/// Seated lotus pose, relative to the pelvis (y up, z toward the viewer)
pub const MEDITATION_POSE: [Vec3; JOINT_COUNT] = [
    Vec3::new(0.0, 0.0, 0.0),    // pelvis
    Vec3::new(0.0, 0.9, 0.0),    // spine
    Vec3::new(0.0, 1.8, 0.0),    // chest
    Vec3::new(0.0, 2.5, 0.0),    // neck
    Vec3::new(0.0, 3.1, 0.1),    // head
    Vec3::new(-0.8, 2.2, 0.0),   // left shoulder
    Vec3::new(-1.2, 1.3, 0.3),   // left elbow
    Vec3::new(-1.0, 0.5, 0.7),   // left wrist
    Vec3::new(-0.8, 0.3, 0.9),   // left hand, resting on the knee
    Vec3::new(0.8, 2.2, 0.0),    // right shoulder
    Vec3::new(1.2, 1.3, 0.3),    // right elbow
    Vec3::new(1.0, 0.5, 0.7),    // right wrist
    Vec3::new(0.8, 0.3, 0.9),    // right hand
    Vec3::new(-0.5, -0.1, 0.0),  // left hip
    Vec3::new(-1.4, -0.4, 0.8),  // left knee
    Vec3::new(0.3, -0.3, 1.0),   // left ankle, crossed over
    Vec3::new(0.7, -0.2, 0.9),   // left foot
    Vec3::new(0.5, -0.1, 0.0),   // right hip
    Vec3::new(1.4, -0.4, 0.8),   // right knee
    Vec3::new(-0.3, -0.35, 1.0), // right ankle
    Vec3::new(-0.7, -0.25, 0.9), // right foot
];

/// Parent -> child connections
pub const BONES: [(Joint, Joint); 20] = [
    (Joint::Pelvis, Joint::Spine),
    (Joint::Spine, Joint::Chest),
    (Joint::Chest, Joint::Neck),
    (Joint::Neck, Joint::Head),
    (Joint::Chest, Joint::LeftShoulder),
    (Joint::LeftShoulder, Joint::LeftElbow),
    (Joint::LeftElbow, Joint::LeftWrist),
    (Joint::LeftWrist, Joint::LeftHand),
    (Joint::Chest, Joint::RightShoulder),
    (Joint::RightShoulder, Joint::RightElbow),
    (Joint::RightElbow, Joint::RightWrist),
    (Joint::RightWrist, Joint::RightHand),
    (Joint::Pelvis, Joint::LeftHip),
    (Joint::LeftHip, Joint::LeftKnee),
    (Joint::LeftKnee, Joint::LeftAnkle),
    (Joint::LeftAnkle, Joint::LeftFoot),
    (Joint::Pelvis, Joint::RightHip),
    (Joint::RightHip, Joint::RightKnee),
    (Joint::RightKnee, Joint::RightAnkle),
    (Joint::RightAnkle, Joint::RightFoot),
];

/// One rig placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigPose {
    pub hand_index: u8,
    /// World position of the pelvis
    pub root: Vec3,
}

impl RigPose {
    pub fn at_palm(palm: Vec3, hand_index: u8) -> Self {
        Self {
            hand_index,
            root: palm + Vec3::Y * RIG_VERTICAL_OFFSET,
        }
    }

    pub fn joint(&self, joint: Joint) -> Vec3 {
        self.root + MEDITATION_POSE[joint as usize]
    }

    pub fn joints(&self) -> impl Iterator<Item = Vec3> + '_ {
        MEDITATION_POSE.iter().map(move |&offset| self.root + offset)
    }

    /// World-space endpoints of every bone
    pub fn bones(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        BONES
            .iter()
            .map(move |&(a, b)| (self.joint(a), self.joint(b)))
    }
}

/// The rigs currently shown, one per tracked hand
#[derive(Debug, Clone, Default)]
pub struct SkeletonOverlay {
    poses: Vec<RigPose>,
}

impl SkeletonOverlay {
    pub fn follow(&mut self, hands: &HandSnapshot) {
        self.poses.clear();
        self.poses.extend(
            hands
                .hands()
                .iter()
                .map(|hand| RigPose::at_palm(hand.palm, hand.hand_index)),
        );
    }

    pub fn poses(&self) -> &[RigPose] {
        &self.poses
    }
}
