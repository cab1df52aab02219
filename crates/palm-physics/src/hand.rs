//! Hand descriptors delivered by the control source

use glam::Vec3;

/// MediaPipe hand landmark indices used for conversion
pub const MIDDLE_MCP: usize = 9;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Fingertips in descriptor order
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Upper bound on hands in one snapshot
pub const MAX_HANDS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

/// How normalized image landmarks map into simulation space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkMapping {
    /// Half-extent of the simulation volume covered by the image width
    pub scale_x: f32,
    pub scale_y: f32,
    pub depth_scale: f32,
    /// Selfie-view cameras need x mirrored
    pub mirror: bool,
}

impl Default for LandmarkMapping {
    fn default() -> Self {
        Self {
            scale_x: 40.0,
            scale_y: 30.0,
            depth_scale: 20.0,
            mirror: true,
        }
    }
}

impl LandmarkMapping {
    /// Map one normalized landmark (x, y in [0, 1], z relative depth)
    pub fn map(&self, landmark: Vec3) -> Vec3 {
        let x = if self.mirror {
            0.5 - landmark.x
        } else {
            landmark.x - 0.5
        };
        Vec3::new(
            x * self.scale_x,
            (0.5 - landmark.y) * self.scale_y,
            -landmark.z * self.depth_scale,
        )
    }
}

/// One tracked hand in simulation space
#[derive(Debug, Clone, PartialEq)]
pub struct HandDescriptor {
    pub palm: Vec3,
    /// Thumb..pinky; missing fingertips are dropped rather than padded
    pub fingers: Vec<Vec3>,
    /// 0 or 1. Stable while tracking holds, not across occlusion.
    pub hand_index: u8,
}

impl HandDescriptor {
    pub fn new(palm: Vec3, hand_index: u8) -> Self {
        Self {
            palm,
            fingers: Vec::new(),
            hand_index,
        }
    }

    pub fn with_fingers(mut self, fingers: impl IntoIterator<Item = Vec3>) -> Self {
        self.fingers = fingers.into_iter().take(FINGERTIPS.len()).collect();
        self
    }

    /// Build a descriptor from a MediaPipe hand.
    ///
    /// Returns `None` when the palm landmark itself is missing.
    pub fn from_landmarks(
        landmarks: &[Vec3],
        hand_index: u8,
        mapping: &LandmarkMapping,
    ) -> Option<Self> {
        let palm = mapping.map(*landmarks.get(MIDDLE_MCP)?);
        let fingers = FINGERTIPS
            .iter()
            .filter_map(|&i| landmarks.get(i))
            .map(|&l| mapping.map(l))
            .collect();

        Some(Self {
            palm,
            fingers,
            hand_index,
        })
    }

    pub fn finger(&self, finger: Finger) -> Option<Vec3> {
        self.fingers.get(finger as usize).copied()
    }
}

/// The hands seen in one admitted frame (0, 1 or 2)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandSnapshot {
    hands: Vec<HandDescriptor>,
}

impl HandSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extra hands beyond [`MAX_HANDS`] are discarded.
    pub fn new(hands: impl IntoIterator<Item = HandDescriptor>) -> Self {
        Self {
            hands: hands.into_iter().take(MAX_HANDS).collect(),
        }
    }

    pub fn hands(&self) -> &[HandDescriptor] {
        &self.hands
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn palms(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.hands.iter().map(|h| h.palm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_hand() -> Vec<Vec3> {
        (0..21)
            .map(|i| Vec3::new(i as f32 / 40.0, 0.5, 0.0))
            .collect()
    }

    #[test]
    fn test_snapshot_caps_hand_count() {
        let snapshot = HandSnapshot::new((0..3).map(|i| HandDescriptor::new(Vec3::ZERO, i)));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_from_landmarks_uses_middle_mcp_as_palm() {
        let mapping = LandmarkMapping::default();
        let hand = HandDescriptor::from_landmarks(&full_hand(), 0, &mapping).unwrap();

        let expected = mapping.map(Vec3::new(9.0 / 40.0, 0.5, 0.0));
        assert!((hand.palm - expected).length() < 1e-6);
        assert_eq!(hand.fingers.len(), 5);
        assert_eq!(hand.finger(Finger::Pinky), Some(mapping.map(full_hand()[PINKY_TIP])));
    }

    #[test]
    fn test_missing_fingertips_are_dropped() {
        let mapping = LandmarkMapping::default();
        let partial: Vec<Vec3> = full_hand().into_iter().take(13).collect();
        let hand = HandDescriptor::from_landmarks(&partial, 1, &mapping).unwrap();

        // thumb, index and middle survive; ring and pinky are absent
        assert_eq!(hand.fingers.len(), 3);
        assert!(hand.finger(Finger::Ring).is_none());
    }

    #[test]
    fn test_missing_palm_yields_none() {
        let short = vec![Vec3::ZERO; 5];
        assert!(HandDescriptor::from_landmarks(&short, 0, &LandmarkMapping::default()).is_none());
    }

    #[test]
    fn test_mapping_centers_and_mirrors() {
        let mapping = LandmarkMapping::default();
        assert_eq!(mapping.map(Vec3::new(0.5, 0.5, 0.0)), Vec3::ZERO);
        assert!(mapping.map(Vec3::new(0.0, 0.5, 0.0)).x > 0.0);
        assert!(mapping.map(Vec3::new(0.5, 0.0, 0.0)).y > 0.0);
    }
}
