// src/landmarks.rs - Hand landmark data model
use crate::detector::DetectedHand;

/// Number of landmarks the detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Hand landmark indices (MediaPipe hand landmark model convention).
/// See: https://google.github.io/mediapipe/solutions/hands.html
#[allow(dead_code)]
pub mod landmark {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A single hand landmark in frame pixel space.
///
/// `x` and `y` are pixel coordinates; `z` is the detector's relative depth
/// estimate scaled by the frame width (larger magnitude = farther from the
/// camera plane, sign as reported by the detector).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The 21 landmarks of one detected hand, in frame pixel space.
///
/// Indices are dense 0-20 and follow the anatomical numbering in
/// [`landmark`]. Built fresh from each frame's detection result and never
/// persisted across frames.
#[derive(Clone, Debug)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Scale a detector result (normalized 0-1 coordinates) into pixel space
    /// for a frame of the given dimensions. Depth is scaled by frame width,
    /// matching the detector's own convention for relative depth.
    pub fn from_detection(hand: &DetectedHand, frame_width: u32, frame_height: u32) -> Self {
        let w = frame_width as f32;
        let h = frame_height as f32;
        let points = hand
            .landmarks
            .iter()
            .map(|lm| Landmark {
                x: lm.x * w,
                y: lm.y * h,
                z: lm.z * w,
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }

    #[cfg(test)]
    pub fn from_points(points: Vec<Landmark>) -> Self {
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::NormalizedLandmark;

    #[test]
    fn test_from_detection_scales_to_pixels() {
        let mut hand = DetectedHand {
            handedness: "Right".to_string(),
            score: 0.9,
            landmarks: vec![NormalizedLandmark::default(); LANDMARK_COUNT],
        };
        hand.landmarks[landmark::WRIST] = NormalizedLandmark {
            x: 0.5,
            y: 0.25,
            z: -0.25,
        };

        let set = LandmarkSet::from_detection(&hand, 1280, 720);
        assert_eq!(set.len(), LANDMARK_COUNT);

        let wrist = set.get(landmark::WRIST).unwrap();
        assert_eq!(wrist.x, 640.0);
        assert_eq!(wrist.y, 180.0);
        // Depth is scaled by frame width, not height.
        assert_eq!(wrist.z, -320.0);
    }

    #[test]
    fn test_fingertip_indices_are_two_past_their_pip() {
        // The finger-up rule compares each tip against the landmark two
        // positions proximal; the anatomical numbering guarantees that is
        // the PIP joint for all four non-thumb fingers.
        assert_eq!(landmark::INDEX_FINGER_TIP - 2, landmark::INDEX_FINGER_PIP);
        assert_eq!(landmark::MIDDLE_FINGER_TIP - 2, landmark::MIDDLE_FINGER_PIP);
        assert_eq!(landmark::RING_FINGER_TIP - 2, landmark::RING_FINGER_PIP);
        assert_eq!(landmark::PINKY_TIP - 2, landmark::PINKY_PIP);
    }
}
