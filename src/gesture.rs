// src/gesture.rs - Pose classification, active zone and debounced dispatch
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::landmarks::{landmark, Landmark, LandmarkSet, LANDMARK_COUNT};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureError {
    #[error("insufficient landmarks: expected {expected}, got {actual}")]
    InsufficientLandmarks { expected: usize, actual: usize },
}

/// Fingertips whose extension makes up a [`FingerState`], in finger order.
const FINGERTIPS: [usize; 4] = [
    landmark::INDEX_FINGER_TIP,
    landmark::MIDDLE_FINGER_TIP,
    landmark::RING_FINGER_TIP,
    landmark::PINKY_TIP,
];

/// Points that must all sit inside the active zone for the hand to count
/// as "in zone": wrist, thumb tip, middle tip and pinky tip span the hand.
const ZONE_CHECK_POINTS: [usize; 4] = [
    landmark::WRIST,
    landmark::THUMB_TIP,
    landmark::MIDDLE_FINGER_TIP,
    landmark::PINKY_TIP,
];

// ── Zone ───────────────────────────────────────────────────

/// Fixed screen rectangle where gesture input is recognized, in frame
/// pixel coordinates. Containment is strict interior: a point exactly on
/// a bound is outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Zone {
    pub fn contains(&self, point: &Landmark) -> bool {
        self.left < point.x && point.x < self.right && self.top < point.y && point.y < self.bottom
    }
}

// ── Finger state ───────────────────────────────────────────

/// Up/down classification of the four non-thumb fingertips.
///
/// A finger is "up" when its tip is vertically above its own middle joint
/// in image space. This assumes an upright, camera-facing hand; the thumb
/// is deliberately not classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerState {
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    /// Finger order matches [`FINGERTIPS`]: index, middle, ring, pinky.
    pub fn as_array(&self) -> [bool; 4] {
        [self.index, self.middle, self.ring, self.pinky]
    }
}

// ── Actions ────────────────────────────────────────────────

/// Media-player commands a recognized pose maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    PlayPause,
    SeekForward,
    SeekBackward,
    ToggleFullscreen,
}

impl GestureAction {
    pub const COUNT: usize = 4;

    /// Display name for logging and the status panel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayPause => "play/pause",
            Self::SeekForward => "seek forward",
            Self::SeekBackward => "seek backward",
            Self::ToggleFullscreen => "toggle fullscreen",
        }
    }

    /// Minimum interval before the same action may fire again.
    pub fn cooldown(&self) -> Duration {
        match self {
            Self::PlayPause | Self::ToggleFullscreen => Duration::from_millis(1000),
            Self::SeekForward | Self::SeekBackward => Duration::from_millis(500),
        }
    }

    fn slot(&self) -> usize {
        match self {
            Self::PlayPause => 0,
            Self::SeekForward => 1,
            Self::SeekBackward => 2,
            Self::ToggleFullscreen => 3,
        }
    }
}

/// Pose-to-action table. Matching is exact and in table order; the first
/// match wins (the four patterns are mutually exclusive, so order only
/// acts as a tie-break policy).
#[rustfmt::skip]
const GESTURE_TABLE: [(FingerState, GestureAction); 4] = [
    (FingerState { index: true, middle: true,  ring: true,  pinky: true  }, GestureAction::PlayPause),
    (FingerState { index: true, middle: true,  ring: false, pinky: false }, GestureAction::SeekForward),
    (FingerState { index: true, middle: false, ring: false, pinky: false }, GestureAction::SeekBackward),
    (FingerState { index: true, middle: false, ring: false, pinky: true  }, GestureAction::ToggleFullscreen),
];

// ── Cooldowns ──────────────────────────────────────────────

/// Per-action debounce record: minimum interval plus the timestamp of the
/// last trigger. One per recognized action, living for the process lifetime.
#[derive(Debug, Clone, Copy)]
struct GestureCooldown {
    interval: Duration,
    last_triggered: Option<Instant>,
}

impl GestureCooldown {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_triggered: None,
        }
    }

    /// Elapsed-or-never check; an interval that has exactly elapsed counts
    /// as ready.
    fn ready(&self, now: Instant) -> bool {
        self.last_triggered
            .map_or(true, |last| now.duration_since(last) >= self.interval)
    }

    fn trigger(&mut self, now: Instant) {
        self.last_triggered = Some(now);
    }
}

// ── Controller ─────────────────────────────────────────────

/// Converts one frame's landmark set into at most one outbound action,
/// honoring zone containment and per-action cooldowns.
///
/// The controller never reads a clock itself; callers pass the current
/// timestamp into [`GestureController::evaluate`], which keeps evaluation
/// deterministic under test.
pub struct GestureController {
    zone: Zone,
    cooldowns: [GestureCooldown; GestureAction::COUNT],
}

impl GestureController {
    pub fn new(zone: Zone) -> Self {
        let cooldowns = [
            GestureCooldown::new(GestureAction::PlayPause.cooldown()),
            GestureCooldown::new(GestureAction::SeekForward.cooldown()),
            GestureCooldown::new(GestureAction::SeekBackward.cooldown()),
            GestureCooldown::new(GestureAction::ToggleFullscreen.cooldown()),
        ];
        Self { zone, cooldowns }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Classify which of the four fingers are extended.
    ///
    /// Each fingertip is compared against the landmark two positions
    /// proximal (its PIP joint): strictly smaller y means the finger is up.
    pub fn classify_fingers(landmarks: &LandmarkSet) -> Result<FingerState, GestureError> {
        if landmarks.len() < LANDMARK_COUNT {
            return Err(GestureError::InsufficientLandmarks {
                expected: LANDMARK_COUNT,
                actual: landmarks.len(),
            });
        }

        let mut up = [false; 4];
        for (i, &tip) in FINGERTIPS.iter().enumerate() {
            let tip_y = landmarks.get(tip).map(|lm| lm.y);
            let pip_y = landmarks.get(tip - 2).map(|lm| lm.y);
            if let (Some(tip_y), Some(pip_y)) = (tip_y, pip_y) {
                up[i] = tip_y < pip_y;
            }
        }

        Ok(FingerState {
            index: up[0],
            middle: up[1],
            ring: up[2],
            pinky: up[3],
        })
    }

    /// Whether the hand sits inside the active zone. All four check points
    /// must be strictly interior; there is no partial-containment signal.
    pub fn is_in_zone(&self, landmarks: &LandmarkSet) -> bool {
        ZONE_CHECK_POINTS
            .iter()
            .all(|&i| landmarks.get(i).map_or(false, |lm| self.zone.contains(lm)))
    }

    /// Evaluate one frame's landmarks at time `now`.
    ///
    /// Returns `None` when the landmark set is insufficient, the hand is
    /// outside the zone, the pose matches no table entry, or the matched
    /// action is still cooling down. On emission the action's cooldown
    /// timestamp advances to `now`; no other state is touched.
    pub fn evaluate(&mut self, landmarks: &LandmarkSet, now: Instant) -> Option<GestureAction> {
        let fingers = Self::classify_fingers(landmarks).ok()?;
        if !self.is_in_zone(landmarks) {
            return None;
        }

        let action = GESTURE_TABLE
            .iter()
            .find(|(pattern, _)| *pattern == fingers)
            .map(|(_, action)| *action)?;

        let cooldown = &mut self.cooldowns[action.slot()];
        if !cooldown.ready(now) {
            return None;
        }
        cooldown.trigger(now);

        debug!(action = action.as_str(), "gesture triggered");
        Some(action)
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_ZONE: Zone = Zone {
        left: 800.0,
        top: 200.0,
        right: 1200.0,
        bottom: 500.0,
    };

    /// Build a full 21-point hand inside the test zone. Every joint sits at
    /// (1000, 350); each requested "up" fingertip is raised above its PIP,
    /// each "down" fingertip lowered below it. Both offsets stay inside the
    /// zone so pose and containment vary independently.
    fn hand_pose(index: bool, middle: bool, ring: bool, pinky: bool) -> LandmarkSet {
        let mut points = vec![
            Landmark {
                x: 1000.0,
                y: 350.0,
                z: 0.0,
            };
            LANDMARK_COUNT
        ];
        for (&tip, up) in FINGERTIPS.iter().zip([index, middle, ring, pinky]) {
            points[tip].y = if up { 300.0 } else { 400.0 };
        }
        LandmarkSet::from_points(points)
    }

    fn controller() -> GestureController {
        GestureController::new(TEST_ZONE)
    }

    #[test]
    fn test_classify_rejects_missing_hand() {
        let empty = LandmarkSet::from_points(Vec::new());
        assert_eq!(
            GestureController::classify_fingers(&empty),
            Err(GestureError::InsufficientLandmarks {
                expected: LANDMARK_COUNT,
                actual: 0,
            })
        );

        let partial = LandmarkSet::from_points(vec![Landmark::default(); 10]);
        assert!(GestureController::classify_fingers(&partial).is_err());
    }

    #[test]
    fn test_classify_reports_finger_order() {
        let fingers = GestureController::classify_fingers(&hand_pose(true, false, true, false))
            .expect("full landmark set");
        assert_eq!(fingers.as_array(), [true, false, true, false]);
    }

    #[test]
    fn test_classify_is_strict_on_equal_height() {
        // Tip level with its PIP joint is not "up".
        let mut points = vec![
            Landmark {
                x: 1000.0,
                y: 350.0,
                z: 0.0,
            };
            LANDMARK_COUNT
        ];
        points[landmark::INDEX_FINGER_TIP].y = points[landmark::INDEX_FINGER_PIP].y;
        let fingers =
            GestureController::classify_fingers(&LandmarkSet::from_points(points)).unwrap();
        assert!(!fingers.index);
    }

    #[test]
    fn test_play_pause_fires_fresh() {
        let mut ctl = controller();
        let now = Instant::now();
        assert_eq!(
            ctl.evaluate(&hand_pose(true, true, true, true), now),
            Some(GestureAction::PlayPause)
        );
    }

    #[test]
    fn test_unmapped_patterns_never_fire() {
        let mut ctl = controller();
        let now = Instant::now();
        // No table row matches: index down, or index+ring only, etc.
        assert_eq!(ctl.evaluate(&hand_pose(false, false, false, false), now), None);
        assert_eq!(ctl.evaluate(&hand_pose(false, true, true, true), now), None);
        assert_eq!(ctl.evaluate(&hand_pose(true, false, true, false), now), None);
        assert_eq!(ctl.evaluate(&hand_pose(true, true, true, false), now), None);
    }

    #[test]
    fn test_out_of_zone_suppresses_action() {
        let mut ctl = controller();
        let now = Instant::now();

        // Wrist at x=750 sits left of the zone; all other points stay in.
        let mut pose = hand_pose(true, true, true, true);
        let mut points: Vec<Landmark> = pose.iter().copied().collect();
        points[landmark::WRIST].x = 750.0;
        pose = LandmarkSet::from_points(points);

        assert!(!ctl.is_in_zone(&pose));
        assert_eq!(ctl.evaluate(&pose, now), None);
    }

    #[test]
    fn test_zone_boundary_is_exclusive() {
        let ctl = controller();
        let mut points = vec![
            Landmark {
                x: 1000.0,
                y: 350.0,
                z: 0.0,
            };
            LANDMARK_COUNT
        ];
        // Exactly on the left bound: outside by the strict-interior rule.
        points[landmark::WRIST].x = TEST_ZONE.left;
        assert!(!ctl.is_in_zone(&LandmarkSet::from_points(points)));
    }

    #[test]
    fn test_out_of_zone_does_not_advance_cooldown() {
        let mut ctl = controller();
        let now = Instant::now();

        let mut points: Vec<Landmark> = hand_pose(true, true, true, true).iter().copied().collect();
        points[landmark::WRIST].x = 750.0;
        assert_eq!(ctl.evaluate(&LandmarkSet::from_points(points), now), None);

        // The suppressed attempt must not have burned the cooldown.
        assert_eq!(
            ctl.evaluate(&hand_pose(true, true, true, true), now),
            Some(GestureAction::PlayPause)
        );
    }

    #[test]
    fn test_immediate_repeat_is_debounced() {
        let mut ctl = controller();
        let now = Instant::now();
        let pose = hand_pose(true, true, true, true);

        assert_eq!(ctl.evaluate(&pose, now), Some(GestureAction::PlayPause));
        assert_eq!(ctl.evaluate(&pose, now), None);
    }

    #[test]
    fn test_exactly_elapsed_cooldown_fires() {
        let mut ctl = controller();
        let t0 = Instant::now();
        let pose = hand_pose(true, true, true, true);

        assert_eq!(ctl.evaluate(&pose, t0), Some(GestureAction::PlayPause));
        let t1 = t0 + GestureAction::PlayPause.cooldown();
        assert_eq!(ctl.evaluate(&pose, t1), Some(GestureAction::PlayPause));
    }

    #[test]
    fn test_cooldowns_are_independent_per_action() {
        let mut ctl = controller();
        let now = Instant::now();

        assert_eq!(
            ctl.evaluate(&hand_pose(true, true, false, false), now),
            Some(GestureAction::SeekForward)
        );
        // Seek backward has its own untouched cooldown and fires at once.
        assert_eq!(
            ctl.evaluate(&hand_pose(true, false, false, false), now),
            Some(GestureAction::SeekBackward)
        );
    }

    #[test]
    fn test_seek_backward_cadence() {
        let mut ctl = controller();
        let t0 = Instant::now();
        let pose = hand_pose(true, false, false, false);

        assert_eq!(ctl.evaluate(&pose, t0), Some(GestureAction::SeekBackward));
        assert_eq!(ctl.evaluate(&pose, t0 + Duration::from_millis(200)), None);
        assert_eq!(
            ctl.evaluate(&pose, t0 + Duration::from_millis(600)),
            Some(GestureAction::SeekBackward)
        );
    }

    #[test]
    fn test_fullscreen_pose() {
        let mut ctl = controller();
        let now = Instant::now();
        assert_eq!(
            ctl.evaluate(&hand_pose(true, false, false, true), now),
            Some(GestureAction::ToggleFullscreen)
        );
    }
}
