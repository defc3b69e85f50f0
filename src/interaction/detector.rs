//! Range detection for one interactable against one agent.
//!
//! The detector is edge-triggered: it reports `Entered`/`Exited` only when its
//! in-range predicate actually flips, no matter how often it is sampled or how
//! many overlap signals arrive.
use bevy::prelude::*;
use serde::Deserialize;

use super::events::RangeTransition;

/// Which strategies feed the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Periodic distance check against `range_radius`.
    #[default]
    Proximity,
    /// Overlap begin/end signals from trigger volumes.
    Overlap,
    /// Both; whichever strategy crosses first notifies.
    Both,
}

impl DetectionMode {
    pub fn uses_proximity(self) -> bool {
        matches!(self, Self::Proximity | Self::Both)
    }

    pub fn uses_overlap(self) -> bool {
        matches!(self, Self::Overlap | Self::Both)
    }
}

#[derive(Component, Debug, Clone)]
pub struct Detector {
    mode: DetectionMode,
    range_radius: f32,
    check_interval: f32,
    since_check: f32,
    overlap_count: u32,
    proximity_inside: bool,
    in_range: bool,
    enabled: bool,
    agent: Option<Entity>,
    agent_position: Option<Vec3>,
    reported_missing_agent: bool,
}

impl Detector {
    pub fn new(mode: DetectionMode, range_radius: f32) -> Self {
        let check_interval = 0.0;
        Self {
            mode,
            range_radius: range_radius.max(0.0),
            check_interval,
            // The first tick always samples.
            since_check: check_interval,
            overlap_count: 0,
            proximity_inside: false,
            in_range: false,
            enabled: true,
            agent: None,
            agent_position: None,
            reported_missing_agent: false,
        }
    }

    pub fn proximity(range_radius: f32) -> Self {
        Self::new(DetectionMode::Proximity, range_radius)
    }

    pub fn overlap() -> Self {
        Self::new(DetectionMode::Overlap, 0.0)
    }

    /// Decimates proximity checks to one per `seconds`. Zero checks every tick.
    pub fn with_check_interval(mut self, seconds: f32) -> Self {
        self.check_interval = seconds.max(0.0);
        self.since_check = self.check_interval;
        self
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn range_radius(&self) -> f32 {
        self.range_radius
    }

    pub fn in_range(&self) -> bool {
        self.in_range
    }

    #[cfg_attr(not(feature = "interaction_debug"), allow(dead_code))]
    pub fn overlap_count(&self) -> u32 {
        self.overlap_count
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn agent(&self) -> Option<Entity> {
        self.agent
    }

    /// Last known agent position, refreshed every tick while the agent resolves.
    pub fn agent_position(&self) -> Option<Vec3> {
        self.agent_position
    }

    pub fn bind_agent(&mut self, agent: Entity) {
        self.agent = Some(agent);
        self.reported_missing_agent = false;
    }

    /// Forgets a despawned agent; the next discovery pass looks it up again.
    pub fn lose_agent(&mut self) {
        self.agent = None;
        self.agent_position = None;
    }

    pub fn observe_agent(&mut self, position: Option<Vec3>) {
        self.agent_position = position;
    }

    /// Returns `true` the first time it is called after the agent went missing.
    pub(crate) fn note_missing_agent(&mut self) -> bool {
        !std::mem::replace(&mut self.reported_missing_agent, true)
    }

    /// Advances the proximity strategy by `delta` seconds.
    ///
    /// Without an agent position the agent counts as out of range.
    pub fn sample(&mut self, origin: Vec3, delta: f32) -> Option<RangeTransition> {
        if !self.enabled || !self.mode.uses_proximity() {
            return None;
        }

        self.since_check += delta.max(0.0);
        if self.since_check < self.check_interval {
            return None;
        }
        self.since_check = 0.0;

        let inside = self
            .agent_position
            .is_some_and(|agent| origin.distance(agent) <= self.range_radius);
        if inside == self.proximity_inside {
            return None;
        }
        self.proximity_inside = inside;

        if inside {
            self.raise_enter()
        } else {
            self.raise_exit()
        }
    }

    pub fn overlap_began(&mut self) -> Option<RangeTransition> {
        if !self.enabled || !self.mode.uses_overlap() {
            return None;
        }

        self.overlap_count += 1;
        if self.overlap_count == 1 {
            self.raise_enter()
        } else {
            None
        }
    }

    pub fn overlap_ended(&mut self) -> Option<RangeTransition> {
        if !self.enabled || !self.mode.uses_overlap() || self.overlap_count == 0 {
            return None;
        }

        self.overlap_count -= 1;
        if self.overlap_count == 0 {
            self.raise_exit()
        } else {
            None
        }
    }

    fn raise_enter(&mut self) -> Option<RangeTransition> {
        if self.in_range {
            return None;
        }
        self.in_range = true;
        Some(RangeTransition::Entered)
    }

    fn raise_exit(&mut self) -> Option<RangeTransition> {
        if !self.in_range {
            return None;
        }
        self.in_range = false;
        Some(RangeTransition::Exited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks an agent along the x axis and counts the notifications the detector raises.
    fn walk(detector: &mut Detector, path: &[f32], delta: f32) -> (usize, usize) {
        let mut entered = 0;
        let mut exited = 0;
        for &x in path {
            detector.observe_agent(Some(Vec3::new(x, 0.0, 0.0)));
            match detector.sample(Vec3::ZERO, delta) {
                Some(RangeTransition::Entered) => entered += 1,
                Some(RangeTransition::Exited) => exited += 1,
                None => {}
            }
        }
        (entered, exited)
    }

    #[test]
    fn proximity_crossings_fire_once_regardless_of_interval() {
        // Approach, linger inside, leave, linger outside.
        let mut path: Vec<f32> = (0..40).map(|step| 10.0 - step as f32 * 0.25).collect();
        path.extend(std::iter::repeat(0.5).take(20));
        path.extend((0..40).map(|step| step as f32 * 0.25));
        path.extend(std::iter::repeat(10.0).take(20));

        for interval in [0.0, 0.05, 0.2, 0.5] {
            let mut detector = Detector::proximity(3.0).with_check_interval(interval);
            let (entered, exited) = walk(&mut detector, &path, 0.05);
            assert_eq!((entered, exited), (1, 1), "interval {interval}");
            assert!(!detector.in_range());
        }
    }

    #[test]
    fn coarse_interval_delays_but_does_not_skip() {
        let mut detector = Detector::proximity(3.0).with_check_interval(0.5);
        detector.observe_agent(Some(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(detector.sample(Vec3::ZERO, 0.125), None);

        detector.observe_agent(Some(Vec3::new(1.0, 0.0, 0.0)));
        for _ in 0..3 {
            assert_eq!(detector.sample(Vec3::ZERO, 0.125), None);
        }
        assert_eq!(
            detector.sample(Vec3::ZERO, 0.125),
            Some(RangeTransition::Entered)
        );
    }

    #[test]
    fn boundary_distance_counts_as_inside() {
        let mut detector = Detector::proximity(3.0);
        detector.observe_agent(Some(Vec3::new(3.0, 0.0, 0.0)));
        assert_eq!(
            detector.sample(Vec3::ZERO, 0.016),
            Some(RangeTransition::Entered)
        );
    }

    #[test]
    fn missing_agent_reads_as_out_of_range() {
        let mut detector = Detector::proximity(3.0);
        assert_eq!(detector.sample(Vec3::ZERO, 0.1), None);

        detector.observe_agent(Some(Vec3::X));
        assert_eq!(detector.sample(Vec3::ZERO, 0.1), Some(RangeTransition::Entered));

        detector.lose_agent();
        assert_eq!(detector.sample(Vec3::ZERO, 0.1), Some(RangeTransition::Exited));
        assert_eq!(detector.sample(Vec3::ZERO, 0.1), None);
    }

    #[test]
    fn overlapping_volumes_exit_only_when_all_leave() {
        let mut detector = Detector::overlap();

        assert_eq!(detector.overlap_began(), Some(RangeTransition::Entered));
        assert_eq!(detector.overlap_began(), None);
        assert_eq!(detector.overlap_count(), 2);

        assert_eq!(detector.overlap_ended(), None);
        assert!(detector.in_range());
        assert_eq!(detector.overlap_ended(), Some(RangeTransition::Exited));

        // A stray end never underflows the counter.
        assert_eq!(detector.overlap_ended(), None);
        assert_eq!(detector.overlap_count(), 0);
    }

    #[test]
    fn overlap_mode_ignores_proximity_and_vice_versa() {
        let mut overlap = Detector::overlap();
        overlap.observe_agent(Some(Vec3::ZERO));
        assert_eq!(overlap.sample(Vec3::ZERO, 1.0), None);

        let mut proximity = Detector::proximity(3.0);
        assert_eq!(proximity.overlap_began(), None);
        assert_eq!(proximity.overlap_count(), 0);
    }

    #[test]
    fn both_mode_lets_either_strategy_notify_without_duplicates() {
        let mut detector = Detector::new(DetectionMode::Both, 3.0);

        // Overlap enters before proximity has confirmed anything.
        detector.observe_agent(Some(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(detector.overlap_began(), Some(RangeTransition::Entered));
        assert_eq!(detector.sample(Vec3::ZERO, 0.1), None);

        // Proximity now agrees; still no second enter.
        detector.observe_agent(Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(detector.sample(Vec3::ZERO, 0.1), None);
        assert!(detector.in_range());

        // Proximity leaving is enough to exit, and the later overlap end stays silent.
        detector.observe_agent(Some(Vec3::new(8.0, 0.0, 0.0)));
        assert_eq!(detector.sample(Vec3::ZERO, 0.1), Some(RangeTransition::Exited));
        assert_eq!(detector.overlap_ended(), None);
    }

    #[test]
    fn disabled_detector_never_notifies() {
        let mut detector = Detector::new(DetectionMode::Both, 3.0);
        detector.disable();
        detector.observe_agent(Some(Vec3::ZERO));

        assert_eq!(detector.sample(Vec3::ZERO, 0.1), None);
        assert_eq!(detector.overlap_began(), None);
        assert!(!detector.is_enabled());
    }

    #[test]
    fn mode_parses_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: DetectionMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"both\"").expect("mode should parse");
        assert_eq!(parsed.mode, DetectionMode::Both);
    }
}
