use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::axis::{clamp_unit, Axis, AXIS_COUNT};
use crate::error::ArbiterError;

pub const DEFAULT_PROFILE: &str = "default";
pub const ELEVATED_RISK_PROFILE: &str = "elevated-risk";

/// Minimum acceptable and aspirational value for one axis.
///
/// Both ends are clamped to `[0, 1]` and `target` is never below `floor`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "AxisBoundsRepr")]
pub struct AxisBounds {
    floor: f64,
    target: f64,
}

#[derive(Deserialize)]
struct AxisBoundsRepr {
    floor: f64,
    target: f64,
}

impl From<AxisBoundsRepr> for AxisBounds {
    fn from(repr: AxisBoundsRepr) -> Self {
        AxisBounds::new(repr.floor, repr.target)
    }
}

impl AxisBounds {
    pub fn new(floor: f64, target: f64) -> Self {
        let floor = clamp_unit(floor);
        Self {
            floor,
            target: clamp_unit(target).max(floor),
        }
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

/// A named per-axis (floor, target) configuration.
///
/// The upstream pipeline decides which profile is active for a call; the
/// arbiter only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContextProfileRepr", into = "ContextProfileRepr")]
pub struct ContextProfile {
    name: String,
    bounds: [AxisBounds; AXIS_COUNT],
}

#[derive(Clone, Serialize, Deserialize)]
struct ContextProfileRepr {
    name: String,
    bounds: BTreeMap<Axis, AxisBounds>,
}

impl TryFrom<ContextProfileRepr> for ContextProfile {
    type Error = ArbiterError;

    fn try_from(repr: ContextProfileRepr) -> Result<Self, Self::Error> {
        if let Some(missing) = Axis::ALL.into_iter().find(|a| !repr.bounds.contains_key(a)) {
            return Err(ArbiterError::MissingAxis(missing));
        }
        Ok(ContextProfile::new(repr.name, |axis| {
            repr.bounds
                .get(&axis)
                .copied()
                .unwrap_or_else(|| AxisBounds::new(0.0, 0.0))
        }))
    }
}

impl From<ContextProfile> for ContextProfileRepr {
    fn from(profile: ContextProfile) -> Self {
        Self {
            name: profile.name,
            bounds: Axis::ALL.into_iter().zip(profile.bounds).collect(),
        }
    }
}

impl ContextProfile {
    pub fn new<F>(name: impl Into<String>, bounds: F) -> Self
    where
        F: FnMut(Axis) -> AxisBounds,
    {
        Self {
            name: name.into(),
            bounds: Axis::ALL.map(bounds),
        }
    }

    /// Same floor and target on every axis.
    pub fn uniform(name: impl Into<String>, floor: f64, target: f64) -> Self {
        Self::new(name, |_| AxisBounds::new(floor, target))
    }

    /// Copy with one axis's bounds replaced.
    pub fn with_bounds(mut self, axis: Axis, floor: f64, target: f64) -> Self {
        self.bounds[axis.index()] = AxisBounds::new(floor, target);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self, axis: Axis) -> AxisBounds {
        self.bounds[axis.index()]
    }

    pub fn floor(&self, axis: Axis) -> f64 {
        self.bounds(axis).floor()
    }

    pub fn target(&self, axis: Axis) -> f64 {
        self.bounds(axis).target()
    }
}

/// The everyday profile.
///
/// Safety carries the highest floor; transparency and inclusion the lowest.
pub fn default_profile() -> ContextProfile {
    ContextProfile::new(DEFAULT_PROFILE, |axis| match axis {
        Axis::Safety => AxisBounds::new(0.5, 0.8),
        Axis::Fairness => AxisBounds::new(0.4, 0.75),
        Axis::Autonomy => AxisBounds::new(0.4, 0.75),
        Axis::Transparency => AxisBounds::new(0.3, 0.7),
        Axis::Inclusion => AxisBounds::new(0.3, 0.7),
    })
}

/// Stricter admission under operating pressure.
///
/// Safety floor and target sit strictly above the default profile's; every
/// other axis is raised as well.
pub fn elevated_risk_profile() -> ContextProfile {
    ContextProfile::new(ELEVATED_RISK_PROFILE, |axis| match axis {
        Axis::Safety => AxisBounds::new(0.7, 0.95),
        Axis::Fairness => AxisBounds::new(0.5, 0.8),
        Axis::Autonomy => AxisBounds::new(0.5, 0.8),
        Axis::Transparency => AxisBounds::new(0.4, 0.75),
        Axis::Inclusion => AxisBounds::new(0.4, 0.75),
    })
}

/// Resolve a canonical profile by name.
pub fn canonical_profile(name: &str) -> Result<ContextProfile, ArbiterError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "default" => Ok(default_profile()),
        "elevated-risk" | "elevated_risk" | "elevated" => Ok(elevated_risk_profile()),
        _ => Err(ArbiterError::UnknownProfile(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevated_is_strictly_safer() {
        let default = default_profile();
        let elevated = elevated_risk_profile();
        assert!(elevated.floor(Axis::Safety) > default.floor(Axis::Safety));
        assert!(elevated.target(Axis::Safety) > default.target(Axis::Safety));
        for axis in Axis::ALL {
            assert!(elevated.floor(axis) >= default.floor(axis));
            assert!(elevated.target(axis) >= default.target(axis));
        }
    }

    #[test]
    fn canonical_lookup() {
        assert_eq!(canonical_profile("default").unwrap().name(), DEFAULT_PROFILE);
        assert_eq!(
            canonical_profile("Elevated_Risk").unwrap().name(),
            ELEVATED_RISK_PROFILE
        );
        assert_eq!(
            canonical_profile("panic"),
            Err(ArbiterError::UnknownProfile("panic".into()))
        );
    }

    #[test]
    fn bounds_keep_target_above_floor() {
        let bounds = AxisBounds::new(0.8, 0.2);
        assert_eq!(bounds.floor(), 0.8);
        assert_eq!(bounds.target(), 0.8);

        let bounds = AxisBounds::new(-1.0, 2.0);
        assert_eq!(bounds.floor(), 0.0);
        assert_eq!(bounds.target(), 1.0);
    }

    #[test]
    fn with_bounds_overrides_one_axis() {
        let profile = ContextProfile::uniform("flat", 0.2, 0.6).with_bounds(Axis::Safety, 0.9, 1.0);
        assert_eq!(profile.floor(Axis::Safety), 0.9);
        assert_eq!(profile.floor(Axis::Fairness), 0.2);
    }

    #[test]
    fn profile_json_roundtrip() {
        let profile = elevated_risk_profile();
        let json = serde_json::to_string(&profile).unwrap();
        let restored: ContextProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn profile_json_requires_all_axes() {
        let json = r#"{"name": "partial", "bounds": {"safety": {"floor": 0.1, "target": 0.5}}}"#;
        assert!(serde_json::from_str::<ContextProfile>(json).is_err());
    }
}
