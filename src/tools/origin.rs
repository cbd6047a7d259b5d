use bevy::prelude::*;

/// Origin workflow state. Measurement clicks are accepted only in `OriginSet`;
/// `SettingOrigin` suppresses capture even when an origin was confirmed before.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub enum OriginMode {
    /// No origin has ever been confirmed.
    AwaitingOrigin,
    /// An origin is confirmed; measurement coordinates are reported relative to it.
    OriginSet { origin: Vec3 },
    /// The next surface click defines the origin. Keeps the previously
    /// confirmed origin (if any) so displays stay meaningful until the click lands.
    SettingOrigin { previous: Option<Vec3> },
}

impl OriginMode {
    /// Starting state. Without the origin workflow the viewer behaves as if the
    /// world origin was confirmed up front, so measuring works immediately and
    /// displayed coordinates are raw.
    pub fn initial(origin_workflow: bool) -> Self {
        if origin_workflow {
            Self::AwaitingOrigin
        } else {
            Self::OriginSet { origin: Vec3::ZERO }
        }
    }

    pub fn accepts_measurement(&self) -> bool {
        matches!(self, Self::OriginSet { .. })
    }

    pub fn is_setting(&self) -> bool {
        matches!(self, Self::SettingOrigin { .. })
    }

    /// Currently confirmed origin, surviving an in-progress `SettingOrigin`.
    pub fn origin(&self) -> Option<Vec3> {
        match *self {
            Self::AwaitingOrigin => None,
            Self::OriginSet { origin } => Some(origin),
            Self::SettingOrigin { previous } => previous,
        }
    }

    /// Enter origin-capture mode. Idempotent while already capturing.
    pub fn begin_setting(&mut self) {
        *self = match *self {
            Self::AwaitingOrigin => Self::SettingOrigin { previous: None },
            Self::OriginSet { origin } => Self::SettingOrigin {
                previous: Some(origin),
            },
            Self::SettingOrigin { previous } => Self::SettingOrigin { previous },
        };
    }

    /// Confirm a clicked surface point as the origin.
    pub fn confirm(&mut self, point: Vec3) {
        *self = Self::OriginSet { origin: point };
    }

    /// Force the origin back to world zero, confirmed, from any state.
    pub fn reset(&mut self) {
        *self = Self::OriginSet { origin: Vec3::ZERO };
    }

    /// Translate a raw world-space point into the origin-relative frame.
    pub fn relative(&self, raw: Vec3) -> Vec3 {
        raw - self.origin().unwrap_or(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_workflow_starts_confirmed_at_zero() {
        let mode = OriginMode::initial(false);
        assert!(mode.accepts_measurement());
        assert_eq!(mode.origin(), Some(Vec3::ZERO));
    }

    #[test]
    fn extended_workflow_starts_awaiting() {
        let mode = OriginMode::initial(true);
        assert!(!mode.accepts_measurement());
        assert_eq!(mode.origin(), None);
    }

    #[test]
    fn first_confirmation_enables_measurement() {
        let mut mode = OriginMode::initial(true);
        mode.begin_setting();
        assert!(!mode.accepts_measurement());
        mode.confirm(Vec3::new(1.0, 0.0, 0.0));
        assert!(mode.accepts_measurement());
        assert_eq!(mode.origin(), Some(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn setting_suppresses_measurement_even_when_previously_confirmed() {
        let mut mode = OriginMode::OriginSet {
            origin: Vec3::new(2.0, 0.0, 1.0),
        };
        mode.begin_setting();
        assert!(!mode.accepts_measurement());
        // The old origin is still reported while the new click is pending.
        assert_eq!(mode.origin(), Some(Vec3::new(2.0, 0.0, 1.0)));
    }

    #[test]
    fn begin_setting_is_idempotent() {
        let mut mode = OriginMode::OriginSet { origin: Vec3::ONE };
        mode.begin_setting();
        mode.begin_setting();
        assert_eq!(
            mode,
            OriginMode::SettingOrigin {
                previous: Some(Vec3::ONE)
            }
        );
    }

    #[test]
    fn reset_confirms_world_zero_from_any_state() {
        for mut mode in [
            OriginMode::AwaitingOrigin,
            OriginMode::OriginSet { origin: Vec3::ONE },
            OriginMode::SettingOrigin {
                previous: Some(Vec3::ONE),
            },
        ] {
            mode.reset();
            assert!(mode.accepts_measurement());
            assert_eq!(mode.origin(), Some(Vec3::ZERO));
        }
    }

    #[test]
    fn relative_translation_recomputes_per_origin() {
        let point = Vec3::new(1.0, 2.0, 0.0);
        let mut mode = OriginMode::OriginSet {
            origin: Vec3::new(1.0, 0.0, 0.0),
        };
        assert_eq!(mode.relative(point), Vec3::new(0.0, 2.0, 0.0));
        mode.confirm(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(mode.relative(point), Vec3::new(1.0, 0.0, 0.0));
    }
}
