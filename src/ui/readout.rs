use crate::constants::render_settings::DISTANCE_UNIT;
use crate::tools::measure::MeasureState;
use crate::tools::origin::OriginMode;
use bevy::prelude::*;

pub const POINT_PLACEHOLDER: &str = "not selected";
pub const ORIGIN_REQUIRED_PLACEHOLDER: &str = "origin not set";
pub const ORIGIN_UNSET_TEXT: &str = "not set";
pub const ORIGIN_SETTING_TEXT: &str = "click the model";
pub const DISTANCE_PLACEHOLDER: &str = "-";

/// Which line of the readout panel a text entity displays.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutField {
    PointA,
    PointB,
    Distance,
    Origin,
    Status,
}

/// Last advisory or error message shown to the user. Empty means no message.
#[derive(Resource, Default)]
pub struct StatusLine {
    message: String,
}

impl StatusLine {
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn clear(&mut self) {
        self.message.clear();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn format_point(p: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)
}

pub fn format_distance(metres: f32) -> String {
    format!("{:.3} {}", metres, DISTANCE_UNIT)
}

/// Text for one measurement point. Coordinates are shown relative to the
/// confirmed origin, recomputed from the raw stored point on every call so a
/// later origin change never shows a stale offset.
pub fn point_line(measure: &MeasureState, origin_mode: &OriginMode, index: usize) -> String {
    match origin_mode {
        OriginMode::OriginSet { origin } => match measure.point(index) {
            Some(p) => format_point(p - *origin),
            None => POINT_PLACEHOLDER.to_string(),
        },
        _ => ORIGIN_REQUIRED_PLACEHOLDER.to_string(),
    }
}

pub fn distance_line(measure: &MeasureState) -> String {
    match measure.distance() {
        Some(d) => format_distance(d),
        None => DISTANCE_PLACEHOLDER.to_string(),
    }
}

pub fn origin_line(origin_mode: &OriginMode) -> String {
    match origin_mode {
        OriginMode::AwaitingOrigin => ORIGIN_UNSET_TEXT.to_string(),
        OriginMode::OriginSet { origin } => format_point(*origin),
        OriginMode::SettingOrigin { .. } => ORIGIN_SETTING_TEXT.to_string(),
    }
}

/// Rewrite the readout text whenever selection, origin, or status change.
pub fn update_readout(
    measure: Res<MeasureState>,
    origin_mode: Res<OriginMode>,
    status: Res<StatusLine>,
    mut fields: Query<(&ReadoutField, &mut Text)>,
) {
    if !(measure.is_changed() || origin_mode.is_changed() || status.is_changed()) {
        return;
    }
    for (field, mut text) in &mut fields {
        text.0 = match field {
            ReadoutField::PointA => {
                format!("Point A: {}", point_line(&measure, &origin_mode, 0))
            }
            ReadoutField::PointB => {
                format!("Point B: {}", point_line(&measure, &origin_mode, 1))
            }
            ReadoutField::Distance => format!("Distance: {}", distance_line(&measure)),
            ReadoutField::Origin => format!("Origin: {}", origin_line(&origin_mode)),
            ReadoutField::Status => status.message().to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(points: &[Vec3]) -> MeasureState {
        let mut measure = MeasureState::default();
        for p in points {
            measure.try_add_point(*p).unwrap();
        }
        measure
    }

    #[test]
    fn points_format_to_three_decimals() {
        assert_eq!(
            format_point(Vec3::new(1.0, 0.5, -0.25)),
            "(1.000, 0.500, -0.250)"
        );
    }

    #[test]
    fn raw_display_with_world_zero_origin() {
        let measure = measured(&[Vec3::new(1.0, 0.5, -0.25), Vec3::new(1.0, 2.5, -0.25)]);
        let origin = OriginMode::OriginSet {
            origin: Vec3::ZERO,
        };
        assert_eq!(point_line(&measure, &origin, 0), "(1.000, 0.500, -0.250)");
        assert_eq!(point_line(&measure, &origin, 1), "(1.000, 2.500, -0.250)");
        assert_eq!(distance_line(&measure), "2.000 meters");
    }

    #[test]
    fn points_display_relative_to_origin() {
        let measure = measured(&[Vec3::new(1.0, 2.0, 0.0)]);
        let origin = OriginMode::OriginSet {
            origin: Vec3::new(1.0, 0.0, 0.0),
        };
        assert_eq!(point_line(&measure, &origin, 0), "(0.000, 2.000, 0.000)");
        assert_eq!(origin_line(&origin), "(1.000, 0.000, 0.000)");
    }

    #[test]
    fn relative_display_follows_origin_changes() {
        let measure = measured(&[Vec3::new(1.0, 2.0, 0.0)]);
        let mut origin = OriginMode::OriginSet {
            origin: Vec3::new(1.0, 0.0, 0.0),
        };
        assert_eq!(point_line(&measure, &origin, 0), "(0.000, 2.000, 0.000)");
        origin.confirm(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(point_line(&measure, &origin, 0), "(1.000, 0.000, 0.000)");
    }

    #[test]
    fn distance_ignores_origin_offset() {
        let measure = measured(&[Vec3::new(1.0, 0.5, -0.25), Vec3::new(1.0, 2.5, -0.25)]);
        // The distance line never consults the origin, so an arbitrary offset
        // cannot perturb it.
        assert_eq!(distance_line(&measure), "2.000 meters");
    }

    #[test]
    fn placeholders_before_any_selection() {
        let measure = MeasureState::default();
        let confirmed = OriginMode::OriginSet {
            origin: Vec3::ZERO,
        };
        assert_eq!(point_line(&measure, &confirmed, 0), POINT_PLACEHOLDER);
        assert_eq!(distance_line(&measure), DISTANCE_PLACEHOLDER);

        let awaiting = OriginMode::AwaitingOrigin;
        assert_eq!(
            point_line(&measure, &awaiting, 0),
            ORIGIN_REQUIRED_PLACEHOLDER
        );
        assert_eq!(origin_line(&awaiting), ORIGIN_UNSET_TEXT);
    }
}
