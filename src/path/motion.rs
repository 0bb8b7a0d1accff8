use super::spline;
use glam::Vec3;

/// Ordered waypoints traversed at a constant parametric speed.
///
/// The cursor runs from `0` at the first point to `points.len() - 1` at the
/// last, one unit per segment. Tangents are rebuilt whenever the point list
/// changes and never during stepping.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionPath {
    points: Vec<Vec3>,
    tangents: Vec<Vec3>,
    speed: f32,
    enabled: bool,
    looping: bool,
    cursor: f32,
}

impl Default for MotionPath {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            tangents: Vec::new(),
            speed: 1.0,
            enabled: true,
            looping: false,
            cursor: 0.0,
        }
    }
}

impl MotionPath {
    pub fn new(points: Vec<Vec3>, speed: f32) -> Self {
        let tangents = spline::build_tangents(&points);
        Self {
            points,
            tangents,
            speed,
            ..Self::default()
        }
    }

    /// Wrap back to the first point instead of stopping at the last.
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn tangents(&self) -> &[Vec3] {
        &self.tangents
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn set_points(&mut self, points: Vec<Vec3>) {
        self.points = points;
        self.tangents = spline::build_tangents(&self.points);
        self.cursor = self.cursor.clamp(0.0, spline::span(self.points.len()));
    }

    pub fn push_point(&mut self, point: Vec3) {
        self.points.push(point);
        self.tangents = spline::build_tangents(&self.points);
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Parametric length: number of segments.
    pub fn span(&self) -> f32 {
        spline::span(self.points.len())
    }

    /// Moves the cursor back to the first point.
    pub fn reset(&mut self) {
        self.cursor = 0.0;
    }

    pub fn step(&mut self, dt: f32) {
        if !self.enabled || self.points.is_empty() {
            return;
        }
        let span = self.span();
        if span <= 0.0 {
            self.cursor = 0.0;
            return;
        }
        let advanced = self.cursor + self.speed * dt;
        self.cursor = if self.looping {
            advanced.rem_euclid(span)
        } else {
            advanced.clamp(0.0, span)
        };
    }

    /// Target position at the current cursor, `None` when there are no points.
    pub fn position(&self) -> Option<Vec3> {
        spline::evaluate(&self.points, &self.tangents, self.cursor)
    }
}
