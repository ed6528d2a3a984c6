use macroquad::prelude::*;

use crate::error::EmitterError;
use crate::provider::ValueProvider;

/// Linear blend between two values of the same type.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Color {
    fn lerp(self, other: Self, t: f32) -> Self {
        Color::new(
            Lerp::lerp(self.r, other.r, t),
            Lerp::lerp(self.g, other.g, t),
            Lerp::lerp(self.b, other.b, t),
            Lerp::lerp(self.a, other.a, t),
        )
    }
}

/// Piecewise-linear keyframes over [0, 1]. Never empty; stops are kept
/// sorted by time with at most one stop per time.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve<V> {
    stops: Vec<(f32, V)>,
}

impl<V: Lerp> Curve<V> {
    pub fn constant(value: V) -> Self {
        Self {
            stops: vec![(0.0, value)],
        }
    }

    pub fn linear(start: V, end: V) -> Self {
        Self {
            stops: vec![(0.0, start), (1.0, end)],
        }
    }

    /// Build from unordered stops. Later stops win on duplicate times.
    pub fn from_points(
        name: &'static str,
        points: impl IntoIterator<Item = (f32, V)>,
    ) -> Result<Self, EmitterError> {
        let mut curve: Option<Self> = None;
        for (t, value) in points {
            curve = Some(match curve {
                Some(c) => c.with_point(t, value),
                None => Self::constant_at(t, value),
            });
        }
        curve.ok_or(EmitterError::EmptyCurve { name })
    }

    fn constant_at(t: f32, value: V) -> Self {
        Self {
            stops: vec![(t.clamp(0.0, 1.0), value)],
        }
    }

    /// Insert a stop, replacing any existing stop at the same time.
    pub fn with_point(mut self, t: f32, value: V) -> Self {
        let t = t.clamp(0.0, 1.0);
        let idx = self.stops.partition_point(|(st, _)| *st < t);
        match self.stops.get_mut(idx) {
            Some(stop) if stop.0 == t => stop.1 = value,
            _ => self.stops.insert(idx, (t, value)),
        }
        self
    }

    pub fn stops(&self) -> &[(f32, V)] {
        &self.stops
    }

    pub fn value_at(&self, t: f32) -> V {
        let t = t.clamp(0.0, 1.0);
        let idx = self.stops.partition_point(|(st, _)| *st <= t);
        if idx == 0 {
            return self.stops[0].1;
        }
        if idx == self.stops.len() {
            return self.stops[idx - 1].1;
        }
        let (t0, a) = self.stops[idx - 1];
        let (t1, b) = self.stops[idx];
        Lerp::lerp(a, b, (t - t0) / (t1 - t0))
    }
}

impl<V: Lerp> ValueProvider<V> for Curve<V> {
    fn value_at(&self, t: f32) -> V {
        Curve::value_at(self, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn interpolates_between_neighbouring_stops() {
        let curve = Curve::constant(0.0f32)
            .with_point(0.25, 4.0)
            .with_point(0.5, 1.0)
            .with_point(0.75, 5.0)
            .with_point(1.0, 0.0);

        assert!(approx(curve.value_at(0.0), 0.0));
        assert!(approx(curve.value_at(0.125), 2.0));
        assert!(approx(curve.value_at(0.25), 4.0));
        assert!(approx(curve.value_at(0.625), 3.0));
        assert!(approx(curve.value_at(1.0), 0.0));
    }

    #[test]
    fn holds_end_values_outside_the_stops() {
        let curve = Curve::from_points("scale", [(0.8, 2.0f32), (0.2, 1.0)]).unwrap();
        assert_eq!(curve.stops().len(), 2);
        assert!(approx(curve.value_at(0.0), 1.0));
        assert!(approx(curve.value_at(0.5), 1.5));
        assert!(approx(curve.value_at(1.0), 2.0));
        assert!(approx(curve.value_at(7.0), 2.0));
    }

    #[test]
    fn duplicate_time_replaces_existing_stop() {
        let curve = Curve::linear(0.0f32, 1.0).with_point(1.0, 3.0);
        assert_eq!(curve.stops().len(), 2);
        assert!(approx(curve.value_at(1.0), 3.0));
    }

    #[test]
    fn empty_point_list_is_rejected() {
        let result = Curve::<f32>::from_points("opacity", Vec::new());
        assert!(matches!(
            result,
            Err(EmitterError::EmptyCurve { name: "opacity" })
        ));
    }

    #[test]
    fn vector_curve_interpolates_componentwise() {
        let path = Curve::linear(Vec2::ZERO, vec2(8.0, -4.0)).with_point(0.5, vec2(2.0, 2.0));
        assert_eq!(path.value_at(0.25), vec2(1.0, 1.0));
        assert_eq!(path.value_at(0.75), vec2(5.0, -1.0));
    }

    #[test]
    fn color_gradient_blends_channels() {
        let gradient = Curve::linear(BLUE, RED);
        let mid = gradient.value_at(0.5);
        assert!(approx(mid.r, (BLUE.r + RED.r) * 0.5));
        assert!(approx(mid.g, (BLUE.g + RED.g) * 0.5));
        assert!(approx(mid.b, (BLUE.b + RED.b) * 0.5));
        assert!(approx(mid.a, 1.0));
    }
}
