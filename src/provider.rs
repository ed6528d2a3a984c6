/// Maps a normalized life fraction in [0, 1] to a visual value.
///
/// Implemented for keyframe [`Curve`](crate::curve::Curve)s, for [`Constant`],
/// and for any `Fn(f32) -> V`, so hosts can inject plain closures.
pub trait ValueProvider<V> {
    fn value_at(&self, t: f32) -> V;
}

impl<V, F> ValueProvider<V> for F
where
    F: Fn(f32) -> V,
{
    fn value_at(&self, t: f32) -> V {
        self(t)
    }
}

/// Same value for the whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant<V>(pub V);

impl<V: Copy> ValueProvider<V> for Constant<V> {
    fn value_at(&self, _t: f32) -> V {
        self.0
    }
}
