//! Proximity queries over anything with a position.
//!
//! Queries are linear scans. Distances are plain Euclidean in world
//! coordinates; the wrap-around only applies to movement.

use evolve_data::{Food, Toxin};

/// Something with a world position.
pub trait Located {
    fn position(&self) -> (f64, f64);
}

impl Located for Food {
    #[inline]
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Located for Toxin {
    #[inline]
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl<T: Located + ?Sized> Located for &T {
    #[inline]
    fn position(&self) -> (f64, f64) {
        (**self).position()
    }
}

#[inline]
#[must_use]
pub fn distance_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    dx * dx + dy * dy
}

/// All items strictly closer than `range` to `origin`, in input order.
pub fn find_nearby<'a, T: Located>(items: &'a [T], origin: (f64, f64), range: f64) -> Vec<&'a T> {
    let range_sq = range * range;
    items
        .iter()
        .filter(|item| distance_sq(origin, item.position()) < range_sq)
        .collect()
}

/// Item closest to `origin`. Ties go to the earliest item.
pub fn closest<T: Located>(items: &[T], origin: (f64, f64)) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let d = distance_sq(origin, item.position());
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((item, d)),
        }
    }
    best.map(|(item, _)| item)
}

/// Arithmetic mean position, or `None` for an empty slice.
pub fn centroid<T: Located>(items: &[T]) -> Option<(f64, f64)> {
    if items.is_empty() {
        return None;
    }
    let (sx, sy) = items.iter().fold((0.0, 0.0), |(sx, sy), item| {
        let (x, y) = item.position();
        (sx + x, sy + y)
    });
    let n = items.len() as f64;
    Some((sx / n, sy / n))
}

/// Wraps a coordinate into `[0, extent)`.
#[inline]
#[must_use]
pub fn wrap(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
