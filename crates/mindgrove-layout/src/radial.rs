//! Radial tree: children circle their parent at evenly spaced angles.
//!
//! Angles are in degrees, 0 at 12 o'clock and increasing clockwise. The ring radius grows by
//! [`LayoutOptions::radius_increment`] per level. Grandchildren share a narrower fan centred on
//! their parent's angle, capped at [`MAX_CHILD_SPREAD`].
//!
//! When the anchor is a root, each first-level child takes the side of the half it lands in
//! (right for `0..=180`, left beyond) and its subtree inherits that side. Under a non-root
//! anchor every placed node keeps the anchor's side.

use mindgrove_core::{Node, Point, Side};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::forest::{Placement, Placements};
use crate::options::LayoutOptions;

pub const MAX_CHILD_SPREAD: f64 = 120.0;

/// Angle of the `index`-th of `count` siblings fanned over `spread` degrees from `start`.
pub fn child_angle(index: usize, count: usize, start: f64, spread: f64) -> f64 {
    if count == 1 {
        return start;
    }
    let step = spread / count as f64;
    start + index as f64 * step + step / 2.0
}

/// Screen-space offset (y down) of a point `radius` away at `degrees`.
pub fn angle_to_offset(degrees: f64, radius: f64) -> Point {
    let math = -degrees.to_radians() + std::f64::consts::FRAC_PI_2;
    Point::new(math.cos() * radius, -math.sin() * radius)
}

pub fn side_from_angle(degrees: f64) -> Side {
    if degrees.rem_euclid(360.0) > 180.0 {
        Side::Left
    } else {
        Side::Right
    }
}

struct Ring<'a> {
    children: &'a FxHashMap<&'a str, Vec<&'a Node>>,
    options: &'a LayoutOptions,
    visited: &'a mut FxHashSet<String>,
    out: Placements,
}

impl Ring<'_> {
    fn place(
        &mut self,
        parent_id: &str,
        center: Point,
        level: u32,
        start: f64,
        spread: f64,
        inherited: Option<Side>,
    ) -> Result<()> {
        let Some(kids) = self.children.get(parent_id) else {
            return Ok(());
        };
        let kids: Vec<&Node> = kids
            .iter()
            .copied()
            .filter(|k| !self.visited.contains(&k.id))
            .collect();
        if kids.is_empty() {
            return Ok(());
        }
        for kid in &kids {
            self.visited.insert(kid.id.clone());
        }

        let radius = self.options.base_radius + level as f64 * self.options.radius_increment;
        let count = kids.len();
        let child_spread = (spread / count as f64 * 1.5).min(MAX_CHILD_SPREAD);
        for (i, kid) in kids.into_iter().enumerate() {
            let angle = child_angle(i, count, start, spread);
            let offset = angle_to_offset(angle, radius);
            let dims = self.options.dimensions_of(kid);
            let position = Point::new(
                center.x + offset.x - dims.width / 2.0,
                center.y + offset.y - dims.height / 2.0,
            );
            if !position.is_finite() {
                return Err(Error::NonFinitePosition { id: kid.id.clone() });
            }
            let side = inherited.unwrap_or_else(|| side_from_angle(angle));
            self.out.insert(
                kid.id.clone(),
                Placement {
                    position,
                    side: Some(side),
                },
            );

            let kid_center = Point::new(center.x + offset.x, center.y + offset.y);
            self.place(
                &kid.id,
                kid_center,
                level + 1,
                angle - child_spread / 2.0,
                child_spread,
                Some(side),
            )?;
        }
        Ok(())
    }
}

pub fn layout_tree(
    anchor: &Node,
    children: &FxHashMap<&str, Vec<&Node>>,
    options: &LayoutOptions,
    visited: &mut FxHashSet<String>,
) -> Result<Placements> {
    if !anchor.position.is_finite() {
        return Err(Error::NonFinitePosition {
            id: anchor.id.clone(),
        });
    }
    visited.insert(anchor.id.clone());
    let dims = options.dimensions_of(anchor);
    let center = anchor.position.offset(dims.width / 2.0, dims.height / 2.0);
    let inherited = (!anchor.is_root()).then(|| anchor.side());

    let mut ring = Ring {
        children,
        options,
        visited,
        out: Placements::default(),
    };
    ring.place(&anchor.id, center, 1, 0.0, 360.0, inherited)?;
    Ok(ring.out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn siblings_split_the_fan_evenly() {
        assert_eq!(child_angle(0, 1, 30.0, 360.0), 30.0);
        assert_eq!(child_angle(0, 4, 0.0, 360.0), 45.0);
        assert_eq!(child_angle(3, 4, 0.0, 360.0), 315.0);
    }

    #[test]
    fn zero_degrees_points_up_and_ninety_points_right() {
        let up = angle_to_offset(0.0, 100.0);
        assert!(close(up.x, 0.0) && close(up.y, -100.0));
        let right = angle_to_offset(90.0, 100.0);
        assert!(close(right.x, 100.0) && close(right.y, 0.0));
    }

    #[test]
    fn the_right_half_includes_both_poles() {
        assert_eq!(side_from_angle(0.0), Side::Right);
        assert_eq!(side_from_angle(180.0), Side::Right);
        assert_eq!(side_from_angle(181.0), Side::Left);
        assert_eq!(side_from_angle(-10.0), Side::Left);
    }
}
