//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Aabb;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(aabb: &Aabb, color: [f32; 4]) -> Vec<Vertex> {
    let (min, max) = (aabb.min, aabb.max);
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a square of side `size` rotated by `angle` about its centre
pub fn rotated_square(center: Vec2, size: f32, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = size / 2.0;
    let rot = Vec2::from_angle(angle);
    let corner = |x: f32, y: f32| center + rot.rotate(Vec2::new(x, y));

    let bl = corner(-half, -half);
    let br = corner(half, -half);
    let tl = corner(-half, half);
    let tr = corner(half, half);

    vec![
        Vertex::new(bl.x, bl.y, color),
        Vertex::new(br.x, br.y, color),
        Vertex::new(tl.x, tl.y, color),
        Vertex::new(tl.x, tl.y, color),
        Vertex::new(br.x, br.y, color),
        Vertex::new(tr.x, tr.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let aabb = Aabb::new(Vec2::new(-1.0, -2.0), Vec2::new(3.0, 4.0));
        let verts = rect(&aabb, [1.0; 4]);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().any(|v| v.position == [-1.0, -2.0]));
        assert!(verts.iter().any(|v| v.position == [3.0, 4.0]));
    }

    #[test]
    fn test_unrotated_square_is_axis_aligned() {
        let verts = rotated_square(Vec2::new(1.0, 1.0), 2.0, 0.0, [1.0; 4]);
        for v in &verts {
            assert!((v.position[0] - 1.0).abs() <= 1.0 + 1e-5);
            assert!((v.position[1] - 1.0).abs() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_rotation_preserves_distance() {
        let verts = rotated_square(Vec2::ZERO, 2.0, 0.7, [1.0; 4]);
        for v in &verts {
            let d = Vec2::from(v.position).length();
            assert!((d - 2f32.sqrt()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 1.0, [1.0; 4], 16).len(), 48);
    }
}
