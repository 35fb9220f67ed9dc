//! Ear-clipping triangulation of polygonal faces
//!
//! The polygon is projected onto the coordinate plane most closely facing its
//! first non-degenerate corner, then ears are clipped off a shrinking ring of
//! corners. The ring is swept at most [`TRIANGULATE_MAX_SWEEPS`] times; on
//! self-intersecting or otherwise unresolvable input whatever is left after
//! the last sweep is dropped.

use glam::{Vec2, Vec3};

use crate::buffer::{Face, FaceCorner, Group, MaterialRun, ObjBuffer};
use crate::{DEGENERATE_EPSILON, TRIANGULATE_MAX_SWEEPS};

/// Two of the three coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Projection {
    u: usize,
    v: usize,
}

impl Projection {
    const YZ: Self = Self { u: 1, v: 2 };
    const XY: Self = Self { u: 0, v: 1 };
    const XZ: Self = Self { u: 0, v: 2 };

    /// Pick the plane from the first corner whose edges are not collinear,
    /// dropping the axis with the largest normal component. Ties drop x
    /// before z before y. Defaults to YZ if every corner is degenerate.
    fn choose(corners: &[FaceCorner], positions: &[Vec3]) -> Self {
        let n = corners.len();
        for k in 0..n {
            let (Some(a), Some(b), Some(c)) = (
                position(positions, corners[k]),
                position(positions, corners[(k + 1) % n]),
                position(positions, corners[(k + 2) % n]),
            ) else {
                continue;
            };

            let normal = (b - a).cross(c - b).abs();
            if normal.max_element() > DEGENERATE_EPSILON {
                return if normal.x >= normal.y && normal.x >= normal.z {
                    Self::YZ
                } else if normal.z >= normal.y {
                    Self::XY
                } else {
                    Self::XZ
                };
            }
        }
        Self::YZ
    }

    fn project(self, p: Vec3) -> Vec2 {
        Vec2::new(p[self.u], p[self.v])
    }
}

fn position(positions: &[Vec3], corner: FaceCorner) -> Option<Vec3> {
    positions.get(corner.vertex as usize).copied()
}

/// Shoelace area of the projected ring, positive for counter-clockwise
fn signed_area(corners: &[FaceCorner], positions: &[Vec3], projection: Projection) -> f32 {
    let n = corners.len();
    let mut area = 0.0;
    for k in 0..n {
        let (Some(a), Some(b)) = (
            position(positions, corners[k]),
            position(positions, corners[(k + 1) % n]),
        ) else {
            continue;
        };
        area += projection.project(a).perp_dot(projection.project(b)) * 0.5;
    }
    area
}

/// Even-odd crossing test
fn point_in_triangle(triangle: &[Vec2; 3], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = 2;
    for (i, a) in triangle.iter().enumerate() {
        let b = triangle[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Split a face into triangles.
///
/// Triangles keep the face's material and each corner keeps its texture
/// coordinate and normal indices. A triangle is returned as is; a face with
/// fewer than 3 corners yields nothing. Corners whose position index is
/// outside `positions` project to the origin.
pub fn triangulate(face: &Face, positions: &[Vec3]) -> Vec<Face> {
    let n = face.corners.len();
    if n < 3 {
        return Vec::new();
    }
    if n == 3 {
        return vec![face.clone()];
    }

    let projection = Projection::choose(&face.corners, positions);
    let area = signed_area(&face.corners, positions, projection);
    let projected = |corner: FaceCorner| position(positions, corner).map(|p| projection.project(p));

    let mut ring = face.corners.clone();
    let mut triangles = Vec::with_capacity(n - 2);
    let mut guess = 0;
    let mut sweeps = TRIANGULATE_MAX_SWEEPS;

    while ring.len() > 3 {
        let len = ring.len();
        if guess >= len {
            guess -= len;
            sweeps -= 1;
            if sweeps == 0 {
                break;
            }
        }

        let ear = [ring[guess], ring[(guess + 1) % len], ring[(guess + 2) % len]];
        let points = ear.map(|corner| projected(corner).unwrap_or(Vec2::ZERO));

        // Reflex corner: winding disagrees with the whole polygon
        let cross = (points[1] - points[0]).perp_dot(points[2] - points[1]);
        if cross * area < 0.0 {
            guess += 1;
            continue;
        }

        let occluded = (3..len)
            .filter_map(|offset| projected(ring[(guess + offset) % len]))
            .any(|p| point_in_triangle(&points, p));
        if occluded {
            guess += 1;
            continue;
        }

        triangles.push(Face::new(ear.to_vec(), face.material.as_str()));
        ring.remove((guess + 1) % len);
    }

    if ring.len() == 3 {
        triangles.push(Face::new(ring, face.material.as_str()));
    } else {
        tracing::warn!(
            "Triangulation gave up on a {}-corner face, dropping {} corners",
            n,
            ring.len()
        );
    }

    triangles
}

impl ObjBuffer {
    /// Copy of this buffer with every face triangulated.
    ///
    /// Groups and material runs are re-indexed to cover the triangles of
    /// their original faces; any left without triangles are dropped. Ranges
    /// reaching past the last face are cut short at it.
    pub fn triangulated(&self) -> ObjBuffer {
        let mut faces = Vec::with_capacity(self.faces.len());
        // first_triangle[i] is the index of face i's first triangle
        let mut first_triangle = Vec::with_capacity(self.faces.len() + 1);
        for face in &self.faces {
            first_triangle.push(faces.len());
            faces.extend(triangulate(face, &self.positions));
        }
        first_triangle.push(faces.len());

        let last = first_triangle.len() - 1;
        let remap = |first_face: usize, face_count: usize| {
            let end_face = first_face.saturating_add(face_count);
            if end_face > last {
                tracing::warn!(
                    "Range {}..{} reaches past the last face ({}), cutting it short",
                    first_face,
                    end_face,
                    last
                );
            }
            let start = *first_triangle.get(first_face.min(last))?;
            let end = *first_triangle.get(end_face.min(last))?;
            (end > start).then_some((start, end - start))
        };

        let groups = self
            .groups
            .iter()
            .filter_map(|group| {
                remap(group.first_face, group.face_count).map(|(first_face, face_count)| Group {
                    name: group.name.clone(),
                    first_face,
                    face_count,
                })
            })
            .collect();

        let material_runs = self
            .material_runs
            .iter()
            .filter_map(|run| {
                remap(run.first_face, run.face_count).map(|(first_face, face_count)| {
                    MaterialRun {
                        material: run.material.clone(),
                        first_face,
                        face_count,
                    }
                })
            })
            .collect();

        tracing::debug!(
            "Triangulated {} faces into {} triangles",
            self.faces.len(),
            faces.len()
        );

        ObjBuffer {
            material_library: self.material_library.clone(),
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            tex_coords: self.tex_coords.clone(),
            faces,
            polylines: self.polylines.clone(),
            groups,
            material_runs,
        }
    }
}
