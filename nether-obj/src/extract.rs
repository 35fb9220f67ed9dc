//! Carving groups out into standalone buffers
//!
//! Positions and normals referenced by the extracted faces are copied into
//! the new buffer in the order they are first seen, and the faces are
//! re-indexed to match. Texture coordinates are not compacted: the source
//! array is copied whole and texture-coordinate indices are kept as is.

use core::ops::Range;

use glam::Vec3;

use crate::buffer::{Attribute, Face, FaceCorner, Group, MaterialRun, ObjBuffer};
use crate::error::ExtractError;

/// Old-to-new index map for one attribute array
struct Compactor<'a> {
    attribute: Attribute,
    source: &'a [Vec3],
    mapping: Vec<Option<u32>>,
    values: Vec<Vec3>,
}

impl<'a> Compactor<'a> {
    fn new(attribute: Attribute, source: &'a [Vec3]) -> Self {
        Self {
            attribute,
            source,
            mapping: vec![None; source.len()],
            values: Vec::new(),
        }
    }

    fn remap(&mut self, index: u32, face: usize) -> Result<u32, ExtractError> {
        let slot = self
            .mapping
            .get_mut(index as usize)
            .ok_or(ExtractError::MissingAttribute {
                face,
                attribute: self.attribute,
                index,
                len: self.source.len(),
            })?;

        if let Some(new_index) = *slot {
            return Ok(new_index);
        }
        let new_index = self.values.len() as u32;
        self.values.push(self.source[index as usize]);
        *slot = Some(new_index);
        Ok(new_index)
    }
}

/// Copy the faces in `faces` into a new buffer holding a single group
/// called `name`
///
/// # Errors
/// * [`ExtractError::FaceRangeOutOfBounds`] if the range is reversed or
///   runs past the end of the source faces
/// * [`ExtractError::MissingAttribute`] if a face refers to a position or
///   normal the source never received
pub fn extract_range(
    source: &ObjBuffer,
    name: &str,
    faces: Range<usize>,
) -> Result<ObjBuffer, ExtractError> {
    let Some(source_faces) = source.faces.get(faces.clone()) else {
        return Err(ExtractError::FaceRangeOutOfBounds {
            start: faces.start,
            end: faces.end,
            face_count: source.faces.len(),
        });
    };

    let mut positions = Compactor::new(Attribute::Position, &source.positions);
    let mut normals = Compactor::new(Attribute::Normal, &source.normals);
    let mut extracted = Vec::with_capacity(source_faces.len());

    for (face_index, face) in faces.clone().zip(source_faces) {
        let corners = face
            .corners
            .iter()
            .map(|corner| {
                Ok(FaceCorner {
                    vertex: positions.remap(corner.vertex, face_index)?,
                    tex_coord: corner.tex_coord,
                    normal: corner
                        .normal
                        .map(|normal| normals.remap(normal, face_index))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, ExtractError>>()?;
        extracted.push(Face::new(corners, face.material.as_str()));
    }

    tracing::debug!(
        "Extracted '{}': {} faces, {} of {} positions, {} of {} normals",
        name,
        extracted.len(),
        positions.values.len(),
        source.positions.len(),
        normals.values.len(),
        source.normals.len()
    );

    let groups = if extracted.is_empty() {
        Vec::new()
    } else {
        vec![Group {
            name: name.to_string(),
            first_face: 0,
            face_count: extracted.len(),
        }]
    };

    Ok(ObjBuffer {
        material_library: source.material_library.clone(),
        positions: positions.values,
        normals: normals.values,
        tex_coords: source.tex_coords.clone(),
        material_runs: MaterialRun::from_faces(&extracted),
        faces: extracted,
        polylines: Vec::new(),
        groups,
    })
}

/// Extract the faces of `group` into a new buffer
pub fn extract_group(source: &ObjBuffer, group: &Group) -> Result<ObjBuffer, ExtractError> {
    extract_range(source, &group.name, group.face_range())
}

impl ObjBuffer {
    /// One standalone buffer per group, in group order
    pub fn split_groups(&self) -> Result<Vec<ObjBuffer>, ExtractError> {
        self.groups
            .iter()
            .map(|group| extract_group(self, group))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Face whose corners use the same index for position and normal
    fn face(material: &str, indices: &[u32]) -> Face {
        let corners = indices
            .iter()
            .map(|&i| FaceCorner {
                vertex: i,
                tex_coord: None,
                normal: Some(i),
            })
            .collect();
        Face::new(corners, material)
    }

    fn ramp(count: u32, scale: f32) -> Vec<Vec3> {
        (0..count).map(|i| Vec3::splat(i as f32 * scale)).collect()
    }

    fn group(name: &str, first_face: usize, face_count: usize) -> Group {
        Group {
            name: name.to_string(),
            first_face,
            face_count,
        }
    }

    fn two_group_buffer() -> ObjBuffer {
        ObjBuffer {
            material_library: Some("materials.mtl".to_string()),
            positions: ramp(8, 1.0),
            normals: ramp(8, -1.0),
            faces: vec![
                face("Material 1", &[0, 2, 4]),
                face("Material 1", &[4, 2, 6]),
                face("Material 2", &[1, 3, 5]),
                face("Material 2", &[5, 3, 4]),
                face("Material 3", &[5, 7, 2]),
                face("Material 3", &[7, 5, 4]),
            ],
            groups: vec![group("Group 1", 0, 4), group("Group 2", 4, 2)],
            ..ObjBuffer::default()
        }
    }

    #[test]
    fn test_empty_range() {
        let source = ObjBuffer {
            material_library: Some("materials.mtl".to_string()),
            ..ObjBuffer::default()
        };
        let buffer = extract_range(&source, "empty", 0..0).unwrap();

        assert_eq!(buffer.material_library.as_deref(), Some("materials.mtl"));
        assert!(buffer.faces.is_empty());
        assert!(buffer.positions.is_empty());
        assert!(buffer.normals.is_empty());
        assert!(buffer.groups.is_empty());
    }

    #[test]
    fn test_single_face() {
        let source = ObjBuffer {
            positions: ramp(3, 1.0),
            normals: ramp(3, -1.0),
            faces: vec![face("mat", &[0, 1, 2])],
            groups: vec![group("only", 0, 1)],
            ..ObjBuffer::default()
        };
        let buffer = extract_group(&source, &source.groups[0]).unwrap();

        assert_eq!(buffer.groups, vec![group("only", 0, 1)]);
        assert_eq!(buffer.faces.len(), 1);
        assert_eq!(buffer.positions.len(), 3);
        assert_eq!(buffer.normals.len(), 3);
    }

    #[test]
    fn test_first_seen_order() {
        let source = two_group_buffer();
        let buffer = extract_group(&source, &source.groups[1]).unwrap();

        let expected = [5.0, 7.0, 2.0, 4.0];
        assert_eq!(buffer.positions, expected.map(Vec3::splat).to_vec());
        assert_eq!(buffer.normals, expected.map(|v| Vec3::splat(-v)).to_vec());
        assert_eq!(
            buffer.faces,
            vec![
                face("Material 3", &[0, 1, 2]),
                face("Material 3", &[1, 0, 3]),
            ]
        );
        assert_eq!(buffer.groups, vec![group("Group 2", 0, 2)]);
        assert_eq!(buffer.material_library.as_deref(), Some("materials.mtl"));
    }

    #[test]
    fn test_materials_copied_per_face() {
        let mut source = two_group_buffer();
        source.faces[1].material = "Other".to_string();
        let buffer = extract_range(&source, "Group 1", 0..4).unwrap();

        let materials: Vec<&str> = buffer.faces.iter().map(|f| f.material.as_str()).collect();
        assert_eq!(materials, vec!["Material 1", "Other", "Material 2", "Material 2"]);

        let runs: Vec<(&str, usize)> = buffer
            .material_runs
            .iter()
            .map(|run| (run.material.as_str(), run.face_count))
            .collect();
        assert_eq!(runs, vec![("Material 1", 1), ("Other", 1), ("Material 2", 2)]);
    }

    #[test]
    fn test_referenced_vertex_count() {
        let source = two_group_buffer();
        for group in &source.groups {
            let buffer = extract_group(&source, group).unwrap();
            let distinct: hashbrown::HashSet<u32> = source.faces[group.face_range()]
                .iter()
                .flat_map(|f| f.corners.iter().map(|c| c.vertex))
                .collect();
            assert_eq!(buffer.positions.len(), distinct.len());
        }
    }

    #[test]
    fn test_tex_coords_not_compacted() {
        let mut source = two_group_buffer();
        source.tex_coords = vec![Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE];
        for corner in &mut source.faces[4].corners {
            corner.tex_coord = Some(3);
        }

        let buffer = extract_group(&source, &source.groups[1]).unwrap();

        // Positions shrink to 4 but the texture coordinates are copied whole,
        // with the same indices as in the source
        assert_eq!(buffer.tex_coords, source.tex_coords);
        assert_eq!(buffer.faces[0].corners[0].tex_coord, Some(3));
        assert_eq!(buffer.faces[1].corners[0].tex_coord, None);
    }

    #[test]
    fn test_missing_normals_stay_missing() {
        let source = ObjBuffer {
            positions: ramp(4, 1.0),
            faces: vec![Face::new((1..4).map(FaceCorner::vertex).collect(), "")],
            groups: vec![group("bare", 0, 1)],
            ..ObjBuffer::default()
        };
        let buffer = extract_group(&source, &source.groups[0]).unwrap();

        assert!(buffer.normals.is_empty());
        assert_eq!(buffer.positions, ramp(4, 1.0)[1..].to_vec());
        assert_eq!(buffer.faces[0].corners, (0..3).map(FaceCorner::vertex).collect::<Vec<_>>());
    }

    #[test]
    fn test_range_out_of_bounds() {
        let source = two_group_buffer();
        assert_eq!(
            extract_range(&source, "past end", 4..7),
            Err(ExtractError::FaceRangeOutOfBounds {
                start: 4,
                end: 7,
                face_count: 6
            })
        );
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 3..1;
        assert!(extract_range(&source, "reversed", reversed).is_err());
    }

    #[test]
    fn test_missing_attribute() {
        // Forward references accepted while reading an incomplete stream
        let source = ObjBuffer {
            positions: ramp(2, 1.0),
            faces: vec![face("", &[0, 1, 5])],
            ..ObjBuffer::default()
        };
        assert_eq!(
            extract_range(&source, "broken", 0..1),
            Err(ExtractError::MissingAttribute {
                face: 0,
                attribute: Attribute::Normal,
                index: 0,
                len: 0
            })
        );
    }

    #[test]
    fn test_split_groups() {
        let source = two_group_buffer();
        let parts = source.split_groups().unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].faces.len(), 4);
        assert_eq!(parts[0].groups[0].name, "Group 1");
        assert_eq!(parts[1].faces.len(), 2);
        assert_eq!(parts[1].positions.len(), 4);
        assert_eq!(source, two_group_buffer());
    }
}
