//! Parsed OBJ data
//!
//! All indices stored here are zero-based and were validated against the
//! attribute data known when their line was read.

use core::fmt;
use core::ops::Range;

use glam::{Vec2, Vec3};

use crate::bounds::Aabb;

/// Per-vertex attribute arrays a face corner can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// `v` lines
    Position,
    /// `vt` lines
    TexCoord,
    /// `vn` lines
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Position => write!(f, "vertex"),
            Attribute::TexCoord => write!(f, "texture coordinate"),
            Attribute::Normal => write!(f, "normal"),
        }
    }
}

/// One corner of a face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceCorner {
    /// Index into [`ObjBuffer::positions`]
    pub vertex: u32,
    /// Index into [`ObjBuffer::tex_coords`]
    pub tex_coord: Option<u32>,
    /// Index into [`ObjBuffer::normals`]
    pub normal: Option<u32>,
}

impl FaceCorner {
    /// Corner with a position only
    pub const fn vertex(vertex: u32) -> Self {
        Self {
            vertex,
            tex_coord: None,
            normal: None,
        }
    }
}

/// Polygonal face (`f` line), at least 3 corners
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face {
    pub corners: Vec<FaceCorner>,
    /// Material active when the face was read (may be empty)
    pub material: String,
}

impl Face {
    pub fn new(corners: Vec<FaceCorner>, material: impl Into<String>) -> Self {
        Self {
            corners,
            material: material.into(),
        }
    }

    /// True if two corners reference the same position
    pub fn has_repeated_vertex(&self) -> bool {
        let mut seen = hashbrown::HashSet::with_capacity(self.corners.len());
        !self.corners.iter().all(|corner| seen.insert(corner.vertex))
    }
}

/// Polyline (`l` line), at least 2 vertices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    /// Indices into [`ObjBuffer::positions`]
    pub vertices: Vec<u32>,
    pub material: String,
}

/// Named, contiguous range of faces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub first_face: usize,
    pub face_count: usize,
}

impl Group {
    /// Face index range covered by this group
    pub fn face_range(&self) -> Range<usize> {
        self.first_face..self.first_face.saturating_add(self.face_count)
    }
}

/// Contiguous range of faces read under one `usemtl`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRun {
    pub material: String,
    pub first_face: usize,
    pub face_count: usize,
}

impl MaterialRun {
    pub fn face_range(&self) -> Range<usize> {
        self.first_face..self.first_face.saturating_add(self.face_count)
    }

    /// Coalesce consecutive faces sharing a material into runs
    pub fn from_faces(faces: &[Face]) -> Vec<MaterialRun> {
        let mut runs: Vec<MaterialRun> = Vec::new();
        for (index, face) in faces.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.material == face.material => run.face_count += 1,
                _ => runs.push(MaterialRun {
                    material: face.material.clone(),
                    first_face: index,
                    face_count: 1,
                }),
            }
        }
        runs
    }
}

/// Everything read from one OBJ stream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjBuffer {
    /// `mtllib` file name, if any
    pub material_library: Option<String>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub faces: Vec<Face>,
    pub polylines: Vec<Polyline>,
    /// Disjoint face ranges in file order, none empty
    pub groups: Vec<Group>,
    /// Face ranges per `usemtl` switch, none empty
    pub material_runs: Vec<MaterialRun>,
}

impl ObjBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds of all positions; [`Aabb::EMPTY`] when there are none
    pub fn bounding_box(&self) -> Aabb {
        self.positions
            .iter()
            .fold(Aabb::EMPTY, |bounds, &position| bounds.extended(position))
    }

    /// Number of attribute elements of the given kind
    pub fn attribute_len(&self, attribute: Attribute) -> usize {
        match attribute {
            Attribute::Position => self.positions.len(),
            Attribute::TexCoord => self.tex_coords.len(),
            Attribute::Normal => self.normals.len(),
        }
    }

    /// Find a group by name
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }
}
