//! OBJ text writer
//!
//! Output layout:
//!
//! ```text
//! # header with element counts
//! mtllib <library>          (if set)
//! v / vn / vt records
//! g <name>                  (per group)
//! usemtl <material>         (whenever the material changes)
//! f ...
//! l ...                     (polylines, after all groups)
//! ```
//!
//! Indices are written 1-based using the most specific corner form the
//! corner's indices allow.

use core::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::buffer::{Face, FaceCorner, ObjBuffer};

/// Write `buffer` as OBJ text
pub fn write_obj<W: Write>(buffer: &ObjBuffer, mut writer: W) -> io::Result<()> {
    write!(writer, "{buffer}")
}

/// Write `buffer` to a file, replacing it if it exists
pub fn save_obj(path: impl AsRef<Path>, buffer: &ObjBuffer) -> io::Result<()> {
    let path = path.as_ref();
    tracing::debug!("Saving OBJ: {:?}", path);
    let mut writer = BufWriter::new(File::create(path)?);
    write_obj(buffer, &mut writer)?;
    writer.flush()
}

impl ObjBuffer {
    /// OBJ text for this buffer
    pub fn to_obj_string(&self) -> String {
        self.to_string()
    }
}

/// Emits `usemtl` only when the material actually changes
struct MaterialSwitch<'a> {
    current: &'a str,
}

impl<'a> MaterialSwitch<'a> {
    fn update(&mut self, f: &mut fmt::Formatter<'_>, material: &'a str) -> fmt::Result {
        // An empty name cannot be written back, so the previous one stays active
        if material.is_empty() || material == self.current {
            return Ok(());
        }
        self.current = material;
        writeln!(f, "usemtl {material}")
    }
}

struct Corner(FaceCorner);

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let FaceCorner {
            vertex,
            tex_coord,
            normal,
        } = self.0;
        match (tex_coord, normal) {
            (Some(t), Some(n)) => write!(f, "{}/{}/{}", vertex + 1, t + 1, n + 1),
            (None, Some(n)) => write!(f, "{}//{}", vertex + 1, n + 1),
            (Some(t), None) => write!(f, "{}/{}", vertex + 1, t + 1),
            (None, None) => write!(f, "{}", vertex + 1),
        }
    }
}

fn write_face(f: &mut fmt::Formatter<'_>, face: &Face) -> fmt::Result {
    write!(f, "f")?;
    for corner in &face.corners {
        write!(f, " {}", Corner(*corner))?;
    }
    writeln!(f)
}

/// The whole buffer as OBJ text.
///
/// Faces are written group by group. A buffer without groups has all of its
/// faces written without a `g` record.
impl fmt::Display for ObjBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Exported by nether-obj")?;
        writeln!(
            f,
            "# {} vertices, {} normals, {} faces",
            self.positions.len(),
            self.normals.len(),
            self.faces.len()
        )?;

        if let Some(library) = &self.material_library {
            writeln!(f, "mtllib {library}")?;
        }

        for v in &self.positions {
            writeln!(f, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for n in &self.normals {
            writeln!(f, "vn {} {} {}", n.x, n.y, n.z)?;
        }
        for t in &self.tex_coords {
            writeln!(f, "vt {} {}", t.x, t.y)?;
        }

        let mut materials = MaterialSwitch { current: "" };
        if self.groups.is_empty() {
            for face in &self.faces {
                materials.update(f, &face.material)?;
                write_face(f, face)?;
            }
        }
        for group in &self.groups {
            writeln!(f, "g {}", group.name)?;
            for face in self.faces.get(group.face_range()).unwrap_or_default() {
                materials.update(f, &face.material)?;
                write_face(f, face)?;
            }
        }

        for line in &self.polylines {
            materials.update(f, &line.material)?;
            write!(f, "l")?;
            for vertex in &line.vertices {
                write!(f, " {}", vertex + 1)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
