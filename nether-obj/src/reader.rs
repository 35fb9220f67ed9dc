//! OBJ text reader
//!
//! Lines are processed strictly in order. Everything from the first `#` is a
//! comment; the first whitespace-separated field selects the handler
//! (case-insensitively). The first failing line aborts the read.

mod attributes;
mod elements;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::buffer::ObjBuffer;
use crate::error::{LineErrorKind, ObjError};
use crate::groups::{GroupTracker, MaterialRunTracker};
use crate::options::ReadOptions;

/// Parse OBJ text with default options
pub fn parse_obj(text: &str) -> Result<ObjBuffer, ObjError> {
    read_obj(text.as_bytes(), &ReadOptions::default())
}

/// Read an OBJ stream to the end
///
/// # Errors
/// * [`ObjError::Line`] for the first line that fails to process
/// * [`ObjError::Io`] if the stream fails (including invalid UTF-8)
pub fn read_obj<R: BufRead>(reader: R, options: &ReadOptions) -> Result<ObjBuffer, ObjError> {
    let mut obj_reader = ObjReader::new(options.clone());
    for line in reader.lines() {
        obj_reader.process_line(&line?)?;
    }
    Ok(obj_reader.finish())
}

/// Open and read an OBJ file
pub fn load_obj(path: impl AsRef<Path>, options: &ReadOptions) -> Result<ObjBuffer, ObjError> {
    let path = path.as_ref();
    tracing::debug!("Loading OBJ: {:?}", path);
    let file = File::open(path)?;
    read_obj(BufReader::new(file), options)
}

/// Parser context: the buffer being filled plus the open group, the active
/// material and the line counter.
///
/// Use [`read_obj`] unless lines arrive one at a time. After an error the
/// reader should be dropped; lines already processed are not rolled back.
#[derive(Debug)]
pub struct ObjReader {
    buffer: ObjBuffer,
    groups: GroupTracker,
    materials: MaterialRunTracker,
    options: ReadOptions,
    line_number: usize,
    discarded_faces: usize,
}

impl ObjReader {
    pub fn new(options: ReadOptions) -> Self {
        Self {
            buffer: ObjBuffer::new(),
            groups: GroupTracker::new(&options.default_group_name),
            materials: MaterialRunTracker::new(),
            options,
            line_number: 0,
            discarded_faces: 0,
        }
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Data read so far (groups and material runs are only final after
    /// [`ObjReader::finish`])
    pub fn buffer(&self) -> &ObjBuffer {
        &self.buffer
    }

    /// Number of lines processed
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Name of the group new faces are added to
    pub fn current_group(&self) -> Option<&str> {
        self.groups.open_name()
    }

    /// Material tagged onto new faces and polylines
    pub fn active_material(&self) -> &str {
        self.materials.active_material()
    }

    /// Faces skipped by [`ReadOptions::discard_degenerate_faces`]
    pub fn discarded_faces(&self) -> usize {
        self.discarded_faces
    }

    /// Process the next line of input
    pub fn process_line(&mut self, line: &str) -> Result<(), ObjError> {
        self.line_number += 1;
        self.dispatch(line).map_err(|kind| ObjError::Line {
            line_number: self.line_number,
            line: line.to_string(),
            kind,
        })
    }

    fn dispatch(&mut self, line: &str) -> Result<(), LineErrorKind> {
        let text = strip_comment(line).trim();
        let mut fields = text.split_whitespace();
        let Some(keyword) = fields.next() else {
            return Ok(());
        };
        let fields: Vec<&str> = fields.collect();
        // Names may contain spaces, so they take the rest of the line
        let rest = text[keyword.len()..].trim();

        match keyword.to_ascii_lowercase().as_str() {
            "v" => {
                let position = attributes::parse_position(&fields)?;
                self.buffer.positions.push(position);
            }
            "vt" => {
                let tex_coord = attributes::parse_tex_coord(&fields)?;
                self.buffer.tex_coords.push(tex_coord);
            }
            "vn" => {
                let normal = attributes::parse_normal(&fields)?;
                self.buffer.normals.push(normal);
            }
            "f" => self.process_face(&fields)?,
            "l" => self.process_polyline(&fields)?,
            "g" => self.groups.start(rest, self.buffer.faces.len()),
            "mtllib" => self.process_material_library(rest)?,
            "usemtl" => self.process_use_material(rest)?,
            "o" | "s" | "vp" => {}
            _ => return Err(LineErrorKind::UnknownKeyword(keyword.to_string())),
        }
        Ok(())
    }

    fn process_material_library(&mut self, name: &str) -> Result<(), LineErrorKind> {
        if let Some(existing) = &self.buffer.material_library {
            return Err(LineErrorKind::DuplicateMaterialLibrary(existing.clone()));
        }
        if name.is_empty() {
            return Err(LineErrorKind::MissingName("mtllib"));
        }
        self.buffer.material_library = Some(name.to_string());
        Ok(())
    }

    fn process_use_material(&mut self, name: &str) -> Result<(), LineErrorKind> {
        if name.is_empty() {
            return Err(LineErrorKind::MissingName("usemtl"));
        }
        self.materials.switch(name, self.buffer.faces.len());
        Ok(())
    }

    /// Close the open group and material run and return the buffer
    pub fn finish(self) -> ObjBuffer {
        let face_count = self.buffer.faces.len();
        let mut buffer = self.buffer;
        buffer.groups = self.groups.finish(face_count);
        buffer.material_runs = self.materials.finish(face_count);

        tracing::debug!(
            "Read OBJ: {} positions, {} normals, {} texcoords, {} faces, {} polylines, {} groups ({} degenerate faces discarded)",
            buffer.positions.len(),
            buffer.normals.len(),
            buffer.tex_coords.len(),
            buffer.faces.len(),
            buffer.polylines.len(),
            buffer.groups.len(),
            self.discarded_faces
        );

        buffer
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
