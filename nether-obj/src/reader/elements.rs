//! `f` and `l` records

use super::ObjReader;
use crate::buffer::{Attribute, Face, Polyline};
use crate::corner::{AttributeCounts, parse_corner, parse_polyline_index, resolve_corner, resolve_index};
use crate::error::LineErrorKind;
use crate::{MIN_FACE_CORNERS, MIN_POLYLINE_VERTICES};

impl ObjReader {
    pub(super) fn process_face(&mut self, fields: &[&str]) -> Result<(), LineErrorKind> {
        if fields.len() < MIN_FACE_CORNERS {
            return Err(LineErrorKind::FieldCount {
                keyword: "f",
                expected: "at least 3",
                found: fields.len(),
            });
        }

        let counts = AttributeCounts::of(&self.buffer);
        let corners = fields
            .iter()
            .map(|token| parse_corner(token).and_then(|raw| resolve_corner(raw, &counts)))
            .collect::<Result<Vec<_>, _>>()?;

        let face = Face::new(corners, self.materials.active_material());
        if self.options.discard_degenerate_faces && face.has_repeated_vertex() {
            tracing::trace!("Discarding degenerate face on line {}", self.line_number);
            self.discarded_faces += 1;
            return Ok(());
        }

        self.buffer.faces.push(face);
        Ok(())
    }

    pub(super) fn process_polyline(&mut self, fields: &[&str]) -> Result<(), LineErrorKind> {
        if fields.len() < MIN_POLYLINE_VERTICES {
            return Err(LineErrorKind::FieldCount {
                keyword: "l",
                expected: "at least 2",
                found: fields.len(),
            });
        }

        let count = self.buffer.positions.len();
        let vertices = fields
            .iter()
            .map(|token| {
                parse_polyline_index(token)
                    .and_then(|value| resolve_index(value, Attribute::Position, count))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.buffer.polylines.push(Polyline {
            vertices,
            material: self.materials.active_material().to_string(),
        });
        Ok(())
    }
}
