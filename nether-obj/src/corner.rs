//! Face corner tokens and index resolution
//!
//! A corner token has one of four shapes:
//!
//! ```text
//! v          vertex only
//! v/vt       vertex + texture coordinate
//! v//vn      vertex + normal
//! v/vt/vn    vertex + texture coordinate + normal
//! ```
//!
//! Each index is an optionally negative decimal integer. Positive values are
//! 1-based, negative values count back from the end of the attribute data
//! read so far, and zero is rejected.

use crate::buffer::{Attribute, FaceCorner, ObjBuffer};
use crate::error::LineErrorKind;

/// Corner indices exactly as written in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawCorner {
    pub vertex: i64,
    pub tex_coord: Option<i64>,
    pub normal: Option<i64>,
}

/// Attribute counts at the start of the line being processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AttributeCounts {
    pub positions: usize,
    pub tex_coords: usize,
    pub normals: usize,
}

impl AttributeCounts {
    pub fn of(buffer: &ObjBuffer) -> Self {
        Self {
            positions: buffer.attribute_len(Attribute::Position),
            tex_coords: buffer.attribute_len(Attribute::TexCoord),
            normals: buffer.attribute_len(Attribute::Normal),
        }
    }

    pub fn get(&self, attribute: Attribute) -> usize {
        match attribute {
            Attribute::Position => self.positions,
            Attribute::TexCoord => self.tex_coords,
            Attribute::Normal => self.normals,
        }
    }
}

/// Classify a corner token into one of the four supported shapes
pub(crate) fn parse_corner(token: &str) -> Result<RawCorner, LineErrorKind> {
    let malformed = || LineErrorKind::MalformedCorner(token.to_string());
    let index = |text: &str| parse_index(text).ok_or_else(malformed);

    let mut parts = token.split('/');
    let vertex = index(parts.next().unwrap_or_default())?;

    let (tex_coord, normal) = match (parts.next(), parts.next(), parts.next()) {
        (None, None, None) => (None, None),
        (Some(tex_coord), None, None) => (Some(index(tex_coord)?), None),
        (Some(""), Some(normal), None) => (None, Some(index(normal)?)),
        (Some(tex_coord), Some(normal), None) => (Some(index(tex_coord)?), Some(index(normal)?)),
        _ => return Err(malformed()),
    };

    Ok(RawCorner {
        vertex,
        tex_coord,
        normal,
    })
}

/// `-?[0-9]+`, nothing else
fn parse_index(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse a polyline vertex token (a bare index)
pub(crate) fn parse_polyline_index(token: &str) -> Result<i64, LineErrorKind> {
    parse_index(token).ok_or_else(|| LineErrorKind::InvalidNumber(token.to_string()))
}

/// Convert a file index to a zero-based one and check it against `count`.
///
/// While `count` is zero the upper bound is not checked, so faces may refer
/// ahead to attribute data a partial stream has not delivered yet. A relative
/// index still needs something to count back from.
pub(crate) fn resolve_index(
    value: i64,
    attribute: Attribute,
    count: usize,
) -> Result<u32, LineErrorKind> {
    let resolved = match value {
        0 => return Err(LineErrorKind::ZeroIndex(attribute)),
        v if v > 0 => v - 1,
        v => count as i64 + v,
    };

    let out_of_range = || LineErrorKind::IndexOutOfRange {
        attribute,
        index: resolved,
        len: count,
    };

    if resolved < 0 || (count > 0 && resolved >= count as i64) {
        return Err(out_of_range());
    }
    u32::try_from(resolved).map_err(|_| out_of_range())
}

/// Resolve every index of a corner against the counts before this line
pub(crate) fn resolve_corner(
    raw: RawCorner,
    counts: &AttributeCounts,
) -> Result<FaceCorner, LineErrorKind> {
    let resolve = |value: i64, attribute: Attribute| {
        resolve_index(value, attribute, counts.get(attribute))
    };

    Ok(FaceCorner {
        vertex: resolve(raw.vertex, Attribute::Position)?,
        tex_coord: raw
            .tex_coord
            .map(|value| resolve(value, Attribute::TexCoord))
            .transpose()?,
        normal: raw
            .normal
            .map(|value| resolve(value, Attribute::Normal))
            .transpose()?,
    })
}
