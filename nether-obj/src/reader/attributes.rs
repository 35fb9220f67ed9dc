//! `v`, `vt` and `vn` records

use glam::{Vec2, Vec3};

use crate::error::LineErrorKind;

/// `v x y z [w]`, w is ignored
pub(super) fn parse_position(fields: &[&str]) -> Result<Vec3, LineErrorKind> {
    if fields.len() != 3 && fields.len() != 4 {
        return Err(LineErrorKind::FieldCount {
            keyword: "v",
            expected: "3 or 4",
            found: fields.len(),
        });
    }
    Ok(Vec3::new(
        parse_float(fields[0])?,
        parse_float(fields[1])?,
        parse_float(fields[2])?,
    ))
}

/// `vt s t`
pub(super) fn parse_tex_coord(fields: &[&str]) -> Result<Vec2, LineErrorKind> {
    let [s, t] = fields else {
        return Err(LineErrorKind::FieldCount {
            keyword: "vt",
            expected: "2",
            found: fields.len(),
        });
    };
    Ok(Vec2::new(parse_float(s)?, parse_float(t)?))
}

/// `vn x y z`, stored as written (not normalized)
pub(super) fn parse_normal(fields: &[&str]) -> Result<Vec3, LineErrorKind> {
    let [x, y, z] = fields else {
        return Err(LineErrorKind::FieldCount {
            keyword: "vn",
            expected: "3",
            found: fields.len(),
        });
    };
    Ok(Vec3::new(parse_float(x)?, parse_float(y)?, parse_float(z)?))
}

fn parse_float(text: &str) -> Result<f32, LineErrorKind> {
    text.parse()
        .map_err(|_| LineErrorKind::InvalidNumber(text.to_string()))
}
