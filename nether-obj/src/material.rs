//! Wavefront material libraries (`.mtl`)
//!
//! A library is a flat list of `newmtl` blocks, each followed by
//! `key value...` records. Keys are case-sensitive. Unknown keys are skipped
//! so exporter-specific extensions do not break loading.
//!
//! # Supported keys
//!
//! | Key | Field |
//! |-----|-------|
//! | `Ka` `Kd` `Ks` `Ke` `Tf` | colors (3 floats) |
//! | `Ns` | [`Material::shininess`], stored divided by 1000 |
//! | `d` | [`Material::opacity`] |
//! | `illum` | [`Material::illumination`] |
//! | `map_Ka` `map_Kd` `map_Ks` `map_Ke` | texture file names |
//! | `map_d` / `map_opacity` | alpha texture |
//! | `map_bump` / `bump` | bump texture |
//! | `Pr` `Pm` `Ps` `Pc` `Pcr` `aniso` `anisor` | PBR extension scalars |

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use glam::Vec3;
use hashbrown::HashMap;

use crate::buffer::ObjBuffer;

// =============================================================================
// Constants
// =============================================================================

/// `Ns` is scaled into this range on read and back out on write
pub const SHININESS_SCALE: f32 = 1000.0;

pub const DEFAULT_AMBIENT: Vec3 = Vec3::ZERO;
pub const DEFAULT_DIFFUSE: Vec3 = Vec3::splat(0.8);
pub const DEFAULT_SPECULAR: Vec3 = Vec3::ZERO;
pub const DEFAULT_EMISSIVE: Vec3 = Vec3::splat(0.2);
pub const DEFAULT_TRANSMISSION_FILTER: Vec3 = Vec3::ONE;

// =============================================================================
// Errors
// =============================================================================

/// What went wrong on a single `.mtl` line
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MtlErrorKind {
    #[error("'{0}' appears before the first 'newmtl'")]
    DataBeforeMaterial(String),

    #[error("'newmtl' requires a name")]
    MissingName,

    #[error("'{keyword}' expected {expected} values, but got {found}")]
    FieldCount {
        keyword: String,
        expected: usize,
        found: usize,
    },

    #[error("cannot parse '{0}' as a number")]
    InvalidNumber(String),
}

/// Material library reading error
#[derive(Debug, thiserror::Error)]
pub enum MtlError {
    #[error("line {line_number}: {kind} ('{line}')")]
    Line {
        line_number: usize,
        line: String,
        kind: MtlErrorKind,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// =============================================================================
// Data
// =============================================================================

/// One `newmtl` block
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub emissive: Vec3,
    pub transmission_filter: Vec3,
    /// `Ns / 1000`
    pub shininess: f32,
    pub opacity: f32,
    pub illumination: u32,
    pub ambient_texture: Option<String>,
    pub diffuse_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub emissive_texture: Option<String>,
    pub alpha_texture: Option<String>,
    pub bump_texture: Option<String>,
    pub roughness: f32,
    pub metallic: f32,
    pub sheen: f32,
    pub clearcoat_thickness: f32,
    pub clearcoat_roughness: f32,
    pub anisotropy: f32,
    pub anisotropy_rotation: f32,
}

impl Material {
    /// Material with the values a `newmtl` block starts from
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: DEFAULT_AMBIENT,
            diffuse: DEFAULT_DIFFUSE,
            specular: DEFAULT_SPECULAR,
            emissive: DEFAULT_EMISSIVE,
            transmission_filter: DEFAULT_TRANSMISSION_FILTER,
            shininess: 0.0,
            opacity: 1.0,
            illumination: 0,
            ambient_texture: None,
            diffuse_texture: None,
            specular_texture: None,
            emissive_texture: None,
            alpha_texture: None,
            bump_texture: None,
            roughness: 0.0,
            metallic: 0.0,
            sheen: 0.0,
            clearcoat_thickness: 0.0,
            clearcoat_roughness: 0.0,
            anisotropy: 0.0,
            anisotropy_rotation: 0.0,
        }
    }

    /// Apply one `key values...` record. Returns false for unknown keys.
    fn apply(&mut self, keyword: &str, values: &[&str]) -> Result<bool, MtlErrorKind> {
        match keyword {
            "Ka" => self.ambient = parse_color(keyword, values)?,
            "Kd" => self.diffuse = parse_color(keyword, values)?,
            "Ks" => self.specular = parse_color(keyword, values)?,
            "Ke" => {
                // Zero components keep the default glow
                let emissive = parse_color(keyword, values)?;
                self.emissive = Vec3::select(emissive.cmpeq(Vec3::ZERO), self.emissive, emissive);
            }
            "Tf" => self.transmission_filter = parse_color(keyword, values)?,
            "Ns" => self.shininess = parse_scalar(keyword, values)? / SHININESS_SCALE,
            "d" => self.opacity = parse_scalar(keyword, values)?,
            "illum" => {
                let [value] = expect_values(keyword, values)?;
                self.illumination = value
                    .parse()
                    .map_err(|_| MtlErrorKind::InvalidNumber(value.to_string()))?;
            }
            "map_Ka" => self.ambient_texture = texture_name(values),
            "map_Kd" => self.diffuse_texture = texture_name(values),
            "map_Ks" => self.specular_texture = texture_name(values),
            "map_Ke" => self.emissive_texture = texture_name(values),
            "map_d" | "map_opacity" => self.alpha_texture = texture_name(values),
            "map_bump" | "bump" => self.bump_texture = texture_name(values),
            "Pr" => self.roughness = parse_scalar(keyword, values)?,
            "Pm" => self.metallic = parse_scalar(keyword, values)?,
            "Ps" => self.sheen = parse_scalar(keyword, values)?,
            "Pc" => self.clearcoat_thickness = parse_scalar(keyword, values)?,
            "Pcr" => self.clearcoat_roughness = parse_scalar(keyword, values)?,
            "aniso" => self.anisotropy = parse_scalar(keyword, values)?,
            "anisor" => self.anisotropy_rotation = parse_scalar(keyword, values)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn expect_values<'a, const N: usize>(
    keyword: &str,
    values: &[&'a str],
) -> Result<[&'a str; N], MtlErrorKind> {
    <[&str; N]>::try_from(values).map_err(|_| MtlErrorKind::FieldCount {
        keyword: keyword.to_string(),
        expected: N,
        found: values.len(),
    })
}

fn parse_float(text: &str) -> Result<f32, MtlErrorKind> {
    text.parse()
        .map_err(|_| MtlErrorKind::InvalidNumber(text.to_string()))
}

fn parse_scalar(keyword: &str, values: &[&str]) -> Result<f32, MtlErrorKind> {
    let [value] = expect_values(keyword, values)?;
    parse_float(value)
}

fn parse_color(keyword: &str, values: &[&str]) -> Result<Vec3, MtlErrorKind> {
    let [r, g, b] = expect_values(keyword, values)?;
    Ok(Vec3::new(parse_float(r)?, parse_float(g)?, parse_float(b)?))
}

/// File name is the last field, after any `-option value` pairs
fn texture_name(values: &[&str]) -> Option<String> {
    values.last().map(|name| name.to_string())
}

/// Materials in file order, addressable by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    by_name: HashMap<String, usize>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.by_name.get(name).map(|&index| &self.materials[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Add a material; one with the same name is replaced in place
    pub fn insert(&mut self, material: Material) {
        match self.by_name.get(&material.name) {
            Some(&index) => self.materials[index] = material,
            None => {
                self.by_name
                    .insert(material.name.clone(), self.materials.len());
                self.materials.push(material);
            }
        }
    }

    fn last_mut(&mut self) -> Option<&mut Material> {
        self.materials.last_mut()
    }

    /// Drop `name` if present, keeping the order of the rest
    fn remove(&mut self, name: &str) {
        let Some(index) = self.by_name.remove(name) else {
            return;
        };
        self.materials.remove(index);
        for slot in self.by_name.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
    }
}

// =============================================================================
// Reading
// =============================================================================

/// Parse `.mtl` text
pub fn parse_mtl(text: &str) -> Result<MaterialLibrary, MtlError> {
    read_mtl(text.as_bytes())
}

/// Read a `.mtl` stream to the end
pub fn read_mtl<R: BufRead>(reader: R) -> Result<MaterialLibrary, MtlError> {
    let mut library = MaterialLibrary::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let fail = |kind| MtlError::Line {
            line_number: index + 1,
            line: line.clone(),
            kind,
        };

        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let mut fields = text.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };

        if keyword == "newmtl" {
            let name = text[keyword.len()..].trim();
            if name.is_empty() {
                return Err(fail(MtlErrorKind::MissingName));
            }
            // A redefined name starts over at the end, so the records that
            // follow land on the last material
            library.remove(name);
            library.insert(Material::new(name));
            continue;
        }

        let values: Vec<&str> = fields.collect();
        let Some(material) = library.last_mut() else {
            return Err(fail(MtlErrorKind::DataBeforeMaterial(keyword.to_string())));
        };
        if !material.apply(keyword, &values).map_err(fail)? {
            tracing::trace!("Skipping unsupported material key '{}'", keyword);
        }
    }

    tracing::debug!("Read material library: {} materials", library.len());
    Ok(library)
}

/// Open and read a `.mtl` file
pub fn load_mtl(path: impl AsRef<Path>) -> Result<MaterialLibrary, MtlError> {
    let path = path.as_ref();
    tracing::debug!("Loading material library: {:?}", path);
    let file = File::open(path)?;
    read_mtl(BufReader::new(file))
}

impl ObjBuffer {
    /// Load the buffer's `mtllib`, resolved relative to `dir`.
    ///
    /// Returns `Ok(None)` if the buffer names no library.
    pub fn load_material_library(
        &self,
        dir: impl AsRef<Path>,
    ) -> Result<Option<MaterialLibrary>, MtlError> {
        self.material_library
            .as_ref()
            .map(|name| load_mtl(dir.as_ref().join(name)))
            .transpose()
    }
}

// =============================================================================
// Writing
// =============================================================================

/// Write `library` as `.mtl` text.
///
/// Colors, `Ns` and `d` are always written; textures only when set;
/// `illum` and the PBR scalars only when non-zero.
pub fn write_mtl<W: Write>(library: &MaterialLibrary, mut writer: W) -> io::Result<()> {
    writeln!(writer, "# Wavefront material file")?;
    writeln!(writer, "# Exported by nether-obj")?;

    for m in library.iter() {
        writeln!(writer)?;
        writeln!(writer, "newmtl {}", m.name)?;

        for (key, color) in [
            ("Ka", m.ambient),
            ("Kd", m.diffuse),
            ("Ks", m.specular),
            ("Ke", m.emissive),
            ("Tf", m.transmission_filter),
        ] {
            writeln!(writer, "{key} {} {} {}", color.x, color.y, color.z)?;
        }
        writeln!(writer, "Ns {}", m.shininess * SHININESS_SCALE)?;
        writeln!(writer, "d {}", m.opacity)?;

        for (key, texture) in [
            ("map_Ka", &m.ambient_texture),
            ("map_Kd", &m.diffuse_texture),
            ("map_Ks", &m.specular_texture),
            ("map_Ke", &m.emissive_texture),
            ("map_d", &m.alpha_texture),
            ("map_bump", &m.bump_texture),
        ] {
            if let Some(name) = texture {
                writeln!(writer, "{key} {name}")?;
            }
        }

        if m.illumination != 0 {
            writeln!(writer, "illum {}", m.illumination)?;
        }
        for (key, value) in [
            ("Pr", m.roughness),
            ("Pm", m.metallic),
            ("Ps", m.sheen),
            ("Pc", m.clearcoat_thickness),
            ("Pcr", m.clearcoat_roughness),
            ("aniso", m.anisotropy),
            ("anisor", m.anisotropy_rotation),
        ] {
            if value != 0.0 {
                writeln!(writer, "{key} {value}")?;
            }
        }
    }
    Ok(())
}

/// Write `library` to a file, replacing it if it exists
pub fn save_mtl(path: impl AsRef<Path>, library: &MaterialLibrary) -> io::Result<()> {
    let path = path.as_ref();
    tracing::debug!("Saving material library: {:?}", path);
    let mut writer = BufWriter::new(File::create(path)?);
    write_mtl(library, &mut writer)?;
    writer.flush()
}
