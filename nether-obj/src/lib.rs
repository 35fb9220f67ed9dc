//! Nether-OBJ: Wavefront OBJ mesh ingestion for Nethercore asset tooling
//!
//! This crate reads the line-oriented Wavefront `.obj` text format into an
//! append-only [`ObjBuffer`], and provides the post-processing steps the
//! asset pipeline needs before packing meshes:
//!
//! - **Reading**: keyword dispatch, face-corner resolution (1-based and
//!   relative indices), group and material bookkeeping
//! - **Triangulation**: ear clipping on a dominant-axis projection
//! - **Group extraction**: carve one group into an independent, compacted buffer
//! - **Writing**: re-emit a buffer as `.obj` text
//! - **Material libraries**: read/write the companion `.mtl` format
//!
//! # Usage
//!
//! ```ignore
//! use nether_obj::{load_obj, ReadOptions};
//!
//! let buffer = load_obj("ship.obj", &ReadOptions::default()).unwrap();
//!
//! for group in &buffer.groups {
//!     let part = nether_obj::extract_group(&buffer, group).unwrap();
//!     let triangles = part.triangulated();
//!     println!("{}: {} triangles", group.name, triangles.faces.len());
//! }
//! ```
//!
//! # Format Reference
//!
//! - <https://paulbourke.net/dataformats/obj/>
//! - <https://paulbourke.net/dataformats/mtl/>

mod bounds;
mod buffer;
mod corner;
mod error;
mod extract;
mod groups;
pub mod material;
mod options;
mod reader;
mod triangulate;
mod writer;

pub use bounds::Aabb;
pub use buffer::{Attribute, Face, FaceCorner, Group, MaterialRun, ObjBuffer, Polyline};
pub use error::{ErrorCategory, ExtractError, LineErrorKind, ObjError};
pub use extract::{extract_group, extract_range};
pub use material::{Material, MaterialLibrary, MtlError, MtlErrorKind};
pub use options::ReadOptions;
pub use reader::{ObjReader, load_obj, parse_obj, read_obj};
pub use triangulate::triangulate;
pub use writer::{save_obj, write_obj};

// =============================================================================
// Constants
// =============================================================================

/// Name given to faces that are not inside any explicit `g` group
pub const DEFAULT_GROUP_NAME: &str = "default group";

/// Full sweeps around the remaining ring before the triangulator gives up
pub const TRIANGULATE_MAX_SWEEPS: u32 = 10;

/// Cross-product magnitudes at or below this are treated as degenerate
/// when choosing the projection plane
pub const DEGENERATE_EPSILON: f32 = f32::EPSILON;

/// Minimum number of corners in a face
pub const MIN_FACE_CORNERS: usize = 3;

/// Minimum number of vertices in a polyline
pub const MIN_POLYLINE_VERTICES: usize = 2;
