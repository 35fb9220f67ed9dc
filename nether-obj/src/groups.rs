//! Group and material-run bookkeeping
//!
//! Both trackers keep at most one open range. Opening a new range closes the
//! current one at the current face count; a range that closes with no faces
//! is discarded.

use crate::buffer::{Group, MaterialRun};

/// Range opened at `first_face`, not yet closed
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenRange {
    name: String,
    first_face: usize,
}

impl OpenRange {
    fn new(name: &str, first_face: usize) -> Self {
        Self {
            name: name.to_string(),
            first_face,
        }
    }

    /// Name and face count, or `None` if nothing was added since it opened
    fn close(self, face_count: usize) -> Option<(String, usize)> {
        let count = face_count.saturating_sub(self.first_face);
        if count == 0 {
            tracing::trace!("Discarding empty range '{}'", self.name);
            return None;
        }
        Some((self.name, count))
    }
}

/// Tracks `g` groups while reading
#[derive(Debug)]
pub(crate) struct GroupTracker {
    open: Option<OpenRange>,
    groups: Vec<Group>,
}

impl GroupTracker {
    /// Start with the default group open, so faces before the first `g`
    /// are not lost
    pub fn new(default_name: &str) -> Self {
        Self {
            open: Some(OpenRange::new(default_name, 0)),
            groups: Vec::new(),
        }
    }

    /// Close the open group and open `name` at the next face
    pub fn start(&mut self, name: &str, face_count: usize) {
        self.end(face_count);
        self.open = Some(OpenRange::new(name, face_count));
    }

    /// Close the open group, keeping it only if it received faces
    pub fn end(&mut self, face_count: usize) {
        let Some(open) = self.open.take() else {
            return;
        };
        let first_face = open.first_face;
        if let Some((name, face_count)) = open.close(face_count) {
            self.groups.push(Group {
                name,
                first_face,
                face_count,
            });
        }
    }

    pub fn open_name(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.name.as_str())
    }

    #[cfg(test)]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn finish(mut self, face_count: usize) -> Vec<Group> {
        self.end(face_count);
        self.groups
    }
}

/// Tracks `usemtl` switches while reading
#[derive(Debug)]
pub(crate) struct MaterialRunTracker {
    open: OpenRange,
    runs: Vec<MaterialRun>,
}

impl MaterialRunTracker {
    pub fn new() -> Self {
        Self {
            open: OpenRange::new("", 0),
            runs: Vec::new(),
        }
    }

    pub fn active_material(&self) -> &str {
        &self.open.name
    }

    /// Close the current run and open one for `material`. Switching to the
    /// material already active keeps the current run open.
    pub fn switch(&mut self, material: &str, face_count: usize) {
        if material == self.open.name {
            return;
        }
        let previous = std::mem::replace(&mut self.open, OpenRange::new(material, face_count));
        self.close(previous, face_count);
    }

    /// Close `open`, extending the last run instead if it has the same
    /// material and ends where `open` starts
    fn close(&mut self, open: OpenRange, face_count: usize) {
        let first_face = open.first_face;
        if let Some((material, face_count)) = open.close(face_count) {
            if let Some(last) = self.runs.last_mut()
                && last.material == material
                && last.face_range().end == first_face
            {
                last.face_count += face_count;
                return;
            }
            self.runs.push(MaterialRun {
                material,
                first_face,
                face_count,
            });
        }
    }

    pub fn finish(mut self, face_count: usize) -> Vec<MaterialRun> {
        let open = std::mem::replace(&mut self.open, OpenRange::new("", face_count));
        self.close(open, face_count);
        self.runs
    }
}
