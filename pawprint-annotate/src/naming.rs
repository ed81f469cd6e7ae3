//! Collision-free file names in the annotation folder
//!
//! Sidecars are keyed by stem (`cat.jpg` and `cat.png` share `cat.txt`), and
//! the folder may live on a case-insensitive filesystem, so names are
//! reserved by lower-cased stem.

use std::collections::HashSet;
use std::path::Path;

/// Stems already in use in the annotation folder
#[derive(Debug, Clone, Default)]
pub struct ReservedNames {
    stems: HashSet<String>,
}

impl ReservedNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the stem of `name`
    pub fn reserve(&mut self, name: &str) {
        self.stems.insert(stem_key(name));
    }

    /// True when a file with the same stem, ignoring case, is reserved
    pub fn is_taken(&self, name: &str) -> bool {
        self.stems.contains(&stem_key(name))
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ReservedNames {
    fn from_iter<I: IntoIterator<Item = S>>(names: I) -> Self {
        let mut reserved = Self::new();
        for name in names {
            reserved.reserve(name.as_ref());
        }
        reserved
    }
}

fn stem_key(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
        .to_lowercase()
}

/// `wanted` if its stem is free, else `{stem}_{n}{.ext}` for the smallest free `n >= 2`
///
/// ```
/// use pawprint_annotate::naming::{unique_name, ReservedNames};
///
/// let reserved: ReservedNames = ["IMG_1.jpg", "cat.txt"].into_iter().collect();
/// assert_eq!(unique_name("IMG_1.jpg", &reserved), "IMG_1_2.jpg");
/// assert_eq!(unique_name("cat.png", &reserved), "cat_2.png");
/// ```
pub fn unique_name(wanted: &str, reserved: &ReservedNames) -> String {
    if !reserved.is_taken(wanted) {
        return wanted.to_string();
    }

    let path = Path::new(wanted);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| wanted.to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (2..)
        .map(|n| format!("{}_{}{}", stem, n, ext))
        .find(|candidate| !reserved.is_taken(candidate))
        .unwrap_or_else(|| wanted.to_string())
}
