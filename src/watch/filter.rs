// src/watch/filter.rs

use std::collections::BTreeSet;

use tracing::debug;

/// Per-job include/exclude decision over path suffixes.
///
/// Entries are matched verbatim against the end of the path, so `".txt"`,
/// `"txt"` and even `"_backup.tar.gz"` all behave as configured. The include
/// set is checked first, but the exclude set is evaluated regardless of the
/// include outcome: exclude wins when both would match.
///
/// An unset (`None`) side imposes no restriction.
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    include: Option<BTreeSet<String>>,
    exclude: Option<BTreeSet<String>>,
}

impl ExtensionFilter {
    pub fn new(
        include: Option<BTreeSet<String>>,
        exclude: Option<BTreeSet<String>>,
    ) -> Self {
        Self { include, exclude }
    }

    /// Should an event for `path` be dispatched?
    ///
    /// Rejections are debug-logged with the reason; they are never errors.
    pub fn include(&self, path: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.iter().any(|suffix| path.ends_with(suffix.as_str())) {
                debug!(
                    path,
                    ?include,
                    "path excluded: suffix not in included extensions"
                );
                return false;
            }
        }

        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|suffix| path.ends_with(suffix.as_str())) {
                debug!(
                    path,
                    ?exclude,
                    "path excluded: suffix in excluded extensions"
                );
                return false;
            }
        }

        true
    }
}
