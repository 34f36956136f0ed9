use crate::error::{Error, ErrorKind, Result};

pub const DEFAULT_MAX_DEPTH: u16 = 256;

/// What a mixed filter level (criteria next to plain selectors) puts in its output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MixedSelection {
    /// Every filter child drives the output, so matched criteria appear in it
    #[default]
    WithCriteria,
    /// Only the plain selectors drive the output; criteria just gate the match
    SelectorsOnly,
}

/// Configuration for the subtree filter engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    /// Maximum recursion depth (0 means unlimited)
    pub max_depth: u16,
    /// Output policy for mixed filter levels
    pub mixed: MixedSelection,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterConfig {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            mixed: MixedSelection::WithCriteria,
        }
    }

    /// Create a config without a recursion limit
    ///
    /// Recursion then only stops at the bottom of the shallower tree, and a
    /// deep enough input can exhaust the stack.
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            mixed: MixedSelection::WithCriteria,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u16) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_mixed(mut self, mixed: MixedSelection) -> Self {
        self.mixed = mixed;
        self
    }

    /// Fails once `depth` goes past the configured limit
    pub(crate) fn check_depth(&self, depth: u16) -> Result<()> {
        if self.max_depth > 0 && depth > self.max_depth {
            return Err(Error::unpositioned(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        Ok(())
    }
}
