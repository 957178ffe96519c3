/// Bounds on how much work the GLR machine may do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum live stack versions (default: 6).
    pub(crate) max_versions: usize,
    /// Maximum paths enumerated by a single pop (default: 64).
    pub(crate) max_pop_paths: usize,
    /// Maximum recovery attempts at one position before forcing progress
    /// (default: 16).
    pub(crate) max_recovery_attempts: u32,
    /// How far recovery may pop back looking for a frame that accepts the
    /// lookahead (default: 32).
    pub(crate) max_pop_back_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_versions: 6,
            max_pop_paths: 64,
            max_recovery_attempts: 16,
            max_pop_back_depth: 32,
        }
    }
}

impl ParseLimits {
    /// Create limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version cap. At least one version always survives.
    pub fn max_versions(mut self, versions: usize) -> Self {
        self.max_versions = versions.max(1);
        self
    }

    /// Set the pop-path cap. At least one path is always followed.
    pub fn max_pop_paths(mut self, paths: usize) -> Self {
        self.max_pop_paths = paths.max(1);
        self
    }

    pub fn max_recovery_attempts(mut self, attempts: u32) -> Self {
        self.max_recovery_attempts = attempts;
        self
    }

    pub fn max_pop_back_depth(mut self, depth: usize) -> Self {
        self.max_pop_back_depth = depth;
        self
    }

    pub fn get_max_versions(&self) -> usize {
        self.max_versions
    }
    pub fn get_max_pop_paths(&self) -> usize {
        self.max_pop_paths
    }
    pub fn get_max_recovery_attempts(&self) -> u32 {
        self.max_recovery_attempts
    }
    pub fn get_max_pop_back_depth(&self) -> usize {
        self.max_pop_back_depth
    }
}
