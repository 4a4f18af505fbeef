/// Evaluator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Nested calls allowed before evaluation fails with
    /// `RuntimeError::CallDepthExceeded`
    pub max_call_depth: usize,
}

impl Config {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
        }
    }
}
