//! Built-in prompt text

/// Built-in system prompts
pub mod builtin {
    /// Used when `--system` is not given
    pub const DEFAULT: &str = "You are a helpful assistant";
}
