// config.rs

pub const HISTORY_CAPACITY: usize = 10;
pub const PROMPT: &str = "osh>";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub history_capacity: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: PROMPT.to_string(),
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

impl ShellConfig {
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }
}
