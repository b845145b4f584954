use crate::storage::KeyGenerator;

/// Connection configuration
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    /// Indent the file on save instead of writing it on one line
    pub pretty: bool,

    /// Generator for documents added without an `_id`
    pub key_generator: KeyGenerator,
}

impl ConnectionConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pretty printing on save
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set the identity generator
    pub fn key_generator(mut self, key_generator: KeyGenerator) -> Self {
        self.key_generator = key_generator;
        self
    }
}
