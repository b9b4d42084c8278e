//! The profiling source: where the attached profile came from.

use serde::Deserialize;

/// Metadata about the reader that attached profile data to the binary
pub trait ProfileSource {
    /// Reader name, written as the profile origin
    fn name(&self) -> &str;

    /// A trusted source's profile is used even when it failed validation
    fn is_trusted_source(&self) -> bool;

    /// Names of the sampled events, possibly empty
    fn event_names(&self) -> &[String];
}

/// Plain description of a profile reader
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileReader {
    pub name: String,

    #[serde(default)]
    pub trusted: bool,

    #[serde(default)]
    pub event_names: Vec<String>,
}

impl ProfileReader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn trusted(mut self) -> Self {
        self.trusted = true;
        self
    }

    pub fn with_events<S: Into<String>>(mut self, events: impl IntoIterator<Item = S>) -> Self {
        self.event_names = events.into_iter().map(Into::into).collect();
        self
    }
}

impl ProfileSource for ProfileReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_trusted_source(&self) -> bool {
        self.trusted
    }

    fn event_names(&self) -> &[String] {
        &self.event_names
    }
}
