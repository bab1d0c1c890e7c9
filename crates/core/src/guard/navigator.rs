//! Navigation capability.

/// Client-side route push.
pub trait Navigator {
    fn push(&mut self, path: &str);
}

/// Navigator that records every push instead of performing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNavigator {
    pushed: Vec<String>,
}

impl RecordingNavigator {
    #[must_use]
    pub const fn new() -> Self {
        Self { pushed: Vec::new() }
    }

    /// All paths pushed so far, oldest first.
    #[must_use]
    pub fn pushed(&self) -> &[String] {
        &self.pushed
    }

    /// The most recent push, which is where the user ends up.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.pushed.last().map(String::as_str)
    }
}

impl Navigator for RecordingNavigator {
    fn push(&mut self, path: &str) {
        self.pushed.push(path.to_owned());
    }
}
