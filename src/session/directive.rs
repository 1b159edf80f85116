use tracing::info;

/// Single-slot mailbox holding at most one pending directive
///
/// A new directive overwrites an unconsumed one. `take` empties the slot.
#[derive(Debug, Default)]
pub struct DirectiveSlot {
    pending: Option<String>,
}

impl DirectiveSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a directive; empty strings are ignored
    pub fn arm(&mut self, directive: &str) {
        if directive.is_empty() {
            return;
        }
        if let Some(previous) = self.pending.replace(directive.to_string()) {
            info!("Replacing pending directive: {}", previous);
        }
        info!("Stored protect instructions: {}", directive);
    }

    pub fn take(&mut self) -> Option<String> {
        self.pending.take()
    }

    pub fn peek(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
