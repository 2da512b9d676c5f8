//! Session invariants checked after every simulated render.
//!
//! A [`SessionSnapshot`] captures what a user could observe: the editor lines,
//! the cursor, the mode and the transcript. Each [`Invariant`] inspects one
//! snapshot and reports a [`Violation`] when the session reached a state no
//! key sequence should produce.
//!
//! [`crate::SimDriver`] builds a snapshot from every [`parley_app::View`] it is
//! asked to render, so scripted runs fail at the first bad frame.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SessionSnapshot::from_session(&session);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{BufferNotEmpty, CursorInBounds, RepliesFollowUsers, UniqueMessageIds};
pub use snapshot::SessionSnapshot;

/// Outcome of checking one invariant against one snapshot.
pub type InvariantResult = Result<(), Violation>;

/// Which invariant a [`Violation`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// Buffer always holds at least one line.
    BufferNotEmpty,
    /// Cursor stays inside the current line.
    CursorInBounds,
    /// An assistant reply never precedes the user message it answers.
    RepliesFollowUsers,
    /// No message is delivered twice.
    UniqueMessageIds,
}

impl std::fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A snapshot that broke an invariant.
#[derive(Debug, Clone)]
pub struct Violation {
    /// The broken invariant.
    pub invariant: InvariantKind,
    /// What the snapshot contained, e.g. the offending cursor or message id.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of every reachable session state.
pub trait Invariant: Send + Sync {
    /// Kind reported in violations.
    fn kind(&self) -> InvariantKind;

    /// Inspect one snapshot.
    fn check(&self, state: &SessionSnapshot) -> InvariantResult;
}

/// Ordered set of invariants run against each snapshot.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Registry with no checks.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Every invariant a live session must uphold:
    /// - [`BufferNotEmpty`]: buffer has at least one line
    /// - [`CursorInBounds`]: cursor row and column are in range
    /// - [`RepliesFollowUsers`]: replies never outnumber user messages
    /// - [`UniqueMessageIds`]: every delivered message id is distinct
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(BufferNotEmpty);
        registry.add(CursorInBounds);
        registry.add(RepliesFollowUsers);
        registry.add(UniqueMessageIds);
        registry
    }

    /// Append a check.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every check, collecting all violations rather than stopping at the
    /// first.
    pub fn check_all(&self, state: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of checks.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
