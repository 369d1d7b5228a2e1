//! Recursion guard for reference resolution: cycle detection over the
//! symbols currently being resolved, plus an optional depth and work budget.
//!
//! # Design
//!
//! The guard owns the `visiting` set of one top-level resolution. Nothing is
//! flagged on the symbol graph itself, so the cycle rule is plain data flow:
//! a symbol is "in progress" exactly while it sits on the guard's stack.
//!
//! The visiting set is ordered. Besides membership it answers *where* on the
//! stack a symbol sits, which the resolver uses to tell whether a cycle it
//! just cut closed onto something above or below the symbol being resolved.
//!
//! # Profiles
//!
//! [`RecursionProfile`] names the budget so call sites don't carry magic
//! numbers:
//!
//! ```ignore
//! let guard = RecursionGuard::with_profile(RecursionProfile::Interactive);
//! ```
//!
//! # Safety
//!
//! - **Debug leak detection**: in debug builds, dropping a guard with active
//!   entries panics, catching forgotten `leave()` calls.
//! - **Debug double-leave detection**: leaving a key that is not on the stack
//!   panics in debug builds.
//! - **Overflow protection**: iteration counting saturates.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named budget presets for a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecursionProfile {
    /// No budget. Resolution of a finite graph always terminates, so this is
    /// the default for batch analysis.
    #[default]
    Unbounded,

    /// Bounded latency for interactive callers (editors, servers).
    ///
    /// depth = 512, iterations = 1,000,000
    Interactive,

    /// Custom limits for one-off or test scenarios.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    /// Maximum number of symbols simultaneously on the stack.
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Unbounded => u32::MAX,
            Self::Interactive => 512,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    /// Maximum number of enter attempts over the whole resolution.
    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::Unbounded => u32::MAX,
            Self::Interactive => 1_000_000,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// The key is already on the stack, at this position.
    Cycle { position: usize },
    /// Maximum recursion depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Ordered visiting stack with depth and iteration limits.
///
/// # Usage
///
/// ```ignore
/// match guard.enter(symbol) {
///     RecursionResult::Entered => {
///         let result = resolve_body(symbol);
///         guard.leave(symbol);
///         result
///     }
///     RecursionResult::Cycle { .. } => Type::Unknown,
///     RecursionResult::DepthExceeded
///     | RecursionResult::IterationExceeded => return Err(abort()),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: IndexSet<K, FxBuildHasher>,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    /// Create a guard with explicit limits.
    ///
    /// Prefer [`with_profile`](Self::with_profile) for standard use cases.
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: IndexSet::default(),
            iterations: 0,
            max_depth,
            max_iterations,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to push `key` onto the stack.
    ///
    /// On [`RecursionResult::Entered`] the caller **must** call
    /// [`leave`](Self::leave) with the same key when done, whatever the
    /// outcome of the guarded computation.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            return RecursionResult::IterationExceeded;
        }
        // Cycles are checked before depth: closing a cycle never deepens.
        if let Some(position) = self.visiting.get_index_of(&key) {
            return RecursionResult::Cycle { position };
        }
        if self.depth() >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }

        self.visiting.insert(key);
        RecursionResult::Entered
    }

    /// Pop `key` from the stack.
    ///
    /// # Debug panics
    ///
    /// In debug builds, panics if `key` is not on the stack.
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.shift_remove(&key);

        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set. \
             This indicates a double-leave or a leave without a matching enter()."
        );
    }

    /// Stack position of `key`, 0 being the outermost entry.
    #[inline]
    pub fn position(&self, key: &K) -> Option<usize> {
        self.visiting.get_index_of(key)
    }

    /// Current recursion depth (number of keys on the stack).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.visiting.len() as u32
    }

    /// Total enter attempts so far (successful or not).
    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set. \
                 This indicates leaked enter() calls without matching leave() calls.",
                self.visiting.len(),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
