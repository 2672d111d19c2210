#![forbid(unsafe_code)]

//! Page scroll lock.
//!
//! While a modal is mounted the page behind it must not scroll. The page's
//! overflow setting is process-wide state, so it lives in a [`PageScroll`]
//! shared by every modal, and each modal holds a [`ScrollLockGuard`] while
//! it is mounted.
//!
//! # Lifecycle Guarantees
//!
//! 1. **Reference counted** - The first guard saves the current overflow and
//!    sets [`Overflow::Hidden`]; later guards only bump the count.
//!
//! 2. **Drop restores previous state** - When the last guard is dropped the
//!    saved overflow is written back. Guards may drop in any order.
//!
//! 3. **No leaked lock on any exit path** - Because release is in [`Drop`],
//!    teardown by return, `?`, or panic unwinding all restore scrolling.
//!
//! # Host Writes While Locked
//!
//! If the host calls [`PageScroll::set_overflow`] while guards are held, the
//! new value becomes the value restored on release; the effective overflow
//! stays hidden until then.
//!
//! # Usage
//!
//! ```
//! use fmodal_core::scroll::{Overflow, PageScroll};
//! use std::sync::Arc;
//!
//! let page = Arc::new(PageScroll::new());
//! let guard = page.lock();
//! assert_eq!(page.overflow(), Overflow::Hidden);
//! drop(guard);
//! assert_eq!(page.overflow(), Overflow::Auto);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// The page's overflow behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overflow {
    /// Host default (scroll when content overflows).
    #[default]
    Auto,
    /// Scrolling suppressed.
    Hidden,
    /// Always scrollable.
    Scroll,
}

#[derive(Debug, Default)]
struct ScrollState {
    overflow: Overflow,
    holders: usize,
    /// Value to restore once `holders` drops to zero.
    saved: Overflow,
}

/// Process-wide page scroll state with reference-counted locking.
#[derive(Debug, Default)]
pub struct PageScroll {
    state: Mutex<ScrollState>,
}

static GLOBAL: OnceLock<Arc<PageScroll>> = OnceLock::new();

impl PageScroll {
    /// Create an independent scroll flag, starting at [`Overflow::Auto`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The single page shared by the whole process.
    pub fn global() -> Arc<PageScroll> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(PageScroll::new())))
    }

    fn state(&self) -> MutexGuard<'_, ScrollState> {
        // Plain fields only; a poisoned lock still holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The effective overflow right now.
    pub fn overflow(&self) -> Overflow {
        self.state().overflow
    }

    /// Set the page overflow from the host side.
    pub fn set_overflow(&self, overflow: Overflow) {
        let mut state = self.state();
        if state.holders > 0 {
            state.saved = overflow;
        } else {
            state.overflow = overflow;
        }
    }

    /// Number of live guards.
    pub fn holders(&self) -> usize {
        self.state().holders
    }

    /// Whether at least one guard is live.
    pub fn is_locked(&self) -> bool {
        self.holders() > 0
    }

    /// Suppress page scrolling until the returned guard is dropped.
    #[must_use = "dropping the guard releases the scroll lock immediately"]
    pub fn lock(self: &Arc<Self>) -> ScrollLockGuard {
        let mut state = self.state();
        if state.holders == 0 {
            state.saved = state.overflow;
            state.overflow = Overflow::Hidden;
        }
        state.holders += 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(holders = state.holders, "page scroll locked");

        drop(state);
        ScrollLockGuard {
            page: Arc::clone(self),
        }
    }

    fn release(&self) {
        let mut state = self.state();
        state.holders = state.holders.saturating_sub(1);
        if state.holders == 0 {
            state.overflow = state.saved;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            holders = state.holders,
            overflow = ?state.overflow,
            "page scroll lock released"
        );
    }
}

/// Holds the page scroll lock; releases it on drop.
#[derive(Debug)]
pub struct ScrollLockGuard {
    page: Arc<PageScroll>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.page.release();
    }
}
