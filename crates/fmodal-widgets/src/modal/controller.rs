#![forbid(unsafe_code)]

//! Visibility and transition state machine for a modal.
//!
//! The owner decides whether the modal should be open and tells the
//! controller with [`ModalController::set_requested_open`]. The controller
//! turns that into a three-phase transition:
//!
//! ```text
//!   Closed --open--> Entering --10ms--> Open --close--> Exiting --fade--> Closed
//!                       ^                                  |
//!                       +--------------open----------------+
//! ```
//!
//! - **Entering**: mounted, visible state not yet applied, so the
//!   presentation layer inserts the markup before the transition starts.
//! - **Open**: visible state applied.
//! - **Exiting**: visible state removed; the markup stays for the fade.
//!
//! # Invariants
//!
//! 1. `animating_in ⇒ mounted`.
//! 2. At most one enter timer and one exit timer are pending; a new request
//!    cancels both before scheduling its own.
//! 3. The Escape listener is registered exactly while the modal is requested
//!    open.
//! 4. The page scroll lock is held exactly while the modal is mounted.
//! 5. After [`ModalController::teardown`] (or drop), no timer, listener or
//!    scroll lock belongs to this controller, and every operation is a
//!    no-op.
//!
//! # Dismissal
//!
//! The controller never closes itself. Overlay clicks, the close button and
//! Escape invoke the owner's `on_close` callback, and the owner responds by
//! calling `set_requested_open(false)`. Methods take `&self` so that
//! callback can call straight back in; no internal borrow is held while it
//! runs.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Duration;

use fmodal_core::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use fmodal_core::geometry::{Rect, Size};
use fmodal_core::scroll::{PageScroll, ScrollLockGuard};
use fmodal_runtime::{KeyListeners, Subscription, TimerHandle, TimerQueue};

use crate::modal::{
    AriaAttributes, BACKDROP_COLOR, CLOSE_ARIA_LABEL, ModalHit, ModalLayout, ModalMetrics,
    ModalProps, ModalView, TITLE_ID, Transition,
};

/// Gap between mounting and applying the visible state.
pub const ENTER_DELAY: Duration = Duration::from_millis(10);

/// Snapshot of a modal's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalState {
    /// What the owner last asked for.
    pub requested_open: bool,
    /// Whether the modal renders at all.
    pub mounted: bool,
    /// Whether the visible transition state applies.
    pub animating_in: bool,
    pub fade_duration: Duration,
}

impl ModalState {
    fn new(fade_duration: Duration) -> Self {
        Self {
            requested_open: false,
            mounted: false,
            animating_in: false,
            fade_duration,
        }
    }

    pub fn phase(&self) -> ModalPhase {
        match (self.mounted, self.requested_open, self.animating_in) {
            (false, _, _) => ModalPhase::Closed,
            (true, _, true) => ModalPhase::Open,
            (true, true, false) => ModalPhase::Entering,
            (true, false, false) => ModalPhase::Exiting,
        }
    }
}

/// Coarse position in the open/close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalPhase {
    Closed,
    Entering,
    Open,
    Exiting,
}

/// What asked the modal to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// A click on the overlay outside the content box.
    Backdrop,
    Escape,
    CloseButton,
}

/// Services a controller borrows from its host.
#[derive(Debug, Clone)]
pub struct ModalHost {
    pub timers: TimerQueue,
    pub keys: KeyListeners,
    pub page: Arc<PageScroll>,
}

impl Default for ModalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalHost {
    /// Fresh timers and listeners, locking the process-wide page.
    pub fn new() -> Self {
        Self::with_page(PageScroll::global())
    }

    /// Fresh timers, listeners and a private page scroll flag.
    pub fn isolated() -> Self {
        Self::with_page(Arc::new(PageScroll::new()))
    }

    pub fn with_page(page: Arc<PageScroll>) -> Self {
        Self {
            timers: TimerQueue::new(),
            keys: KeyListeners::new(),
            page,
        }
    }
}

type CloseCallback = Rc<dyn Fn()>;

struct Shared {
    state: ModalState,
    props: ModalProps,
    metrics: ModalMetrics,
    on_close: CloseCallback,
    enter_timer: Option<TimerHandle>,
    exit_timer: Option<TimerHandle>,
    key_listener: Option<Subscription>,
    scroll_lock: Option<ScrollLockGuard>,
    /// Layout of the last rendered frame, used for hit testing.
    layout: Option<ModalLayout>,
    torn_down: bool,
}

/// Owns one modal's state, timers, Escape listener and scroll lock.
pub struct ModalController {
    shared: Rc<RefCell<Shared>>,
    host: ModalHost,
}

impl fmt::Debug for ModalController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("ModalController")
            .field("state", &shared.state)
            .field("props", &shared.props)
            .field("torn_down", &shared.torn_down)
            .finish()
    }
}

impl ModalController {
    /// Create a closed, unmounted modal.
    pub fn new(props: ModalProps, on_close: impl Fn() + 'static, host: ModalHost) -> Self {
        let state = ModalState::new(props.transition_duration());
        Self {
            shared: Rc::new(RefCell::new(Shared {
                state,
                props,
                metrics: ModalMetrics::default(),
                on_close: Rc::new(on_close),
                enter_timer: None,
                exit_timer: None,
                key_listener: None,
                scroll_lock: None,
                layout: None,
                torn_down: false,
            })),
            host,
        }
    }

    /// Use `metrics` for layout and the slide offset.
    pub fn with_metrics(self, metrics: ModalMetrics) -> Self {
        self.shared.borrow_mut().metrics = metrics;
        self
    }

    pub fn host(&self) -> &ModalHost {
        &self.host
    }

    pub fn state(&self) -> ModalState {
        self.shared.borrow().state
    }

    pub fn phase(&self) -> ModalPhase {
        self.state().phase()
    }

    pub fn props(&self) -> ModalProps {
        self.shared.borrow().props.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state().requested_open
    }

    pub fn is_mounted(&self) -> bool {
        self.state().mounted
    }

    pub fn is_animating_in(&self) -> bool {
        self.state().animating_in
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.borrow().torn_down
    }

    /// Change the desired visibility.
    ///
    /// Opening mounts immediately and applies the visible state after
    /// [`ENTER_DELAY`]. Closing removes the visible state immediately and
    /// unmounts after the fade duration. Repeating the current value does
    /// nothing.
    pub fn set_requested_open(&self, open: bool) {
        let mut shared = self.shared.borrow_mut();
        if shared.torn_down || shared.state.requested_open == open {
            return;
        }
        shared.state.requested_open = open;

        // Supersede whatever the previous request scheduled.
        shared.enter_timer = None;
        shared.exit_timer = None;

        if open {
            shared.state.mounted = true;
            if shared.scroll_lock.is_none() {
                shared.scroll_lock = Some(self.host.page.lock());
            }
            shared.enter_timer = Some(self.schedule_enter());
            shared.key_listener = Some(self.listen_for_escape());
        } else {
            shared.state.animating_in = false;
            shared.key_listener = None;
            let fade = shared.state.fade_duration;
            shared.exit_timer = Some(self.schedule_exit(fade));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            open,
            phase = ?shared.state.phase(),
            at_ms = self.host.timers.now().as_millis() as u64,
            "modal open requested"
        );
    }

    /// Replace the configuration.
    ///
    /// A changed fade duration takes effect on the next close; if an exit
    /// fade is already running, its timer restarts from now with the new
    /// duration.
    pub fn set_props(&self, props: ModalProps) {
        let mut shared = self.shared.borrow_mut();
        if shared.torn_down {
            return;
        }
        let fade = props.transition_duration();
        let changed = fade != shared.state.fade_duration;
        shared.props = props;
        shared.state.fade_duration = fade;
        if changed && shared.exit_timer.is_some() {
            shared.exit_timer = Some(self.schedule_exit(fade));
        }
    }

    /// Replace the dismissal callback. A registered Escape listener uses
    /// the new callback from its next event.
    pub fn set_on_close(&self, on_close: impl Fn() + 'static) {
        self.shared.borrow_mut().on_close = Rc::new(on_close);
    }

    /// Ask the owner to close the modal.
    ///
    /// Returns `true` if `on_close` was invoked. Backdrop and close-button
    /// requests count while the modal is mounted; Escape counts only while
    /// it is requested open. Backdrop and Escape can be disabled through
    /// [`ModalProps`].
    pub fn on_dismiss_requested(&self, reason: DismissReason) -> bool {
        let on_close = {
            let shared = self.shared.borrow();
            if !accepts(&shared, reason) {
                return false;
            }
            Rc::clone(&shared.on_close)
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(?reason, "modal dismiss requested");

        on_close();
        true
    }

    /// Route an input event.
    ///
    /// Only mouse events are handled here. Keys reach the modal through the
    /// host's [`KeyListeners`], and resizes take effect on the next
    /// [`layout`](Self::layout).
    pub fn handle_event(&self, event: &Event) -> Option<DismissReason> {
        match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Key(_) | Event::Resize { .. } => None,
        }
    }

    /// Route a mouse event through the last layout.
    ///
    /// A primary-button press on the overlay or the close button requests
    /// dismissal; presses inside the content box never do. Returns the
    /// reason if `on_close` was invoked.
    pub fn handle_mouse(&self, event: &MouseEvent) -> Option<DismissReason> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let hit = self.shared.borrow().layout?.hit_test(event.x, event.y)?;
        let reason = match hit {
            ModalHit::Backdrop => DismissReason::Backdrop,
            ModalHit::CloseButton => DismissReason::CloseButton,
            ModalHit::Content => return None,
        };
        self.on_dismiss_requested(reason).then_some(reason)
    }

    /// Lay out the modal for this frame and remember it for hit testing.
    ///
    /// Returns `None` while unmounted.
    pub fn layout(&self, area: Rect, body: Size) -> Option<ModalLayout> {
        let mut shared = self.shared.borrow_mut();
        if !shared.state.mounted {
            shared.layout = None;
            return None;
        }
        let layout = ModalLayout::compute(
            area,
            &shared.props,
            &shared.metrics,
            body,
            shared.state.animating_in,
        );
        shared.layout = Some(layout);
        Some(layout)
    }

    /// The layout recorded by the last [`layout`](Self::layout) call.
    pub fn last_layout(&self) -> Option<ModalLayout> {
        self.shared.borrow().layout
    }

    /// Describe the frame to draw, or `None` while unmounted.
    pub fn view<'a, C: ?Sized>(&self, content: &'a C) -> Option<ModalView<'a, C>> {
        let shared = self.shared.borrow();
        if !shared.state.mounted {
            return None;
        }
        let props = &shared.props;
        Some(ModalView {
            aria: AriaAttributes::default(),
            title: props.title_text().map(str::to_owned),
            title_id: TITLE_ID,
            content,
            class_name: props.class_name.clone(),
            close_text: props.close_text.clone(),
            close_aria_label: CLOSE_ARIA_LABEL,
            max_width: props.effective_max_width(),
            width_percent: shared.metrics.width_percent,
            backdrop: BACKDROP_COLOR,
            transition: Transition::new(
                shared.state.animating_in,
                shared.state.fade_duration,
                shared.metrics.slide_offset,
            ),
        })
    }

    /// Cancel timers, remove the listener and release the scroll lock.
    ///
    /// Called automatically on drop. Idempotent.
    pub fn teardown(&self) {
        let released = {
            let mut shared = self.shared.borrow_mut();
            if shared.torn_down {
                return;
            }
            shared.torn_down = true;
            shared.state.mounted = false;
            shared.state.animating_in = false;
            shared.layout = None;
            (
                shared.enter_timer.take(),
                shared.exit_timer.take(),
                shared.key_listener.take(),
                shared.scroll_lock.take(),
            )
        };
        drop(released);

        #[cfg(feature = "tracing")]
        tracing::debug!("modal torn down");
    }

    fn schedule_enter(&self) -> TimerHandle {
        let weak = Rc::downgrade(&self.shared);
        self.host
            .timers
            .schedule(ENTER_DELAY, "modal.enter", move || finish_enter(&weak))
    }

    fn schedule_exit(&self, fade: Duration) -> TimerHandle {
        let weak = Rc::downgrade(&self.shared);
        self.host
            .timers
            .schedule(fade, "modal.exit", move || finish_exit(&weak))
    }

    fn listen_for_escape(&self) -> Subscription {
        let weak = Rc::downgrade(&self.shared);
        self.host.keys.subscribe(move |event| {
            if !event.is_escape_press() {
                return;
            }
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let on_close = {
                let shared = shared.borrow();
                if !accepts(&shared, DismissReason::Escape) {
                    return;
                }
                Rc::clone(&shared.on_close)
            };

            #[cfg(feature = "tracing")]
            tracing::debug!(reason = ?DismissReason::Escape, "modal dismiss requested");

            on_close();
        })
    }
}

impl Drop for ModalController {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn accepts(shared: &Shared, reason: DismissReason) -> bool {
    if shared.torn_down {
        return false;
    }
    match reason {
        DismissReason::Escape => shared.state.requested_open && shared.props.close_on_escape,
        DismissReason::Backdrop => shared.state.mounted && shared.props.close_on_backdrop,
        DismissReason::CloseButton => shared.state.mounted,
    }
}

fn finish_enter(weak: &Weak<RefCell<Shared>>) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let mut shared = shared.borrow_mut();
    shared.enter_timer = None;
    if shared.state.requested_open && shared.state.mounted {
        shared.state.animating_in = true;
    }
}

fn finish_exit(weak: &Weak<RefCell<Shared>>) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let released = {
        let mut shared = shared.borrow_mut();
        shared.exit_timer = None;
        if shared.state.requested_open {
            return;
        }
        shared.state.mounted = false;
        shared.layout = None;
        shared.scroll_lock.take()
    };
    drop(released);
}
