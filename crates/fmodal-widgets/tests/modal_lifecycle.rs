#![forbid(unsafe_code)]

//! End-to-end lifecycle tests for the animated modal.
//!
//! # Timeline Invariants
//!
//! 1. **Mount first**: opening mounts synchronously; the visible state
//!    follows exactly `ENTER_DELAY` later, never before.
//! 2. **Unmount last**: closing drops the visible state synchronously and
//!    unmounts exactly one fade duration later.
//! 3. **No stale timers**: rapid toggling never shows a closed modal.
//!
//! # Input Invariants
//!
//! | Input | Modal state | Expected |
//! |-------|-------------|----------|
//! | Escape | closed | nothing (no listener) |
//! | Escape | open | `on_close` once |
//! | Click content | mounted | nothing |
//! | Click overlay | mounted | `on_close` once |
//! | Click close button | mounted | `on_close` once |
//!
//! # Resource Invariants
//!
//! Teardown leaves zero timers, zero listeners, and an unlocked page.
//!
//! Run: `cargo test -p fmodal-widgets --test modal_lifecycle`

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use fmodal_core::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use fmodal_core::geometry::{Rect, Size};
use fmodal_core::scroll::{Overflow, PageScroll};
use fmodal_widgets::modal::{
    DismissReason, ENTER_DELAY, ModalController, ModalHost, ModalMetrics, ModalPhase, ModalProps,
};
use proptest::prelude::*;

// =============================================================================
// Test Utilities
// =============================================================================

const SCREEN: Rect = Rect::new(0, 0, 80, 24);
const BODY: Size = Size::new(24, 2);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

struct Fixture {
    host: ModalHost,
    modal: ModalController,
    closes: Rc<Cell<u32>>,
}

fn fixture(props: ModalProps) -> Fixture {
    fixture_on(props, ModalHost::isolated())
}

fn fixture_on(props: ModalProps, host: ModalHost) -> Fixture {
    let closes = Rc::new(Cell::new(0));
    let c = Rc::clone(&closes);
    let modal = ModalController::new(props, move || c.set(c.get() + 1), host.clone());
    Fixture {
        host,
        modal,
        closes,
    }
}

impl Fixture {
    fn advance(&self, n: u64) {
        self.host.timers.advance(ms(n));
    }

    fn escape(&self) {
        self.host.keys.dispatch(&KeyEvent::new(KeyCode::Escape));
    }

    fn click(&self, x: u16, y: u16) -> Option<DismissReason> {
        self.modal.handle_mouse(&MouseEvent::left_click(x, y))
    }
}

// =============================================================================
// Timeline
// =============================================================================

#[test]
fn documented_scenario() {
    let f = fixture(ModalProps::default());

    f.modal.set_requested_open(true);
    assert!(f.modal.is_mounted());
    assert!(!f.modal.is_animating_in());

    f.advance(10);
    assert!(f.modal.is_animating_in());

    f.advance(40);
    assert_eq!(f.host.timers.now(), ms(50));
    f.modal.set_requested_open(false);
    assert!(!f.modal.is_animating_in());
    assert!(f.modal.is_mounted());

    f.advance(299);
    assert_eq!(f.host.timers.now(), ms(349));
    assert!(f.modal.is_mounted());

    f.advance(1);
    assert_eq!(f.host.timers.now(), ms(350));
    assert!(!f.modal.is_mounted());
    assert_eq!(f.modal.phase(), ModalPhase::Closed);
}

#[test]
fn exit_honors_custom_fade() {
    for fade in [0u64, 1, 75, 1200] {
        let f = fixture(ModalProps::new().fade_duration(ms(fade)));
        f.modal.set_requested_open(true);
        f.advance(10);
        f.modal.set_requested_open(false);
        if fade > 0 {
            f.advance(fade - 1);
            assert!(f.modal.is_mounted(), "fade {fade}: unmounted early");
            f.advance(1);
        } else {
            f.advance(0);
        }
        assert!(!f.modal.is_mounted(), "fade {fade}: still mounted");
    }
}

// =============================================================================
// Input
// =============================================================================

#[test]
fn escape_ignored_while_closed() {
    let f = fixture(ModalProps::default());
    f.escape();
    assert_eq!(f.closes.get(), 0);
    assert!(f.host.keys.is_empty());
}

#[test]
fn escape_while_open_requests_close_once() {
    let f = fixture(ModalProps::default());
    f.modal.set_requested_open(true);
    f.escape();
    assert_eq!(f.closes.get(), 1);
}

#[test]
fn content_click_never_closes_overlay_click_closes_once() {
    let f = fixture(ModalProps::default());
    f.modal.set_requested_open(true);
    f.advance(10);
    let layout = f.modal.layout(SCREEN, BODY).expect("mounted");

    let inside = (layout.body.x, layout.body.y);
    assert_eq!(f.click(inside.0, inside.1), None);
    assert_eq!(f.click(layout.content.x, layout.content.y), None);
    assert_eq!(f.closes.get(), 0);

    assert_eq!(f.click(0, 0), Some(DismissReason::Backdrop));
    assert_eq!(f.closes.get(), 1);
}

#[test]
fn close_button_requests_close() {
    let f = fixture(ModalProps::new().close_text("Got it"));
    f.modal.set_requested_open(true);
    let layout = f.modal.layout(SCREEN, BODY).expect("mounted");
    let b = layout.close_button;
    assert_eq!(f.click(b.x, b.y), Some(DismissReason::CloseButton));
    assert_eq!(f.closes.get(), 1);
}

#[test]
fn non_primary_buttons_are_ignored() {
    let f = fixture(ModalProps::default());
    f.modal.set_requested_open(true);
    f.modal.layout(SCREEN, BODY);
    let right = MouseEvent::new(MouseEventKind::Down(MouseButton::Right), 0, 0);
    let release = MouseEvent::new(MouseEventKind::Up(MouseButton::Left), 0, 0);
    assert_eq!(f.modal.handle_mouse(&right), None);
    assert_eq!(f.modal.handle_mouse(&release), None);
    assert_eq!(f.closes.get(), 0);
}

#[test]
fn non_dismissible_backdrop() {
    let f = fixture(ModalProps::new().close_on_backdrop(false));
    f.modal.set_requested_open(true);
    f.modal.layout(SCREEN, BODY);
    assert_eq!(f.click(0, 0), None);
    assert_eq!(f.closes.get(), 0);
}

#[test]
fn clicks_without_layout_do_nothing() {
    let f = fixture(ModalProps::default());
    assert_eq!(f.click(0, 0), None);
    f.modal.set_requested_open(true);
    assert_eq!(f.click(0, 0), None);
}

#[test]
fn overlay_click_during_fade_out_still_reports() {
    let f = fixture(ModalProps::default());
    f.modal.set_requested_open(true);
    f.advance(10);
    f.modal.set_requested_open(false);
    f.modal.layout(SCREEN, BODY);
    assert_eq!(f.click(0, 0), Some(DismissReason::Backdrop));

    f.advance(300);
    assert_eq!(f.modal.last_layout(), None);
    assert_eq!(f.click(0, 0), None);
    assert_eq!(f.closes.get(), 1);
}

#[test]
fn pixel_metrics_slide_twenty() {
    let host = ModalHost::isolated();
    let closes = Rc::new(Cell::new(0u32));
    let c = Rc::clone(&closes);
    let modal = ModalController::new(ModalProps::default(), move || c.set(c.get() + 1), host.clone())
        .with_metrics(ModalMetrics::PIXELS);
    modal.set_requested_open(true);

    let screen = Rect::new(0, 0, 1280, 720);
    let body = Size::new(360, 40);
    let hidden = modal.layout(screen, body).expect("mounted");
    assert_eq!(modal.view(&()).expect("mounted").transition.content_offset_y, -20);

    host.timers.advance(ENTER_DELAY);
    let shown = modal.layout(screen, body).expect("mounted");
    assert_eq!(shown.content.y - hidden.content.y, 20);
    assert_eq!(shown.content.width, 400);
}

// =============================================================================
// Resources
// =============================================================================

#[test]
fn unmount_with_pending_timer_leaves_nothing() {
    for close_first in [false, true] {
        let f = fixture(ModalProps::default());
        f.modal.set_requested_open(true);
        if close_first {
            f.advance(10);
            f.modal.set_requested_open(false);
        }
        assert_eq!(f.host.timers.pending(), 1);

        let Fixture {
            host,
            modal,
            closes,
        } = f;
        drop(modal);
        assert_eq!(host.timers.pending(), 0);
        assert_eq!(host.keys.len(), 0);
        assert!(!host.page.is_locked());

        host.timers.advance(ms(1000));
        host.keys.dispatch(&KeyEvent::new(KeyCode::Escape));
        assert_eq!(closes.get(), 0);
    }
}

#[test]
fn two_modals_share_page_lock() {
    let page = Arc::new(PageScroll::new());
    page.set_overflow(Overflow::Scroll);
    let a = fixture_on(ModalProps::default(), ModalHost::with_page(Arc::clone(&page)));
    let b = fixture_on(ModalProps::default(), ModalHost::with_page(Arc::clone(&page)));

    a.modal.set_requested_open(true);
    b.modal.set_requested_open(true);
    assert_eq!(page.holders(), 2);

    a.modal.set_requested_open(false);
    a.advance(300);
    assert_eq!(page.overflow(), Overflow::Hidden);

    drop(b);
    assert_eq!(page.overflow(), Overflow::Scroll);
    assert!(!page.is_locked());
}

#[test]
fn runs_under_tracing_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;

    let subscriber =
        tracing_subscriber::registry().with(tracing_subscriber::fmt::layer().with_test_writer());
    tracing::subscriber::with_default(subscriber, || {
        let f = fixture(ModalProps::default());
        f.modal.set_requested_open(true);
        f.advance(10);
        f.escape();
        f.modal.set_requested_open(false);
        f.advance(300);
        assert_eq!(f.modal.phase(), ModalPhase::Closed);
    });
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Debug, Clone)]
enum Step {
    Request(bool),
    Advance(u64),
    Escape,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        any::<bool>().prop_map(Step::Request),
        (0u64..400).prop_map(Step::Advance),
        Just(Step::Escape),
    ]
}

proptest! {
    #[test]
    fn random_sequences_keep_invariants(
        fade in 0u64..500,
        steps in proptest::collection::vec(step(), 1..40),
    ) {
        let f = fixture(ModalProps::new().fade_duration(ms(fade)));
        let mut escapes_while_open = 0;

        for step in steps {
            match step {
                Step::Request(open) => f.modal.set_requested_open(open),
                Step::Advance(n) => f.advance(n),
                Step::Escape => {
                    if f.modal.is_open() {
                        escapes_while_open += 1;
                    }
                    f.escape();
                }
            }

            let s = f.modal.state();
            prop_assert!(!s.animating_in || s.mounted);
            prop_assert!(!s.animating_in || s.requested_open);
            prop_assert!(s.requested_open <= s.mounted);
            prop_assert!(f.host.timers.pending() <= 1);
            prop_assert_eq!(f.host.keys.len(), usize::from(s.requested_open));
            prop_assert_eq!(f.host.page.is_locked(), s.mounted);
        }
        prop_assert_eq!(f.closes.get(), escapes_while_open);

        let Fixture { host, modal, .. } = f;
        drop(modal);
        prop_assert_eq!(host.timers.pending(), 0);
        prop_assert!(host.keys.is_empty());
        prop_assert!(!host.page.is_locked());
    }
}
