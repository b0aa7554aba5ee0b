//! The per-frame tick.
//!
//! [`MenuController::tick`] is the only entry point a host needs to call once
//! per frame. It polls input, drives the open menu through the repeat
//! navigator, reports audio/haptic cues and hands a [`Frame`] to the
//! renderer. Everything runs synchronously inside the call.
//!
//! # Example
//!
//! ```
//! use overlay_menu::prelude::*;
//! use overlay_menu_core::{Clock, ManualClock};
//!
//! struct Host {
//!     clock: ManualClock,
//!     down: bool,
//!     frames: usize,
//! }
//!
//! impl InputSource for Host {
//!     fn is_direction_held(&self, direction: Direction) -> bool {
//!         self.down && direction == Direction::Down
//!     }
//!     fn is_action_just_pressed(&self, _action: Action) -> bool {
//!         false
//!     }
//! }
//! impl Clock for Host {
//!     fn now_ms(&self) -> u64 {
//!         self.clock.now_ms()
//!     }
//! }
//! impl FrameSink for Host {
//!     fn on_frame(&mut self, _frame: &Frame<'_>) {
//!         self.frames += 1;
//!     }
//! }
//! impl FeedbackSink for Host {
//!     fn notify(&mut self, _feedback: Feedback) {}
//! }
//!
//! let mut tree = MenuTree::new();
//! let main = tree.add_menu(
//!     Menu::new("Main").with_item(Item::new("One")).with_item(Item::new("Two")),
//! );
//! tree.open_menu(main);
//!
//! let mut host = Host { clock: ManualClock::new(0), down: true, frames: 0 };
//! let mut controller = MenuController::default();
//! controller.tick(&mut tree, &mut host);
//!
//! assert_eq!(tree.current().map(Menu::current_index), Some(1));
//! assert_eq!(host.frames, 1);
//! ```

use overlay_menu_core::logging::{PerfSpan, span_names, targets};
use overlay_menu_core::Clock;

use crate::frame::Frame;
use crate::input::{Action, Direction, InputSource};
use crate::menu::{HorizontalOutcome, MenuId, SelectOutcome, SelectTarget};
use crate::navigator::{RepeatNavigator, RepeatSchedule};
use crate::tree::{BackOutcome, LeftOutcome, MenuTree};

/// Receives the open menu's visible page once per tick.
pub trait FrameSink {
    /// Draw `frame`.
    fn on_frame(&mut self, frame: &Frame<'_>);
}

/// Cues for audio or haptics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// An item was selected.
    Select,
    /// A select or value change hit a disabled item.
    Reject,
    /// The selection moved up or down.
    NavUpDown,
    /// A value moved left or right.
    NavLeftRight,
    /// A menu was closed by going back.
    Back,
}

/// Receives [`Feedback`] cues.
pub trait FeedbackSink {
    /// Play the cue.
    fn notify(&mut self, feedback: Feedback);
}

/// Drives a [`MenuTree`] from polled input, once per frame.
#[derive(Debug, Clone, Default)]
pub struct MenuController {
    navigator: RepeatNavigator,
    last_menu: Option<MenuId>,
}

impl MenuController {
    /// Create a controller with a custom repeat schedule.
    pub fn new(schedule: RepeatSchedule) -> Self {
        Self {
            navigator: RepeatNavigator::new(schedule),
            last_menu: None,
        }
    }

    /// The repeat state.
    pub fn navigator(&self) -> &RepeatNavigator {
        &self.navigator
    }

    /// Run one frame.
    ///
    /// Back is handled before select, and both before the held directions.
    /// Whenever the open menu changes, including through an action in this
    /// same tick, held directions stop repeating until released. While no
    /// menu is open only releases are tracked and nothing is drawn.
    pub fn tick<H>(&mut self, tree: &mut MenuTree, host: &mut H)
    where
        H: InputSource + Clock + FrameSink + FeedbackSink,
    {
        let _span = PerfSpan::new(span_names::TICK);

        let now = host.now_ms();
        if !self.track_menu(tree, false) {
            self.observe_releases(&*host, now);
            return;
        }

        if host.is_action_just_pressed(Action::Back) {
            if tree.go_back() != BackOutcome::Ignored {
                host.notify(Feedback::Back);
            }
        } else if host.is_action_just_pressed(Action::Select) {
            match tree.select(SelectTarget::Current) {
                SelectOutcome::Selected { .. } => host.notify(Feedback::Select),
                SelectOutcome::Rejected { .. } => host.notify(Feedback::Reject),
                SelectOutcome::Ignored => {}
            }
        }

        for direction in Direction::ALL {
            if !self.track_menu(tree, true) {
                break;
            }
            let held = host.is_direction_held(direction);
            if !self.navigator.update(direction, held, now) {
                continue;
            }
            if let Some(feedback) = Self::step(tree, direction) {
                host.notify(feedback);
            }
        }

        self.track_menu(tree, true);
        if let Some(menu) = tree.current() {
            host.on_frame(&Frame::capture(menu));
        }
    }

    /// Note the open menu, cancelling repeats if it changed. Returns whether
    /// a menu is open.
    ///
    /// A change caused inside this tick also silences keys that were held
    /// but not yet polled, so one press never acts on two menus.
    fn track_menu(&mut self, tree: &MenuTree, within_tick: bool) -> bool {
        let current = tree.current_menu();
        if current != self.last_menu {
            tracing::debug!(
                target: targets::CONTROLLER,
                from = ?self.last_menu,
                to = ?current,
                within_tick,
                "open menu changed, cancelling held keys"
            );
            if within_tick {
                self.navigator.suppress_all();
            } else {
                self.navigator.cancel();
            }
            self.last_menu = current;
        }
        current.is_some()
    }

    /// Forget directions that are no longer held, so a key suppressed when
    /// the hierarchy closed steps again on its next press.
    fn observe_releases<I: InputSource>(&mut self, input: &I, now_ms: u64) {
        for direction in Direction::ALL {
            if !input.is_direction_held(direction) {
                self.navigator.update(direction, false, now_ms);
            }
        }
    }

    fn step(tree: &mut MenuTree, direction: Direction) -> Option<Feedback> {
        match direction {
            Direction::Up => tree.go_up().then_some(Feedback::NavUpDown),
            Direction::Down => tree.go_down().then_some(Feedback::NavUpDown),
            Direction::Left => match tree.go_left() {
                LeftOutcome::Horizontal(outcome) => horizontal_feedback(outcome),
                LeftOutcome::Back(BackOutcome::Ignored) => None,
                LeftOutcome::Back(_) => Some(Feedback::Back),
            },
            Direction::Right => horizontal_feedback(tree.go_right()),
        }
    }
}

fn horizontal_feedback(outcome: HorizontalOutcome) -> Option<Feedback> {
    match outcome {
        HorizontalOutcome::Changed(_) | HorizontalOutcome::Unchanged(_) => {
            Some(Feedback::NavLeftRight)
        }
        HorizontalOutcome::Rejected(_) => Some(Feedback::Reject),
        HorizontalOutcome::Ignored | HorizontalOutcome::Unhandled => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use overlay_menu_core::ManualClock;

    use super::*;
    use crate::item::Item;
    use crate::menu::Menu;

    #[derive(Default)]
    struct Host {
        clock: ManualClock,
        held: HashSet<Direction>,
        pressed: HashSet<Action>,
        feedback: Vec<Feedback>,
        frames: Vec<(MenuId, Option<usize>)>,
    }

    impl InputSource for Host {
        fn is_direction_held(&self, direction: Direction) -> bool {
            self.held.contains(&direction)
        }

        fn is_action_just_pressed(&self, action: Action) -> bool {
            self.pressed.contains(&action)
        }
    }

    impl Clock for Host {
        fn now_ms(&self) -> u64 {
            self.clock.now_ms()
        }
    }

    impl FrameSink for Host {
        fn on_frame(&mut self, frame: &Frame<'_>) {
            self.frames.push((frame.menu, frame.selection));
        }
    }

    impl FeedbackSink for Host {
        fn notify(&mut self, feedback: Feedback) {
            self.feedback.push(feedback);
        }
    }

    fn tree_with(count: usize) -> (MenuTree, MenuId) {
        let mut tree = MenuTree::new();
        let mut menu = Menu::new("Main");
        for n in 0..count {
            menu.add_item(Item::new(n.to_string()));
        }
        let id = tree.add_menu(menu);
        tree.open_menu(id);
        (tree, id)
    }

    #[test]
    fn test_no_open_menu_draws_nothing() {
        let mut tree = MenuTree::new();
        let mut host = Host::default();
        host.held.insert(Direction::Down);
        MenuController::default().tick(&mut tree, &mut host);
        assert!(host.frames.is_empty());
        assert!(host.feedback.is_empty());
    }

    #[test]
    fn test_held_down_repeats() {
        let (mut tree, id) = tree_with(5);
        let mut controller = MenuController::default();
        let mut host = Host::default();
        host.held.insert(Direction::Down);

        controller.tick(&mut tree, &mut host);
        host.clock.advance(100);
        controller.tick(&mut tree, &mut host);
        host.clock.advance(150);
        controller.tick(&mut tree, &mut host);

        assert_eq!(tree.menu(id).map(Menu::current_index), Some(2));
        assert_eq!(host.feedback, vec![Feedback::NavUpDown; 2]);
        assert_eq!(host.frames.len(), 3);
    }

    #[test]
    fn test_select_rejected_feedback() {
        let mut tree = MenuTree::new();
        let id = tree.add_menu(Menu::new("M").with_item(Item::new("Locked").with_enabled(false)));
        tree.open_menu(id);
        let mut host = Host::default();
        host.pressed.insert(Action::Select);
        MenuController::default().tick(&mut tree, &mut host);
        assert_eq!(host.feedback, vec![Feedback::Reject]);
    }

    #[test]
    fn test_back_exits_and_skips_frame() {
        let (mut tree, _) = tree_with(3);
        let mut host = Host::default();
        host.pressed.insert(Action::Back);
        host.held.insert(Direction::Down);
        MenuController::default().tick(&mut tree, &mut host);
        assert_eq!(host.feedback, vec![Feedback::Back]);
        assert!(host.frames.is_empty());
        assert!(!tree.is_open());
    }

    #[test]
    fn test_press_after_reopen_steps_at_once() {
        let (mut tree, id) = tree_with(5);
        let mut controller = MenuController::default();
        let mut host = Host::default();
        host.pressed.insert(Action::Back);
        controller.tick(&mut tree, &mut host);
        host.pressed.clear();
        assert!(!tree.is_open());

        host.clock.advance(16);
        controller.tick(&mut tree, &mut host);
        tree.open_menu(id);
        host.held.insert(Direction::Down);
        host.clock.advance(16);
        controller.tick(&mut tree, &mut host);
        assert_eq!(tree.menu(id).map(Menu::current_index), Some(1));
    }

    #[test]
    fn test_left_on_empty_menu_goes_back() {
        let (mut tree, _) = tree_with(0);
        let mut host = Host::default();
        host.held.insert(Direction::Left);
        MenuController::default().tick(&mut tree, &mut host);
        assert_eq!(host.feedback, vec![Feedback::Back]);
        assert!(!tree.is_open());
    }
}
