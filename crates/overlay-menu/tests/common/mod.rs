//! Shared fixtures for the integration tests: a scripted host standing in
//! for the game's input, clock, renderer and audio.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Once;

use overlay_menu::prelude::*;
use overlay_menu::{Clock, ManualClock};

/// Install a test-friendly subscriber once. Set `RUST_LOG=overlay_menu=trace`
/// to see engine logs in failing tests.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// An owned copy of one [`Frame`], kept for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub menu: MenuId,
    pub title: String,
    pub rows: Vec<String>,
    pub first_index: usize,
    pub selection: Option<usize>,
    pub counter: Option<String>,
}

/// Input, clock and sinks driven by the test script.
#[derive(Default)]
pub struct ScriptedHost {
    pub clock: ManualClock,
    held: HashSet<Direction>,
    pressed: HashSet<Action>,
    pub feedback: Vec<Feedback>,
    pub frames: Vec<RenderedFrame>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, direction: Direction) {
        self.held.insert(direction);
    }

    pub fn release(&mut self, direction: Direction) {
        self.held.remove(&direction);
    }

    /// Press an action for the next frame only.
    pub fn press(&mut self, action: Action) {
        self.pressed.insert(action);
    }

    /// Tick once at the current time, then let `frame_ms` pass.
    pub fn run_frame(&mut self, controller: &mut MenuController, tree: &mut MenuTree, frame_ms: u64) {
        controller.tick(tree, self);
        self.pressed.clear();
        self.clock.advance(frame_ms);
    }

    /// Run `count` frames of `frame_ms` each.
    pub fn run_frames(
        &mut self,
        controller: &mut MenuController,
        tree: &mut MenuTree,
        count: usize,
        frame_ms: u64,
    ) {
        for _ in 0..count {
            self.run_frame(controller, tree, frame_ms);
        }
    }

    pub fn last_frame(&self) -> Option<&RenderedFrame> {
        self.frames.last()
    }

    pub fn count(&self, feedback: Feedback) -> usize {
        self.feedback.iter().filter(|f| **f == feedback).count()
    }
}

impl InputSource for ScriptedHost {
    fn is_direction_held(&self, direction: Direction) -> bool {
        self.held.contains(&direction)
    }

    fn is_action_just_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }
}

impl Clock for ScriptedHost {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

impl FrameSink for ScriptedHost {
    fn on_frame(&mut self, frame: &Frame<'_>) {
        self.frames.push(RenderedFrame {
            menu: frame.menu,
            title: frame.title.to_string(),
            rows: frame.items.iter().map(|item| item.text().to_string()).collect(),
            first_index: frame.first_index,
            selection: frame.selection,
            counter: frame.counter.clone(),
        });
    }
}

impl FeedbackSink for ScriptedHost {
    fn notify(&mut self, feedback: Feedback) {
        self.feedback.push(feedback);
    }
}

/// A hidden menu with items labelled "0", "1", ...
pub fn numbered_menu(title: &str, count: usize) -> Menu {
    let mut menu = Menu::new(title);
    for n in 0..count {
        menu.add_item(Item::new(n.to_string()));
    }
    menu
}

/// A tree holding one open numbered menu.
pub fn open_numbered(count: usize, max_items_on_screen: usize) -> (MenuTree, MenuId) {
    let mut tree = MenuTree::new();
    let id = tree.add_menu(numbered_menu("Numbers", count).with_max_items_on_screen(max_items_on_screen));
    tree.open_menu(id);
    (tree, id)
}
