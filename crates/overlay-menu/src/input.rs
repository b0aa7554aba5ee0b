//! Input abstraction.
//!
//! The engine asks two questions each tick: is a direction held, and was an
//! action pressed this frame. [`InputSource`] is that seam. Hosts with raw
//! numeric controls can implement [`RawInput`] instead and wrap it in
//! [`MappedInput`] with a rebindable [`ControlMap`].

use serde::{Deserialize, Serialize};

/// A navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Previous row.
    Up,
    /// Next row.
    Down,
    /// Previous value, or back.
    Left,
    /// Next value.
    Right,
}

impl Direction {
    /// All directions, in the order the controller polls them.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// A one-shot action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Select the current item.
    Select,
    /// Go back.
    Back,
}

/// Polled once per tick by the [`MenuController`](crate::MenuController).
pub trait InputSource {
    /// Whether `direction` is held down right now.
    fn is_direction_held(&self, direction: Direction) -> bool;

    /// Whether `action` went down during this frame.
    fn is_action_just_pressed(&self, action: Action) -> bool;
}

impl<I: InputSource + ?Sized> InputSource for &I {
    fn is_direction_held(&self, direction: Direction) -> bool {
        (**self).is_direction_held(direction)
    }

    fn is_action_just_pressed(&self, action: Action) -> bool {
        (**self).is_action_just_pressed(action)
    }
}

/// A host-defined numeric control identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlCode(pub u32);

/// Either kind of control the map can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// A held direction.
    Direction(Direction),
    /// A one-shot action.
    Action(Action),
}

impl From<Direction> for Control {
    fn from(direction: Direction) -> Self {
        Self::Direction(direction)
    }
}

impl From<Action> for Control {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

/// Host control codes bound to each direction and action.
///
/// Any bound code triggers its control. An empty binding disables the
/// control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlMap {
    pub up: Vec<ControlCode>,
    pub down: Vec<ControlCode>,
    pub left: Vec<ControlCode>,
    pub right: Vec<ControlCode>,
    pub select: Vec<ControlCode>,
    pub back: Vec<ControlCode>,
}

impl Default for ControlMap {
    fn default() -> Self {
        Self {
            up: vec![ControlCode(172)],
            down: vec![ControlCode(173)],
            left: vec![ControlCode(174)],
            right: vec![ControlCode(175)],
            select: vec![ControlCode(201), ControlCode(176)],
            back: vec![ControlCode(202), ControlCode(177)],
        }
    }
}

impl ControlMap {
    /// Codes bound to `control`.
    pub fn bindings(&self, control: impl Into<Control>) -> &[ControlCode] {
        match control.into() {
            Control::Direction(Direction::Up) => &self.up,
            Control::Direction(Direction::Down) => &self.down,
            Control::Direction(Direction::Left) => &self.left,
            Control::Direction(Direction::Right) => &self.right,
            Control::Action(Action::Select) => &self.select,
            Control::Action(Action::Back) => &self.back,
        }
    }

    fn bindings_mut(&mut self, control: Control) -> &mut Vec<ControlCode> {
        match control {
            Control::Direction(Direction::Up) => &mut self.up,
            Control::Direction(Direction::Down) => &mut self.down,
            Control::Direction(Direction::Left) => &mut self.left,
            Control::Direction(Direction::Right) => &mut self.right,
            Control::Action(Action::Select) => &mut self.select,
            Control::Action(Action::Back) => &mut self.back,
        }
    }

    /// Replace the codes bound to `control`.
    pub fn rebind(&mut self, control: impl Into<Control>, codes: Vec<ControlCode>) {
        *self.bindings_mut(control.into()) = codes;
    }

    /// Add one more code to `control`.
    pub fn bind(&mut self, control: impl Into<Control>, code: ControlCode) {
        let codes = self.bindings_mut(control.into());
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    /// Restore the default codes of `control`.
    pub fn reset(&mut self, control: impl Into<Control>) {
        let control = control.into();
        let defaults = Self::default().bindings(control).to_vec();
        *self.bindings_mut(control) = defaults;
    }
}

/// Raw per-code input state of the host.
pub trait RawInput {
    /// Whether `code` is held down.
    fn is_pressed(&self, code: ControlCode) -> bool;

    /// Whether `code` went down this frame.
    fn is_just_pressed(&self, code: ControlCode) -> bool;
}

/// Adapts a [`RawInput`] to [`InputSource`] through a [`ControlMap`].
#[derive(Debug, Clone)]
pub struct MappedInput<R> {
    raw: R,
    map: ControlMap,
}

impl<R: RawInput> MappedInput<R> {
    /// Wrap `raw` with `map`.
    pub fn new(raw: R, map: ControlMap) -> Self {
        Self { raw, map }
    }

    /// The wrapped raw input.
    pub fn raw(&self) -> &R {
        &self.raw
    }

    /// Mutable access to the wrapped raw input, for feeding it each frame.
    pub fn raw_mut(&mut self) -> &mut R {
        &mut self.raw
    }

    /// The control map.
    pub fn map(&self) -> &ControlMap {
        &self.map
    }

    /// Mutable access to the control map, for rebinding at runtime.
    pub fn map_mut(&mut self) -> &mut ControlMap {
        &mut self.map
    }
}

impl<R: RawInput> InputSource for MappedInput<R> {
    fn is_direction_held(&self, direction: Direction) -> bool {
        self.map
            .bindings(direction)
            .iter()
            .any(|&code| self.raw.is_pressed(code))
    }

    fn is_action_just_pressed(&self, action: Action) -> bool {
        self.map
            .bindings(action)
            .iter()
            .any(|&code| self.raw.is_just_pressed(code))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Default)]
    struct Keys {
        held: HashSet<ControlCode>,
        pressed: HashSet<ControlCode>,
    }

    impl RawInput for Keys {
        fn is_pressed(&self, code: ControlCode) -> bool {
            self.held.contains(&code)
        }

        fn is_just_pressed(&self, code: ControlCode) -> bool {
            self.pressed.contains(&code)
        }
    }

    #[test]
    fn test_mapped_input_uses_any_binding() {
        let mut input = MappedInput::new(Keys::default(), ControlMap::default());
        input.raw_mut().pressed.insert(ControlCode(176));
        assert!(input.is_action_just_pressed(Action::Select));
        assert!(!input.is_action_just_pressed(Action::Back));

        input.raw_mut().held.insert(ControlCode(173));
        assert!(input.is_direction_held(Direction::Down));
        assert!(!input.is_direction_held(Direction::Up));
    }

    #[test]
    fn test_rebind_and_reset() {
        let mut map = ControlMap::default();
        map.rebind(Direction::Up, vec![ControlCode(38)]);
        map.bind(Direction::Up, ControlCode(87));
        map.bind(Direction::Up, ControlCode(87));
        assert_eq!(map.bindings(Direction::Up), &[ControlCode(38), ControlCode(87)]);

        map.reset(Direction::Up);
        assert_eq!(map.bindings(Direction::Up), ControlMap::default().bindings(Direction::Up));
    }

    #[test]
    fn test_empty_binding_disables_control() {
        let mut map = ControlMap::default();
        map.rebind(Action::Back, Vec::new());
        let mut keys = Keys::default();
        keys.pressed.insert(ControlCode(202));
        let input = MappedInput::new(keys, map);
        assert!(!input.is_action_just_pressed(Action::Back));
    }

    #[test]
    fn test_direction_slots_are_distinct() {
        let slots: HashSet<_> = Direction::ALL.iter().map(|d| d.slot()).collect();
        assert_eq!(slots.len(), 4);
    }
}
