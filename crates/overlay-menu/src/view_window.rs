//! Pagination over a menu's active view.
//!
//! A [`ViewWindow`] holds the current index and the offset of the first
//! visible row. It knows nothing about items; every operation takes the size
//! of the active view, so the same window stays valid across filtering and
//! removal as long as callers pass the new size.
//!
//! The visible slice is `[offset, offset + min(max_items_on_screen, size - offset))`
//! and the current index always lies inside it after a navigation call. The
//! offset is moved to keep it there; the index is never moved to fit the
//! offset.

use std::ops::Range;

/// Fewest rows a page may show.
pub const MIN_ITEMS_ON_SCREEN: usize = 3;
/// Most rows a page may show.
pub const MAX_ITEMS_ON_SCREEN: usize = 10;
/// Page size of a new window.
pub const DEFAULT_ITEMS_ON_SCREEN: usize = MAX_ITEMS_ON_SCREEN;

/// One up/down step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Index before the step.
    pub old_index: usize,
    /// Index after the step.
    pub new_index: usize,
}

impl Step {
    /// Whether the step went around an end of the list.
    pub fn wrapped(&self) -> bool {
        self.old_index.abs_diff(self.new_index) > 1
    }
}

/// Current index and scroll offset of one menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    max_items_on_screen: usize,
    current_index: usize,
    view_offset: usize,
}

impl Default for ViewWindow {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_ON_SCREEN)
    }
}

impl ViewWindow {
    /// Create a window showing up to `max_items_on_screen` rows (clamped).
    pub fn new(max_items_on_screen: usize) -> Self {
        Self {
            max_items_on_screen: clamp_page_size(max_items_on_screen),
            current_index: 0,
            view_offset: 0,
        }
    }

    /// Rows per page.
    pub fn max_items_on_screen(&self) -> usize {
        self.max_items_on_screen
    }

    /// Change the page size, clamped to
    /// [`MIN_ITEMS_ON_SCREEN`]..=[`MAX_ITEMS_ON_SCREEN`]. Returns the value
    /// actually used.
    ///
    /// The offset is not recomputed here; [`visible_range`](Self::visible_range)
    /// clamps it on read and the next navigation call repairs it.
    pub fn set_max_items_on_screen(&mut self, max_items_on_screen: usize) -> usize {
        self.max_items_on_screen = clamp_page_size(max_items_on_screen);
        self.max_items_on_screen
    }

    /// The current index.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Offset of the first visible row as stored.
    pub fn view_offset(&self) -> usize {
        self.view_offset
    }

    /// Largest useful offset for a view of `size` items.
    pub fn max_offset(&self, size: usize) -> usize {
        size.saturating_sub(self.max_items_on_screen)
    }

    /// The visible slice of a view of `size` items.
    pub fn visible_range(&self, size: usize) -> Range<usize> {
        let offset = self.view_offset.min(self.max_offset(size));
        let len = self.max_items_on_screen.min(size - offset);
        offset..offset + len
    }

    /// Whether `index` is on the visible page.
    pub fn is_visible(&self, index: usize, size: usize) -> bool {
        self.visible_range(size).contains(&index)
    }

    /// Move one row up, wrapping from the first row to the last.
    ///
    /// Returns `None` when there is nothing to move between (`size < 2`).
    pub fn go_up(&mut self, size: usize) -> Option<Step> {
        if size < 2 {
            return None;
        }
        self.view_offset = self.view_offset.min(self.max_offset(size));

        let old_index = self.current_index.min(size - 1);
        let new_index = if old_index == 0 { size - 1 } else { old_index - 1 };
        self.current_index = new_index;

        if !self.is_visible(new_index, size) {
            self.view_offset = match self.view_offset.checked_sub(1) {
                Some(offset) => offset,
                None => self.max_offset(size),
            };
        }
        self.ensure_visible(size);

        Some(Step {
            old_index,
            new_index,
        })
    }

    /// Move one row down, wrapping from the last row to the first.
    ///
    /// Returns `None` when there is nothing to move between (`size < 2`).
    pub fn go_down(&mut self, size: usize) -> Option<Step> {
        if size < 2 {
            return None;
        }
        self.view_offset = self.view_offset.min(self.max_offset(size));

        let old_index = self.current_index.min(size - 1);
        let new_index = if old_index > 0 && old_index >= size - 1 {
            0
        } else {
            old_index + 1
        };
        self.current_index = new_index;

        if !self.is_visible(new_index, size) {
            self.view_offset += 1;
        }
        if new_index == 0 {
            self.view_offset = 0;
        }
        self.ensure_visible(size);

        Some(Step {
            old_index,
            new_index,
        })
    }

    /// Jump straight to `index`.
    ///
    /// Without an explicit `offset`, the page is chosen so that `index` is
    /// the bottom row when it lies past the first page, and the first page
    /// otherwise. An explicit offset is clamped and then nudged until `index`
    /// is visible.
    pub fn refresh_index(&mut self, index: usize, offset: Option<usize>, size: usize) {
        if size == 0 {
            self.reset();
            return;
        }
        let index = index.min(size - 1);
        let offset = offset.unwrap_or(if index >= self.max_items_on_screen {
            index + 1 - self.max_items_on_screen
        } else {
            0
        });

        self.current_index = index;
        self.view_offset = offset.min(self.max_offset(size));
        self.ensure_visible(size);
    }

    /// Back to the first row of the first page.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.view_offset = 0;
    }

    /// Re-establish the window invariants after the view shrank or grew.
    pub fn clamp(&mut self, size: usize) {
        if size == 0 {
            self.reset();
            return;
        }
        self.current_index = self.current_index.min(size - 1);
        self.view_offset = self.view_offset.min(self.max_offset(size));
        self.ensure_visible(size);
    }

    /// Adjust after the item at `position` was removed from the view, leaving
    /// `size` items.
    ///
    /// Removing at or before the current row moves the current index back by
    /// one, saturating at zero.
    pub fn on_removed(&mut self, position: usize, size: usize) {
        if position <= self.current_index {
            self.current_index = self.current_index.saturating_sub(1);
        }
        self.clamp(size);
    }

    fn ensure_visible(&mut self, size: usize) {
        if self.current_index < self.view_offset {
            self.view_offset = self.current_index;
        } else if self.current_index >= self.view_offset + self.max_items_on_screen {
            self.view_offset = self.current_index + 1 - self.max_items_on_screen;
        }
        self.view_offset = self.view_offset.min(self.max_offset(size));
    }
}

fn clamp_page_size(value: usize) -> usize {
    value.clamp(MIN_ITEMS_ON_SCREEN, MAX_ITEMS_ON_SCREEN)
}
