//! Full-screen preview navigation.
//!
//! [`PreviewState`] holds its own snapshot of the photo list taken when the
//! preview opens, so changing filters underneath an open preview does not
//! move it. Navigation is clamped at both ends and never wraps.
//!
//! Input arrives either as a [`Key`] or as a touch gesture fed through a
//! [`SwipeTracker`]; both reduce to a [`PreviewCommand`].

use crate::types::Photo;

/// Minimum horizontal travel, in pixels, for a touch to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewCommand {
    Close,
    Navigate(Direction),
}

/// Keys the preview reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Other,
}

impl Key {
    /// Parse a DOM-style key name (`"ArrowLeft"`, `"Escape"`, `" "`).
    /// Short aliases (`left`, `esc`, `space`) are accepted too.
    pub fn from_name(name: &str) -> Key {
        match name {
            " " => return Key::Space,
            "Escape" => return Key::Escape,
            "ArrowLeft" => return Key::ArrowLeft,
            "ArrowRight" => return Key::ArrowRight,
            "ArrowUp" => return Key::ArrowUp,
            "ArrowDown" => return Key::ArrowDown,
            _ => {}
        }
        match name.to_ascii_lowercase().as_str() {
            "esc" | "escape" => Key::Escape,
            "left" => Key::ArrowLeft,
            "right" => Key::ArrowRight,
            "up" => Key::ArrowUp,
            "down" => Key::ArrowDown,
            "space" => Key::Space,
            _ => Key::Other,
        }
    }

    pub fn command(self) -> Option<PreviewCommand> {
        match self {
            Key::Escape => Some(PreviewCommand::Close),
            Key::ArrowLeft | Key::ArrowUp => Some(PreviewCommand::Navigate(Direction::Prev)),
            Key::ArrowRight | Key::ArrowDown | Key::Space => {
                Some(PreviewCommand::Navigate(Direction::Next))
            }
            Key::Other => None,
        }
    }
}

/// Open/closed state plus the snapshot being browsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewState {
    is_open: bool,
    current_index: usize,
    photos: Vec<Photo>,
}

impl PreviewState {
    /// Closed, at index 0, with an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, photos: Vec<Photo>, index: usize) {
        self.is_open = true;
        self.photos = photos;
        self.current_index = index;
    }

    /// Close without discarding the snapshot or index.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Step one photo in `direction`; a no-op at either end.
    pub fn navigate(&mut self, direction: Direction) {
        match direction {
            Direction::Prev if self.can_go_prev() => self.current_index -= 1,
            Direction::Next if self.can_go_next() => self.current_index += 1,
            _ => {}
        }
    }

    pub fn apply(&mut self, command: PreviewCommand) {
        match command {
            PreviewCommand::Close => self.close(),
            PreviewCommand::Navigate(direction) => self.navigate(direction),
        }
    }

    /// Handle a key press. Keys are ignored while the preview is closed.
    /// Returns the command that was applied, if any.
    pub fn handle_key(&mut self, key: Key) -> Option<PreviewCommand> {
        if !self.is_open {
            return None;
        }
        let command = key.command()?;
        self.apply(command);
        Some(command)
    }

    /// Apply a completed swipe: rightward goes back, leftward goes forward.
    pub fn handle_swipe(&mut self, swipe: Swipe) {
        if self.is_open {
            self.navigate(swipe.direction());
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// The photo at the current index, if the snapshot has one there.
    pub fn current(&self) -> Option<&Photo> {
        self.photos.get(self.current_index)
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current_index + 1 < self.photos.len()
    }

    /// 1-based position and total, e.g. `(3, 12)` for "3 of 12".
    pub fn position(&self) -> (usize, usize) {
        (self.current_index + 1, self.photos.len())
    }
}

// ============================================================================
// Swipe detection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Left,
    Right,
}

impl Swipe {
    pub fn direction(self) -> Direction {
        match self {
            Swipe::Left => Direction::Next,
            Swipe::Right => Direction::Prev,
        }
    }
}

/// Tracks one touch from start to end.
///
/// A touch is a swipe when it travels more than `threshold` horizontally
/// and less than twice `threshold` vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeTracker {
    threshold: f64,
    start: Option<(f64, f64)>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    pub fn is_swiping(&self) -> bool {
        self.start.is_some()
    }

    /// Finish the touch. Returns `None` if no touch was in progress or the
    /// movement did not qualify.
    pub fn touch_end(&mut self, x: f64, y: f64) -> Option<Swipe> {
        let (start_x, start_y) = self.start.take()?;
        let dx = x - start_x;
        let dy = (y - start_y).abs();
        if dx.abs() > self.threshold && dy < self.threshold * 2.0 {
            Some(if dx > 0.0 { Swipe::Right } else { Swipe::Left })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn opened_at(index: usize) -> PreviewState {
        let mut state = PreviewState::new();
        state.open(uniform_photos(3, 800, 600), index);
        state
    }

    // =========================================================================
    // PreviewState
    // =========================================================================

    #[test]
    fn initial_state_is_closed_and_empty() {
        let state = PreviewState::new();
        assert!(!state.is_open());
        assert_eq!(state.current_index(), 0);
        assert!(state.photos().is_empty());
        assert!(state.current().is_none());
    }

    #[test]
    fn open_sets_snapshot_and_index() {
        let state = opened_at(1);
        assert!(state.is_open());
        assert_eq!(state.current().unwrap().filename, "p1.jpg");
        assert_eq!(state.position(), (2, 3));
    }

    #[test]
    fn prev_at_start_is_noop() {
        let mut state = opened_at(0);
        let before = state.clone();
        state.navigate(Direction::Prev);
        assert_eq!(state, before);
    }

    #[test]
    fn next_at_end_is_noop() {
        let mut state = opened_at(2);
        let before = state.clone();
        state.navigate(Direction::Next);
        assert_eq!(state, before);
        assert!(state.is_open());
        assert_eq!(state.photos().len(), 3);
    }

    #[test]
    fn navigation_steps_one_at_a_time() {
        let mut state = opened_at(0);
        state.navigate(Direction::Next);
        state.navigate(Direction::Next);
        assert_eq!(state.current_index(), 2);
        state.navigate(Direction::Prev);
        assert_eq!(state.current_index(), 1);
    }

    #[test]
    fn navigate_on_empty_snapshot_is_noop() {
        let mut state = PreviewState::new();
        state.navigate(Direction::Next);
        state.navigate(Direction::Prev);
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn close_keeps_snapshot_and_index() {
        let mut state = opened_at(2);
        state.close();
        assert!(!state.is_open());
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.photos().len(), 3);
    }

    #[test]
    fn reopen_replaces_snapshot() {
        let mut state = opened_at(2);
        state.close();
        state.open(uniform_photos(1, 10, 10), 0);
        assert_eq!(state.photos().len(), 1);
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn bounds_flags() {
        let state = opened_at(0);
        assert!(!state.can_go_prev());
        assert!(state.can_go_next());
        let state = opened_at(2);
        assert!(state.can_go_prev());
        assert!(!state.can_go_next());
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    #[test]
    fn key_bindings() {
        assert_eq!(Key::Escape.command(), Some(PreviewCommand::Close));
        for key in [Key::ArrowLeft, Key::ArrowUp] {
            assert_eq!(key.command(), Some(PreviewCommand::Navigate(Direction::Prev)));
        }
        for key in [Key::ArrowRight, Key::ArrowDown, Key::Space] {
            assert_eq!(key.command(), Some(PreviewCommand::Navigate(Direction::Next)));
        }
        assert_eq!(Key::Other.command(), None);
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("space"), Key::Space);
        assert_eq!(Key::from_name("ESC"), Key::Escape);
        assert_eq!(Key::from_name("Right"), Key::ArrowRight);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }

    #[test]
    fn keys_drive_navigation_and_close() {
        let mut state = opened_at(0);
        state.handle_key(Key::Space);
        state.handle_key(Key::ArrowDown);
        assert_eq!(state.current_index(), 2);
        state.handle_key(Key::ArrowUp);
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.handle_key(Key::Escape), Some(PreviewCommand::Close));
        assert!(!state.is_open());
    }

    #[test]
    fn keys_ignored_while_closed() {
        let mut state = opened_at(1);
        state.close();
        assert_eq!(state.handle_key(Key::ArrowRight), None);
        assert_eq!(state.current_index(), 1);
    }

    // =========================================================================
    // Swipes
    // =========================================================================

    #[test]
    fn leftward_swipe_is_left() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start(300.0, 200.0);
        assert!(tracker.is_swiping());
        assert_eq!(tracker.touch_end(200.0, 210.0), Some(Swipe::Left));
        assert!(!tracker.is_swiping());
    }

    #[test]
    fn rightward_swipe_is_right() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start(100.0, 200.0);
        assert_eq!(tracker.touch_end(151.0, 200.0), Some(Swipe::Right));
    }

    #[test]
    fn short_travel_is_not_a_swipe() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start(100.0, 200.0);
        assert_eq!(tracker.touch_end(150.0, 200.0), None);
    }

    #[test]
    fn mostly_vertical_travel_is_not_a_swipe() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start(100.0, 0.0);
        assert_eq!(tracker.touch_end(300.0, 100.0), None);
        tracker.touch_start(100.0, 0.0);
        assert_eq!(tracker.touch_end(300.0, 99.0), Some(Swipe::Right));
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut tracker = SwipeTracker::new(10.0);
        assert_eq!(tracker.touch_end(500.0, 0.0), None);
    }

    #[test]
    fn swipes_navigate_open_preview() {
        let mut state = opened_at(1);
        state.handle_swipe(Swipe::Left);
        assert_eq!(state.current_index(), 2);
        state.handle_swipe(Swipe::Right);
        state.handle_swipe(Swipe::Right);
        assert_eq!(state.current_index(), 0);
        state.close();
        state.handle_swipe(Swipe::Left);
        assert_eq!(state.current_index(), 0);
    }
}
