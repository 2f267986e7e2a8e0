/// Clamps a requested snapshot index. Anything outside `0..count` falls
/// back to the first snapshot.
pub fn resolve(count: usize, requested: isize) -> usize {
    match usize::try_from(requested) {
        Ok(idx) if idx < count => idx,
        _ => 0,
    }
}

/// Which match of the current demo is on screen. The stored index is kept
/// as requested and only clamped when read against a concrete count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: isize,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> isize {
        self.selected
    }

    pub fn select(&mut self, requested: isize) {
        self.selected = requested;
    }

    /// Resolves against `count` and stores the clamped value for the next query.
    pub fn current(&mut self, count: usize) -> usize {
        let idx = resolve(count, self.selected);
        self.selected = idx as isize;
        idx
    }

    pub fn select_next(&mut self, count: usize) {
        if count == 0 {
            self.selected = 0;
            return;
        }
        let idx = resolve(count, self.selected);
        self.selected = ((idx + 1) % count) as isize;
    }

    pub fn select_prev(&mut self, count: usize) {
        if count == 0 {
            self.selected = 0;
            return;
        }
        let idx = resolve(count, self.selected);
        let prev = if idx == 0 { count - 1 } else { idx - 1 };
        self.selected = prev as isize;
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionState, resolve};

    #[test]
    fn resolve_clamps_to_zero() {
        assert_eq!(resolve(3, 2), 2);
        assert_eq!(resolve(3, 3), 0);
        assert_eq!(resolve(3, -1), 0);
        assert_eq!(resolve(0, 0), 0);
        assert_eq!(resolve(0, 5), 0);
    }

    #[test]
    fn current_persists_clamped_index() {
        let mut sel = SelectionState::new();
        sel.select(4);
        assert_eq!(sel.current(5), 4);
        // Demo reloaded with fewer matches.
        assert_eq!(sel.current(2), 0);
        assert_eq!(sel.raw(), 0);
    }

    #[test]
    fn navigation_wraps() {
        let mut sel = SelectionState::new();
        sel.select_prev(3);
        assert_eq!(sel.raw(), 2);
        sel.select_next(3);
        assert_eq!(sel.raw(), 0);
        sel.select_next(0);
        assert_eq!(sel.raw(), 0);
    }
}
