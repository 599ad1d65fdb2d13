//! Input modes and key bindings

use crossterm::event::KeyCode;

/// Navigation key style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyBindings {
    /// Arrow keys only
    #[default]
    Arrows,
    /// Arrow keys plus h/j/k/l
    Vim,
}

/// Direction a navigation key points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Up,
    Down,
    /// Collapse a tree node, previous option in a form
    Left,
    /// Expand a tree node, next option in a form
    Right,
}

/// Who receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Panel navigation and shortcuts
    #[default]
    Normal,
    /// Typing into the search box
    Search,
    /// A creation modal has the keyboard
    Modal,
}

impl KeyBindings {
    pub fn from_vim_flag(vim: bool) -> Self {
        if vim { Self::Vim } else { Self::Arrows }
    }

    /// Map a key to a direction. Letters only count in normal mode since
    /// forms and the search box need them as text.
    pub fn nav(&self, key: KeyCode, mode: InputMode) -> Option<Nav> {
        match key {
            KeyCode::Up => Some(Nav::Up),
            KeyCode::Down => Some(Nav::Down),
            KeyCode::Left => Some(Nav::Left),
            KeyCode::Right => Some(Nav::Right),
            KeyCode::Char(c) if *self == Self::Vim && mode == InputMode::Normal => match c {
                'k' => Some(Nav::Up),
                'j' => Some(Nav::Down),
                'h' => Some(Nav::Left),
                'l' => Some(Nav::Right),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vim_letters_only_in_vim_normal_mode() {
        let vim = KeyBindings::from_vim_flag(true);
        assert_eq!(vim.nav(KeyCode::Char('j'), InputMode::Normal), Some(Nav::Down));
        assert_eq!(vim.nav(KeyCode::Char('j'), InputMode::Modal), None);
        assert_eq!(
            KeyBindings::Arrows.nav(KeyCode::Char('j'), InputMode::Normal),
            None
        );
    }

    #[test]
    fn test_arrows_work_everywhere() {
        for mode in [InputMode::Normal, InputMode::Search, InputMode::Modal] {
            assert_eq!(KeyBindings::Arrows.nav(KeyCode::Left, mode), Some(Nav::Left));
        }
    }
}
