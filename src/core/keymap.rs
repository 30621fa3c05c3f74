use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::shared::constants;

/// A keypress as the session understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    SaveAndNext,
    Skip,
    Skip10,
    Skip100,
    Skip1000,
    Previous,
    QuitVideo,
    /// Ends the whole run; handled by the session, never by [`resolve`].
    Exit,
    Other,
}

impl NavKey {
    pub fn from_char(c: char) -> Self {
        match c {
            constants::KEY_SAVE_AND_NEXT => NavKey::SaveAndNext,
            constants::KEY_SKIP => NavKey::Skip,
            constants::KEY_SKIP_10 => NavKey::Skip10,
            constants::KEY_SKIP_100 => NavKey::Skip100,
            constants::KEY_SKIP_1000 => NavKey::Skip1000,
            constants::KEY_PREVIOUS => NavKey::Previous,
            constants::KEY_QUIT_VIDEO => NavKey::QuitVideo,
            _ => NavKey::Other,
        }
    }

    pub fn from_event(key: &KeyEvent) -> Self {
        match key.code {
            KeyCode::Esc => NavKey::Exit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => NavKey::Exit,
            KeyCode::Char(c) => NavKey::from_char(c),
            _ => NavKey::Other,
        }
    }

    /// Forward step and look-ahead used by the skip family.
    fn forward_step(self) -> Option<usize> {
        match self {
            NavKey::SaveAndNext | NavKey::Skip => Some(1),
            NavKey::Skip10 => Some(10),
            NavKey::Skip100 => Some(100),
            NavKey::Skip1000 => Some(1000),
            _ => None,
        }
    }
}

/// Outcome of one keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub next_video: bool,
    pub save_frame: bool,
    pub index: usize,
}

/// Maps a key to the next frame index.
///
/// The index is not clamped against `total_frames`: once `next_video` is set
/// the caller must leave the video rather than display `index`.
pub fn resolve(key: NavKey, index: usize, total_frames: usize) -> Navigation {
    let mut nav = Navigation {
        next_video: false,
        save_frame: key == NavKey::SaveAndNext,
        index,
    };

    if let Some(step) = key.forward_step() {
        nav.index = index.saturating_add(step);
        nav.next_video = nav.index.saturating_add(step) >= total_frames;
        return nav;
    }

    match key {
        NavKey::Previous => nav.index = index.saturating_sub(1),
        NavKey::QuitVideo => nav.next_video = true,
        _ => {}
    }
    nav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_advances_by_one() {
        for total in 0..20 {
            for index in 0..25 {
                let nav = resolve(NavKey::Skip, index, total);
                assert_eq!(nav.index, index + 1);
                assert!(!nav.save_frame);
                assert_eq!(nav.next_video, index + 2 >= total);
            }
        }
    }

    #[test]
    fn test_save_and_next_sets_save_flag() {
        let nav = resolve(NavKey::SaveAndNext, 1, 3);
        assert_eq!(
            nav,
            Navigation { next_video: true, save_frame: true, index: 2 }
        );

        let nav = resolve(NavKey::SaveAndNext, 0, 10);
        assert_eq!(
            nav,
            Navigation { next_video: false, save_frame: true, index: 1 }
        );
    }

    #[test]
    fn test_large_skips_look_ahead_by_their_step() {
        let nav = resolve(NavKey::Skip10, 0, 25);
        assert_eq!((nav.index, nav.next_video), (10, false));
        let nav = resolve(NavKey::Skip10, 5, 25);
        assert_eq!((nav.index, nav.next_video), (15, true));

        let nav = resolve(NavKey::Skip100, 0, 201);
        assert_eq!((nav.index, nav.next_video), (100, false));
        let nav = resolve(NavKey::Skip100, 1, 201);
        assert_eq!((nav.index, nav.next_video), (101, true));

        // Index is allowed past the end; the flag is what counts.
        let nav = resolve(NavKey::Skip1000, 0, 50);
        assert_eq!((nav.index, nav.next_video), (1000, true));
    }

    #[test]
    fn test_previous_never_goes_below_zero() {
        assert_eq!(resolve(NavKey::Previous, 0, 5).index, 0);
        assert_eq!(resolve(NavKey::Previous, 3, 5).index, 2);
        assert!(!resolve(NavKey::Previous, 0, 5).next_video);
    }

    #[test]
    fn test_quit_and_unknown_keys_keep_index() {
        assert_eq!(
            resolve(NavKey::QuitVideo, 4, 10),
            Navigation { next_video: true, save_frame: false, index: 4 }
        );
        assert_eq!(
            resolve(NavKey::Other, 4, 10),
            Navigation { next_video: false, save_frame: false, index: 4 }
        );
    }

    #[test]
    fn test_key_events_map_to_nav_keys() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(NavKey::from_event(&press(KeyCode::Char('n'))), NavKey::SaveAndNext);
        assert_eq!(NavKey::from_event(&press(KeyCode::Char('3'))), NavKey::Skip1000);
        assert_eq!(NavKey::from_event(&press(KeyCode::Char('x'))), NavKey::Other);
        assert_eq!(NavKey::from_event(&press(KeyCode::Esc)), NavKey::Exit);
        assert_eq!(NavKey::from_event(&press(KeyCode::Left)), NavKey::Other);
        assert_eq!(
            NavKey::from_event(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            NavKey::Exit
        );
    }
}
