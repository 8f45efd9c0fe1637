//! Text overlay: the controls hint and the live interaction message.

use crate::config::KeyBindings;
use crate::systems::MessageBoard;

/// One-line summary of the bindings, e.g.
/// `"W/A/S/D: Move | Space: Interact | Escape: Quit"`.
pub fn controls_hint(bindings: &KeyBindings) -> String {
    format!(
        "{}/{}/{}/{}: Move | {}: Interact | {}: Quit",
        bindings.up, bindings.left, bindings.down, bindings.right, bindings.interact, bindings.quit
    )
}

/// Overlay lines for one frame: the controls hint, then the live message in
/// brackets if there is one.
pub fn hud_lines(bindings: &KeyBindings, messages: &MessageBoard) -> Vec<String> {
    let mut lines = vec![controls_hint(bindings)];
    if let Some(message) = messages.current() {
        lines.push(format!("[{message}]"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn default_hint() {
        assert_eq!(
            controls_hint(&KeyBindings::default()),
            "W/A/S/D: Move | Space: Interact | Escape: Quit"
        );
    }

    #[test]
    fn hint_follows_rebinding() {
        let bindings = KeyBindings {
            interact: KeyCode::E,
            ..KeyBindings::default()
        };
        assert!(controls_hint(&bindings).contains("E: Interact"));
    }

    #[test]
    fn message_line_only_while_live() {
        let mut board = MessageBoard::default();
        assert_eq!(hud_lines(&KeyBindings::default(), &board).len(), 1);
        board.show("It's my favorite teddy bear!");
        let lines = hud_lines(&KeyBindings::default(), &board);
        assert_eq!(lines[1], "[It's my favorite teddy bear!]");
    }
}
