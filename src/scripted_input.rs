use bracket_terminal::prelude::VirtualKeyCode;
use log::warn;
use longway::RouteCommand;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    Route(RouteCommand),
    Reroll,
    Dump,
    Quit,
}

pub struct ScriptedInput {
    script_commands: Vec<InputAction>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut script_commands = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            for char_code in trimmed_line.chars() {
                if let Some(action) = char_to_action(char_code) {
                    script_commands.push(action);
                } else {
                    warn!("unknown key in script: {char_code:?}");
                }
            }
        }

        Ok(Self {
            script_commands,
            current_command_index: 0,
        })
    }

    pub fn next_action(&mut self) -> Option<InputAction> {
        let action = self.script_commands.get(self.current_command_index).copied()?;
        self.current_command_index += 1;
        Some(action)
    }

    pub fn len(&self) -> usize {
        self.script_commands.len()
    }
}

fn char_to_action(c: char) -> Option<InputAction> {
    use RouteCommand::*;
    match c {
        'a' | 'A' | 'h' | 'H' => Some(InputAction::Route(Left)),
        'd' | 'D' | 'l' | 'L' => Some(InputAction::Route(Right)),
        's' | 'S' | 'j' | 'J' => Some(InputAction::Route(Advance)),
        'w' | 'W' | 'k' | 'K' => Some(InputAction::Route(Back)),
        ']' => Some(InputAction::Route(NextAct)),
        '[' => Some(InputAction::Route(PrevAct)),
        'r' | 'R' => Some(InputAction::Reroll),
        'p' | 'P' => Some(InputAction::Dump),
        'q' | 'Q' | '\x1B' => Some(InputAction::Quit),
        '1'..='9' => c
            .to_digit(10)
            .map(|digit| InputAction::Route(ToggleSong(digit as usize - 1))),
        _ => None,
    }
}

/// Live keyboard mapping; mirrors the script vocabulary.
pub fn key_to_action(key: VirtualKeyCode) -> Option<InputAction> {
    use RouteCommand::*;
    match key {
        VirtualKeyCode::Left | VirtualKeyCode::A | VirtualKeyCode::H => {
            Some(InputAction::Route(Left))
        }
        VirtualKeyCode::Right | VirtualKeyCode::D | VirtualKeyCode::L => {
            Some(InputAction::Route(Right))
        }
        VirtualKeyCode::Down | VirtualKeyCode::S | VirtualKeyCode::J | VirtualKeyCode::Return => {
            Some(InputAction::Route(Advance))
        }
        VirtualKeyCode::Up | VirtualKeyCode::W | VirtualKeyCode::K => {
            Some(InputAction::Route(Back))
        }
        VirtualKeyCode::RBracket => Some(InputAction::Route(NextAct)),
        VirtualKeyCode::LBracket => Some(InputAction::Route(PrevAct)),
        VirtualKeyCode::R => Some(InputAction::Reroll),
        VirtualKeyCode::P => Some(InputAction::Dump),
        VirtualKeyCode::Q | VirtualKeyCode::Escape => Some(InputAction::Quit),
        VirtualKeyCode::Key1 => Some(InputAction::Route(ToggleSong(0))),
        VirtualKeyCode::Key2 => Some(InputAction::Route(ToggleSong(1))),
        VirtualKeyCode::Key3 => Some(InputAction::Route(ToggleSong(2))),
        VirtualKeyCode::Key4 => Some(InputAction::Route(ToggleSong(3))),
        VirtualKeyCode::Key5 => Some(InputAction::Route(ToggleSong(4))),
        VirtualKeyCode::Key6 => Some(InputAction::Route(ToggleSong(5))),
        VirtualKeyCode::Key7 => Some(InputAction::Route(ToggleSong(6))),
        VirtualKeyCode::Key8 => Some(InputAction::Route(ToggleSong(7))),
        VirtualKeyCode::Key9 => Some(InputAction::Route(ToggleSong(8))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_skips_comments_and_unknown_keys() {
        let text = "# walk the left edge\nll jj\n\n# swap act\n]?q\n";
        let mut script = ScriptedInput::from_reader(text.as_bytes()).unwrap();
        assert_eq!(script.len(), 6);
        assert_eq!(
            script.next_action(),
            Some(InputAction::Route(RouteCommand::Right))
        );
        assert_eq!(
            script.next_action(),
            Some(InputAction::Route(RouteCommand::Right))
        );
        assert_eq!(
            script.next_action(),
            Some(InputAction::Route(RouteCommand::Advance))
        );
        script.next_action();
        assert_eq!(
            script.next_action(),
            Some(InputAction::Route(RouteCommand::NextAct))
        );
        assert_eq!(script.next_action(), Some(InputAction::Quit));
        assert_eq!(script.next_action(), None);
    }

    #[test]
    fn keys_and_script_agree() {
        assert_eq!(key_to_action(VirtualKeyCode::J), char_to_action('j'));
        assert_eq!(key_to_action(VirtualKeyCode::R), char_to_action('r'));
        assert_eq!(key_to_action(VirtualKeyCode::LBracket), char_to_action('['));
        assert_eq!(key_to_action(VirtualKeyCode::Key3), char_to_action('3'));
        assert_eq!(key_to_action(VirtualKeyCode::F1), None);
    }

    #[test]
    fn digits_toggle_songs() {
        assert_eq!(
            char_to_action('1'),
            Some(InputAction::Route(RouteCommand::ToggleSong(0)))
        );
        assert_eq!(
            char_to_action('9'),
            Some(InputAction::Route(RouteCommand::ToggleSong(8)))
        );
        assert_eq!(char_to_action('0'), None);
    }
}
