//! Abstract key events and a Vim-style key notation.
//!
//! ## Learning: Parsing with Iterators
//!
//! `parse_keys` walks a `Peekable<Chars>`: a plain character becomes a
//! key as-is, while `<` starts a bracketed name that is collected up to
//! the matching `>`. Errors are values (`KeyParseError`), not panics.

use thiserror::Error;

/// A single key event, as delivered by the host shell.
///
/// Control chords arrive as their ASCII control character (`Ctrl-R` is
/// `Char('\x12')`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Returns the control-chord key for a letter (`Key::ctrl('r')` is Ctrl-R).
    pub fn ctrl(c: char) -> Self {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Key::Char(((upper as u8) - b'@') as char)
        } else {
            Key::Char(c)
        }
    }

    /// Parses a key from its name ("esc", "enter", "left", ...) or a single character.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "esc" | "escape" => Some(Key::Escape),
            "bs" | "backspace" => Some(Key::Backspace),
            "cr" | "enter" | "return" => Some(Key::Enter),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "tab" => Some(Key::Char('\t')),
            "space" => Some(Key::Char(' ')),
            "lt" => Some(Key::Char('<')),
            _ if lower.starts_with("c-") && s.chars().count() == 3 => {
                s.chars().last().map(Key::ctrl)
            }
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char('<') => write!(f, "<lt>"),
            Key::Char('\t') => write!(f, "<Tab>"),
            // Only the controls `Key::ctrl` can produce get `<C-x>` notation.
            Key::Char(c @ '\x01'..='\x1a') => {
                write!(f, "<C-{}>", ((*c as u8) + b'`') as char)
            }
            Key::Char(c) => write!(f, "{}", c),
            Key::Escape => write!(f, "<Esc>"),
            Key::Backspace => write!(f, "<BS>"),
            Key::Enter => write!(f, "<CR>"),
            Key::Left => write!(f, "<Left>"),
            Key::Right => write!(f, "<Right>"),
            Key::Up => write!(f, "<Up>"),
            Key::Down => write!(f, "<Down>"),
        }
    }
}

/// Errors from [`parse_keys`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("Unknown key name: <{0}>")]
    Unknown(String),

    #[error("Unterminated key name starting with '<'")]
    Unterminated,
}

/// Parses a key script such as `"dd<Esc>ihello<CR>"` into key events.
///
/// Bracketed names are case-insensitive. A literal `<` is written `<lt>`.
pub fn parse_keys(script: &str) -> Result<Vec<Key>, KeyParseError> {
    let mut keys = Vec::new();
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '<' {
            keys.push(Key::Char(c));
            continue;
        }

        let mut name = String::new();
        loop {
            match chars.next() {
                Some('>') => break,
                Some(ch) => name.push(ch),
                None => return Err(KeyParseError::Unterminated),
            }
        }

        if name.chars().count() < 2 {
            return Err(KeyParseError::Unknown(name));
        }
        let key = Key::parse(&name).ok_or_else(|| KeyParseError::Unknown(name.clone()))?;
        keys.push(key);
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("Esc"), Some(Key::Escape));
        assert_eq!(Key::parse("enter"), Some(Key::Enter));
        assert_eq!(Key::parse("x"), Some(Key::Char('x')));
        assert_eq!(Key::parse("C-r"), Some(Key::Char('\x12')));
        assert_eq!(Key::parse("bogus"), None);
    }

    #[test]
    fn test_ctrl() {
        assert_eq!(Key::ctrl('r'), Key::Char('\x12'));
        assert_eq!(Key::ctrl('R'), Key::Char('\x12'));
    }

    #[test]
    fn test_parse_plain_chars() {
        let keys = parse_keys("dd").unwrap();
        assert_eq!(keys, vec![Key::Char('d'), Key::Char('d')]);
    }

    #[test]
    fn test_parse_named_keys() {
        let keys = parse_keys("ihi<Esc><C-r><lt><BS><CR><left>").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Char('i'),
                Key::Char('h'),
                Key::Char('i'),
                Key::Escape,
                Key::Char('\x12'),
                Key::Char('<'),
                Key::Backspace,
                Key::Enter,
                Key::Left,
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_keys("a<Nope>"),
            Err(KeyParseError::Unknown("Nope".to_string()))
        );
        assert_eq!(parse_keys("a<Esc"), Err(KeyParseError::Unterminated));
        assert_eq!(parse_keys("<>"), Err(KeyParseError::Unknown(String::new())));
    }

    #[test]
    fn test_display_uses_notation() {
        let keys = [Key::Escape, Key::Char('<'), Key::ctrl('r'), Key::Char('x')];
        let text: String = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(text, "<Esc><lt><C-r>x");
        assert_eq!(parse_keys(&text).unwrap(), keys);
    }

    #[test]
    fn test_display_of_unnamed_controls_parses_back() {
        for c in ['\0', '\x1b', '\x1c', '\x1f'] {
            let key = Key::Char(c);
            let text = key.to_string();
            assert!(!text.starts_with("<C-"), "{:?} shown as {}", c, text);
            assert_eq!(parse_keys(&text).unwrap(), vec![key]);
        }
        assert_eq!(Key::Char('\x01').to_string(), "<C-a>");
        assert_eq!(Key::Char('\x1a').to_string(), "<C-z>");
        assert_eq!(parse_keys("<C-z>").unwrap(), vec![Key::Char('\x1a')]);
    }
}
