//! Path-command parser.
//!
//! Scans `M0 0 L10 5 h-3 z`-style command text into (name, values)
//! pairs. Numeric tokens keep their original spelling so transforms that
//! pass values through unchanged reproduce the input formatting.

/// One path command: a letter and its numeric arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub name: char,
    pub values: Vec<String>,
}

impl PathCommand {
    /// Render as `name` followed by space-joined values.
    pub fn render(&self) -> String {
        if self.values.is_empty() {
            self.name.to_string()
        } else {
            format!("{}{}", self.name, self.values.join(" "))
        }
    }
}

/// Parse result. `valid` is false when the text is not a pure command
/// sequence; callers fall back to treating the input as a plain list.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgPath {
    pub valid: bool,
    pub commands: Vec<PathCommand>,
}

impl SvgPath {
    fn invalid() -> Self {
        Self {
            valid: false,
            commands: Vec::new(),
        }
    }
}

/// Parse path-command text. Valid input starts with a command letter and
/// contains only command letters and numeric tokens (separated by spaces
/// or commas).
pub fn parse(text: &str) -> SvgPath {
    let mut commands: Vec<PathCommand> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut token = String::new();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            if !flush_token(&mut commands, &mut token) {
                return SvgPath::invalid();
            }
            commands.push(PathCommand {
                name: c,
                values: Vec::new(),
            });
            chars.next();
        } else if c.is_whitespace() || c == ',' {
            if !flush_token(&mut commands, &mut token) {
                return SvgPath::invalid();
            }
            chars.next();
        } else if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' {
            // a sign starts a new number even without a separator (`10-3`)
            if (c == '-' || c == '+') && !token.is_empty() {
                if !flush_token(&mut commands, &mut token) {
                    return SvgPath::invalid();
                }
            }
            token.push(c);
            chars.next();
        } else {
            return SvgPath::invalid();
        }
    }
    if !flush_token(&mut commands, &mut token) {
        return SvgPath::invalid();
    }
    SvgPath {
        valid: !commands.is_empty(),
        commands,
    }
}

/// Attach a pending numeric token to the current command. A token with
/// no preceding command, or one that is not a number, invalidates the
/// whole path.
fn flush_token(commands: &mut Vec<PathCommand>, token: &mut String) -> bool {
    if token.is_empty() {
        return true;
    }
    if token.parse::<f64>().is_err() {
        return false;
    }
    match commands.last_mut() {
        Some(command) => {
            command.values.push(std::mem::take(token));
            true
        }
        None => false,
    }
}
