//! Fail-soft arithmetic evaluator.
//!
//! Precedence (lowest → highest):
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `-`, function call, parens, literal, variable
//!
//! Everything is total: malformed input contributes zero, unknown
//! variables read as zero, and a non-finite result collapses to zero.
//! Operators feed this evaluator user-authored template text, so it must
//! never abort a render.

/// Evaluate `text` against a variable environment. Unknown variables and
/// unparseable input evaluate to zero.
pub fn eval(text: &str, vars: &[(&str, f64)]) -> f64 {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
        vars,
    };
    parser.skip_ws();
    if parser.at_end() {
        return 0.0;
    }
    let result = parser.parse_add();
    if result.is_finite() {
        result
    } else {
        0.0
    }
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    vars: &'a [(&'a str, f64)],
}

impl Parser<'_> {
    fn parse_add(&mut self) -> f64 {
        let mut left = self.parse_mul();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    left += self.parse_mul();
                }
                Some('-') => {
                    self.pos += 1;
                    left -= self.parse_mul();
                }
                _ => return left,
            }
        }
    }

    fn parse_mul(&mut self) -> f64 {
        let mut left = self.parse_unary();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    left *= self.parse_unary();
                }
                Some('/') => {
                    self.pos += 1;
                    left /= self.parse_unary();
                }
                Some('%') => {
                    self.pos += 1;
                    left %= self.parse_unary();
                }
                _ => return left,
            }
        }
    }

    fn parse_unary(&mut self) -> f64 {
        self.skip_ws();
        if self.peek() == Some('-') {
            self.pos += 1;
            return -self.parse_unary();
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> f64 {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.parse_add();
                self.skip_ws();
                if self.peek() == Some(')') {
                    self.pos += 1;
                }
                value
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == 'π' => self.parse_ident(),
            // anything else is junk: consume it and contribute zero
            Some(_) => {
                self.pos += 1;
                0.0
            }
            None => 0.0,
        }
    }

    fn parse_number(&mut self) -> f64 {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .parse()
            .unwrap_or(0.0)
    }

    fn parse_ident(&mut self) -> f64 {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == 'π') {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        self.skip_ws();
        if self.peek() == Some('(') {
            self.pos += 1;
            let args = self.parse_args();
            return apply_function(&name, &args);
        }
        match name.as_str() {
            "pi" | "π" => std::f64::consts::PI,
            "e" => std::f64::consts::E,
            _ => self
                .vars
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
                .unwrap_or(0.0),
        }
    }

    fn parse_args(&mut self) -> Vec<f64> {
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(')') => {
                    self.pos += 1;
                    return args;
                }
                None => return args,
                Some(',') => {
                    self.pos += 1;
                }
                _ => args.push(self.parse_add()),
            }
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

fn apply_function(name: &str, args: &[f64]) -> f64 {
    let a = args.first().copied().unwrap_or(0.0);
    let b = args.get(1).copied().unwrap_or(0.0);
    match name {
        "sin" => a.sin(),
        "cos" => a.cos(),
        "tan" => a.tan(),
        "abs" => a.abs(),
        "sqrt" => a.max(0.0).sqrt(),
        "floor" => a.floor(),
        "ceil" => a.ceil(),
        "round" => a.round(),
        "min" => a.min(b),
        "max" => a.max(b),
        "pow" => a.powf(b),
        _ => 0.0,
    }
}
