//! Syntax tree produced by the parser
//!
//! One node per construct of the host dialect. Capturing groups carry their
//! 1-based index, assigned in left parenthesis order, so later stages never
//! renumber. `Display` renders a tree back to equivalent pattern source,
//! which is what `inspect` shows as the normalized pattern.

use std::fmt;

/// An expression in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Empty expression (matches empty string)
    Empty,

    /// A literal character
    Literal(char),

    /// Any character (dot)
    Any,

    /// A sequence of expressions (concatenation)
    Sequence(Vec<Expr>),

    /// Alternation (e.g., a|b|c)
    Alternation(Vec<Expr>),

    /// A character class [abc] or [^abc] or [a-z]
    CharacterClass(CharacterClass),

    /// Quantified expression (e.g., a*, a+, a?, a{3,5})
    Quantified {
        /// The expression being quantified
        expr: Box<Expr>,
        /// The quantifier
        quantifier: Quantifier,
    },

    /// A capturing group: (...)
    Group {
        /// 1-based capture index
        index: u32,
        /// The pattern inside the group
        expr: Box<Expr>,
    },

    /// A non-capturing group: (?:...)
    NonCapturingGroup(Box<Expr>),

    /// A named capturing group: (?<name>...)
    NamedGroup {
        /// 1-based capture index, shared with unnamed groups
        index: u32,
        /// The name of the group
        name: String,
        /// The pattern inside the group
        pattern: Box<Expr>,
    },

    /// Start of input (or line, in multiline mode) anchor (^)
    StartAnchor,

    /// End of input (or line, in multiline mode) anchor ($)
    EndAnchor,

    /// Backreference by number (\1, \2, etc.)
    Backreference(u32),

    /// Backreference by name (\k<name>)
    NamedBackreference(String),

    /// Character class shorthand (\w, \d, \s, \W, \D, \S)
    Shorthand(char),

    /// Word boundary assertion (\b)
    WordBoundary,

    /// Non-word boundary assertion (\B)
    NonWordBoundary,

    /// Positive lookahead assertion (?=pattern)
    Lookahead(Box<Expr>),

    /// Negative lookahead assertion (?!pattern)
    NegativeLookahead(Box<Expr>),

    /// Positive lookbehind assertion (?<=pattern)
    Lookbehind(Box<Expr>),

    /// Negative lookbehind assertion (?<!pattern)
    NegativeLookbehind(Box<Expr>),
}

/// A character class `[abc]`, `[^abc]`, or `[a-z]`
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterClass {
    /// Whether the class is negated [^...]
    pub negated: bool,
    /// The items in the class
    pub items: Vec<ClassItem>,
}

/// An item in a character class
#[derive(Debug, Clone, PartialEq)]
pub enum ClassItem {
    /// A single character
    Char(char),
    /// A character range (e.g., a-z)
    Range(char, char),
    /// A character class shorthand (\d, \w, \s, etc.)
    Shorthand(char),
    /// A property escape (\p{L}, \P{L})
    Property {
        /// Property name as written
        name: String,
        /// `\P` form
        negated: bool,
    },
}

/// A quantifier: `min` to `max` repetitions, `None` meaning unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    pub min: u32,
    pub max: Option<u32>,
    pub greedy: bool,
}

impl Quantifier {
    /// Zero or more (*)
    pub const fn zero_or_more() -> Self {
        Quantifier {
            min: 0,
            max: None,
            greedy: true,
        }
    }

    /// One or more (+)
    pub const fn one_or_more() -> Self {
        Quantifier {
            min: 1,
            max: None,
            greedy: true,
        }
    }

    /// Zero or one (?)
    pub const fn optional() -> Self {
        Quantifier {
            min: 0,
            max: Some(1),
            greedy: true,
        }
    }

    /// Between `min` and `max` times ({n}, {n,}, {n,m})
    pub const fn range(min: u32, max: Option<u32>) -> Self {
        Quantifier {
            min,
            max,
            greedy: true,
        }
    }

    /// The same bounds, matching as few repetitions as possible
    pub const fn lazy(self) -> Self {
        Quantifier {
            greedy: false,
            ..self
        }
    }

    /// Convert quantifier to regex string
    fn to_regex_string(self) -> String {
        let base = match (self.min, self.max) {
            (0, None) => "*".to_string(),
            (1, None) => "+".to_string(),
            (0, Some(1)) => "?".to_string(),
            (n, None) => format!("{{{},}}", n),
            (n, Some(m)) if n == m => format!("{{{}}}", n),
            (n, Some(m)) => format!("{{{},{}}}", n, m),
        };
        if self.greedy { base } else { base + "?" }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_regex_string())
    }
}

impl Expr {
    /// Create a literal expression
    pub fn literal(c: char) -> Self {
        Expr::Literal(c)
    }

    /// Create an Any expression (.)
    pub fn any() -> Self {
        Expr::Any
    }

    /// Create a sequence from a vector of expressions
    pub fn sequence(mut exprs: Vec<Expr>) -> Self {
        match exprs.len() {
            0 => Expr::Empty,
            1 => exprs.pop().unwrap_or(Expr::Empty),
            _ => Expr::Sequence(exprs),
        }
    }

    /// Create an alternation from a vector of expressions
    pub fn alternation(mut exprs: Vec<Expr>) -> Self {
        match exprs.len() {
            0 => Expr::Empty,
            1 => exprs.pop().unwrap_or(Expr::Empty),
            _ => Expr::Alternation(exprs),
        }
    }

    /// Create a character class
    pub fn char_class(negated: bool, items: Vec<ClassItem>) -> Self {
        Expr::CharacterClass(CharacterClass { negated, items })
    }

    /// Create a quantified expression
    pub fn quantified(expr: Expr, quantifier: Quantifier) -> Self {
        Expr::Quantified {
            expr: Box::new(expr),
            quantifier,
        }
    }

    /// Create a capturing group
    pub fn group(index: u32, expr: Expr) -> Self {
        Expr::Group {
            index,
            expr: Box::new(expr),
        }
    }

    /// Create a non-capturing group
    pub fn non_capturing_group(expr: Expr) -> Self {
        Expr::NonCapturingGroup(Box::new(expr))
    }

    /// Create a named group expression
    pub fn named_group(index: u32, name: impl Into<String>, pattern: Expr) -> Self {
        Expr::NamedGroup {
            index,
            name: name.into(),
            pattern: Box::new(pattern),
        }
    }

    /// Create a backreference by number
    pub fn backreference(n: u32) -> Self {
        Expr::Backreference(n)
    }

    /// Create a named backreference
    pub fn named_backreference(name: impl Into<String>) -> Self {
        Expr::NamedBackreference(name.into())
    }

    /// Whether this node is an assertion that consumes no input
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            Expr::StartAnchor
                | Expr::EndAnchor
                | Expr::WordBoundary
                | Expr::NonWordBoundary
                | Expr::Lookahead(_)
                | Expr::NegativeLookahead(_)
                | Expr::Lookbehind(_)
                | Expr::NegativeLookbehind(_)
        )
    }

    /// Capture index of a `Group` or `NamedGroup` node
    pub fn capture_index(&self) -> Option<u32> {
        match self {
            Expr::Group { index, .. } | Expr::NamedGroup { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Direct subexpressions, left to right
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::Sequence(exprs) | Expr::Alternation(exprs) => exprs.as_slice(),
            Expr::Group { expr, .. }
            | Expr::NamedGroup { pattern: expr, .. }
            | Expr::Quantified { expr, .. }
            | Expr::NonCapturingGroup(expr)
            | Expr::Lookahead(expr)
            | Expr::NegativeLookahead(expr)
            | Expr::Lookbehind(expr)
            | Expr::NegativeLookbehind(expr) => std::slice::from_ref(&**expr),
            _ => &[],
        }
    }

    /// Pre-order walk. Nodes are visited in the order their source text
    /// starts, so capturing groups come up in left parenthesis order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Lowest and highest capture index declared inside this expression
    pub fn capture_range(&self) -> Option<(u32, u32)> {
        let mut range: Option<(u32, u32)> = None;
        self.walk(&mut |node| {
            if let Some(index) = node.capture_index() {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(index), hi.max(index)),
                    None => (index, index),
                });
            }
        });
        range
    }

    /// Convert the AST back to pattern source
    pub fn to_regex_string(&self) -> String {
        match self {
            Expr::Empty => String::new(),
            Expr::Literal(c) => escape_char(*c, false),
            Expr::Any => ".".to_string(),
            Expr::Sequence(exprs) => exprs
                .iter()
                .map(|e| match e {
                    Expr::Alternation(_) => format!("(?:{})", e.to_regex_string()),
                    _ => e.to_regex_string(),
                })
                .collect(),
            Expr::Alternation(exprs) => {
                let parts: Vec<_> = exprs.iter().map(|e| e.to_regex_string()).collect();
                parts.join("|")
            }
            Expr::CharacterClass(cc) => cc.to_regex_string(),
            Expr::Quantified { expr, quantifier } => {
                let needs_parens = matches!(
                    expr.as_ref(),
                    Expr::Alternation(_) | Expr::Sequence(_) | Expr::Empty | Expr::Quantified { .. }
                );
                let expr_str = if needs_parens {
                    format!("(?:{})", expr.to_regex_string())
                } else {
                    expr.to_regex_string()
                };
                format!("{}{}", expr_str, quantifier)
            }
            Expr::Group { expr, .. } => format!("({})", expr.to_regex_string()),
            Expr::NonCapturingGroup(expr) => format!("(?:{})", expr.to_regex_string()),
            Expr::NamedGroup { name, pattern, .. } => {
                format!("(?<{}>{})", name, pattern.to_regex_string())
            }
            Expr::StartAnchor => "^".to_string(),
            Expr::EndAnchor => "$".to_string(),
            Expr::Backreference(n) => format!("\\{}", n),
            Expr::NamedBackreference(name) => format!("\\k<{}>", name),
            Expr::Shorthand(c) => format!("\\{}", c),
            Expr::WordBoundary => "\\b".to_string(),
            Expr::NonWordBoundary => "\\B".to_string(),
            Expr::Lookahead(expr) => format!("(?={})", expr.to_regex_string()),
            Expr::NegativeLookahead(expr) => format!("(?!{})", expr.to_regex_string()),
            Expr::Lookbehind(expr) => format!("(?<={})", expr.to_regex_string()),
            Expr::NegativeLookbehind(expr) => format!("(?<!{})", expr.to_regex_string()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_regex_string())
    }
}

impl CharacterClass {
    /// Convert character class to regex string
    fn to_regex_string(&self) -> String {
        let mut result = String::new();
        result.push('[');
        if self.negated {
            result.push('^');
        }
        for item in &self.items {
            match item {
                ClassItem::Char(c) => result.push_str(&escape_char(*c, true)),
                ClassItem::Range(start, end) => {
                    result.push_str(&escape_char(*start, true));
                    result.push('-');
                    result.push_str(&escape_char(*end, true));
                }
                ClassItem::Shorthand(c) => {
                    result.push('\\');
                    result.push(*c);
                }
                ClassItem::Property { name, negated } => {
                    result.push_str(if *negated { "\\P{" } else { "\\p{" });
                    result.push_str(name);
                    result.push('}');
                }
            }
        }
        result.push(']');
        result
    }
}

/// Render a literal so it reads back as the same character
fn escape_char(c: char, in_class: bool) -> String {
    match c {
        '\t' => "\\t".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\u{B}' => "\\v".to_string(),
        '\u{C}' => "\\f".to_string(),
        '\0' => "\\0".to_string(),
        ']' | '\\' | '^' | '-' if in_class => format!("\\{}", c),
        _ if in_class => c.to_string(),
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
        | '/' => format!("\\{}", c),
        c if c.is_control() && (c as u32) < 0x100 => format!("\\x{:02X}", c as u32),
        c => c.to_string(),
    }
}
