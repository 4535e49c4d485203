//! Lightweight static analysis of a single Rust source file

use regex::Regex;

/// How a module refers to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `use crate::...`, `use super::...` or `use self::...`
    Use,
    /// `mod name;`
    Mod,
}

/// A module reference found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    /// Path segments starting with `crate`, `super` or `self`
    pub path: Vec<String>,
    pub line: usize,
}

/// Findings for one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceAnalysis {
    /// HTTP server entry points, e.g. `warp::serve (line 12)`
    pub entry_points: Vec<String>,
    /// Unbalanced delimiters or unterminated literals/comments
    pub parse_problem: Option<String>,
    pub references: Vec<Reference>,
}

/// Analyze Rust source text
pub fn analyze(source: &str) -> SourceAnalysis {
    let code = match strip_comments_and_literals(source) {
        Ok(code) => code,
        Err(problem) => {
            return SourceAnalysis {
                parse_problem: Some(problem),
                ..SourceAnalysis::default()
            }
        }
    };

    SourceAnalysis {
        entry_points: find_entry_points(&code),
        parse_problem: check_delimiters(&code),
        references: find_references(&code),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    out: String,
}

impl Lexer {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn prev_is_ident(&self) -> bool {
        self.pos > 0 && is_ident_char(self.chars[self.pos - 1])
    }

    /// Emit the current char unchanged
    fn keep(&mut self) {
        let c = self.chars[self.pos];
        if c == '\n' {
            self.line += 1;
        }
        self.out.push(c);
        self.pos += 1;
    }

    /// Replace the current char with a space, keeping newlines
    fn blank(&mut self) {
        let c = self.chars[self.pos];
        if c == '\n' {
            self.line += 1;
            self.out.push('\n');
        } else {
            self.out.push(' ');
        }
        self.pos += 1;
    }

    fn blank_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.pos < self.chars.len() {
                self.blank();
            }
        }
    }

    fn line_comment(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos] != '\n' {
            self.blank();
        }
    }

    fn block_comment(&mut self) -> Result<(), String> {
        let start = self.line;
        let mut depth = 0usize;
        loop {
            match (self.peek(0), self.peek(1)) {
                (None, _) => return Err(format!("unterminated block comment from line {start}")),
                (Some('/'), Some('*')) => {
                    depth += 1;
                    self.blank_n(2);
                }
                (Some('*'), Some('/')) => {
                    self.blank_n(2);
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => self.blank(),
            }
        }
    }

    /// `r"..."`, `r#"..."#`, `br"..."` and friends: (prefix length, hash count)
    fn raw_string_prefix(&self) -> Option<(usize, usize)> {
        if self.prev_is_ident() {
            return None;
        }
        let mut offset = match (self.peek(0), self.peek(1)) {
            (Some('r'), _) => 1,
            (Some('b'), Some('r')) => 2,
            _ => return None,
        };
        let mut hashes = 0;
        while self.peek(offset) == Some('#') {
            hashes += 1;
            offset += 1;
        }
        (self.peek(offset) == Some('"')).then_some((offset + 1, hashes))
    }

    fn raw_string(&mut self, prefix: usize, hashes: usize) -> Result<(), String> {
        let start = self.line;
        self.blank_n(prefix);
        loop {
            match self.peek(0) {
                None => return Err(format!("unterminated raw string from line {start}")),
                Some('"') if (1..=hashes).all(|i| self.peek(i) == Some('#')) => {
                    self.blank_n(hashes + 1);
                    return Ok(());
                }
                Some(_) => self.blank(),
            }
        }
    }

    fn string(&mut self, prefix: usize) -> Result<(), String> {
        let start = self.line;
        self.blank_n(prefix);
        loop {
            match self.peek(0) {
                None => return Err(format!("unterminated string literal from line {start}")),
                Some('\\') => self.blank_n(2),
                Some('"') => {
                    self.blank();
                    return Ok(());
                }
                Some(_) => self.blank(),
            }
        }
    }

    /// Char literal, or a lifetime/label which is kept as code
    fn quote(&mut self) {
        match (self.peek(1), self.peek(2)) {
            (Some('\\'), _) => {
                // quote, backslash and the escaped char: '\n', '\'', '\u{..}'
                self.blank_n(3);
                let mut budget = 10;
                while budget > 0 {
                    match self.peek(0) {
                        Some('\'') => {
                            self.blank();
                            break;
                        }
                        Some('\n') | None => break,
                        Some(_) => self.blank(),
                    }
                    budget -= 1;
                }
            }
            (Some(c), Some('\'')) if c != '\n' => self.blank_n(3),
            _ => self.keep(),
        }
    }
}

/// Replace comments and string/char literal contents with whitespace,
/// preserving line structure.
pub fn strip_comments_and_literals(source: &str) -> Result<String, String> {
    let mut lexer = Lexer {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        out: String::with_capacity(source.len()),
    };

    while let Some(c) = lexer.peek(0) {
        match (c, lexer.peek(1)) {
            ('/', Some('/')) => lexer.line_comment(),
            ('/', Some('*')) => lexer.block_comment()?,
            ('"', _) => lexer.string(1)?,
            ('b', Some('"')) if !lexer.prev_is_ident() => lexer.string(2)?,
            ('\'', _) => lexer.quote(),
            ('r', _) | ('b', _) => match lexer.raw_string_prefix() {
                Some((prefix, hashes)) => lexer.raw_string(prefix, hashes)?,
                None => lexer.keep(),
            },
            _ => lexer.keep(),
        }
    }

    Ok(lexer.out)
}

/// First delimiter imbalance in comment/literal-free code
pub fn check_delimiters(code: &str) -> Option<String> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut line = 1;

    for c in code.chars() {
        match c {
            '\n' => line += 1,
            '(' | '[' | '{' => stack.push((c, line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    None => return Some(format!("unexpected '{c}' at line {line}")),
                    Some((open, open_line)) if open != expected => {
                        return Some(format!(
                            "mismatched '{c}' at line {line} (closes '{open}' from line {open_line})"
                        ))
                    }
                    Some(_) => {}
                }
            }
            _ => {}
        }
    }

    stack
        .first()
        .map(|(open, open_line)| format!("unclosed '{open}' from line {open_line}"))
}

fn line_of(code: &str, offset: usize) -> usize {
    code[..offset].matches('\n').count() + 1
}

fn find_entry_points(code: &str) -> Vec<String> {
    let patterns = [
        ("warp::serve", r"\bwarp::serve\s*\("),
        ("#[tokio::main]", r"#\s*\[\s*tokio::main\b"),
    ];

    let mut found = Vec::new();
    for (label, pattern) in patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        for m in re.find_iter(code) {
            found.push(format!("{} (line {})", label, line_of(code, m.start())));
        }
    }
    found
}

fn find_references(code: &str) -> Vec<Reference> {
    let mut references = Vec::new();

    if let Ok(use_re) = Regex::new(r"\buse\s+((?:crate|super|self)\b[^;]*);") {
        for captures in use_re.captures_iter(code) {
            let line = captures.get(0).map_or(1, |m| line_of(code, m.start()));
            for path in expand_use_tree(&captures[1]) {
                references.push(Reference {
                    kind: ReferenceKind::Use,
                    path,
                    line,
                });
            }
        }
    }

    if let Ok(mod_re) = Regex::new(r"\bmod\s+([A-Za-z_][A-Za-z0-9_]*)\s*;") {
        for captures in mod_re.captures_iter(code) {
            let line = captures.get(0).map_or(1, |m| line_of(code, m.start()));
            references.push(Reference {
                kind: ReferenceKind::Mod,
                path: vec!["self".to_string(), captures[1].to_string()],
                line,
            });
        }
    }

    references
}

/// Flatten a use tree such as `crate::{a::B, c::{self, D}}` into paths.
///
/// Trailing `self` and `*` segments and `as` renames are dropped.
pub fn expand_use_tree(tree: &str) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    expand(&[], tree, &mut out);
    out
}

fn expand(prefix: &[String], tree: &str, out: &mut Vec<Vec<String>>) {
    let tree = tree.trim();
    if tree.is_empty() {
        return;
    }

    let mut path = prefix.to_vec();
    match (tree.find('{'), tree.rfind('}')) {
        (Some(open), Some(close)) if open < close => {
            path.extend(segments(&tree[..open], prefix.is_empty()));
            for item in split_top_level(&tree[open + 1..close]) {
                expand(&path, item, out);
            }
        }
        _ => {
            path.extend(segments(tree, prefix.is_empty()));
            if !path.is_empty() {
                out.push(path);
            }
        }
    }
}

fn segments(text: &str, leading: bool) -> Vec<String> {
    text.split("::")
        .filter_map(|segment| segment.split_whitespace().next())
        .enumerate()
        .filter(|(i, segment)| *segment != "*" && !(*segment == "self" && (*i > 0 || !leading)))
        .map(|(_, segment)| segment.to_string())
        .collect()
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&text[start..]);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(tree: &str) -> Vec<String> {
        expand_use_tree(tree)
            .into_iter()
            .map(|p| p.join("::"))
            .collect()
    }

    #[test]
    fn test_strip_keeps_lines_and_removes_literals() {
        let source = "let s = \"{ not code }\"; // }\nlet c = '{';\n/* { /* nested } */ */ fn f<'a>() {}\n";
        let code = strip_comments_and_literals(source).unwrap();
        assert_eq!(code.lines().count(), 3);
        assert!(!code.contains("not code"));
        assert!(code.contains("fn f<'a>() {}"));
        assert!(check_delimiters(&code).is_none());
    }

    #[test]
    fn test_raw_strings() {
        let source = "let s = r#\"a \" { b\"#; let t = br\"}\"; let u = b'}';";
        let code = strip_comments_and_literals(source).unwrap();
        assert!(check_delimiters(&code).is_none());
    }

    #[test]
    fn test_delimiter_problems() {
        assert_eq!(
            check_delimiters("fn main() {\n    foo(;\n}\n"),
            Some("mismatched '}' at line 3 (closes '(' from line 2)".to_string())
        );
        assert_eq!(
            check_delimiters("fn main() {\n"),
            Some("unclosed '{' from line 1".to_string())
        );
        assert_eq!(
            check_delimiters("}"),
            Some("unexpected '}' at line 1".to_string())
        );
    }

    #[test]
    fn test_unterminated_literal_is_a_problem() {
        let analysis = analyze("fn main() {\n let s = \"oops;\n}\n");
        assert_eq!(
            analysis.parse_problem.as_deref(),
            Some("unterminated string literal from line 2")
        );
    }

    #[test]
    fn test_entry_points() {
        let analysis = analyze(
            "#[tokio::main]\nasync fn main() {\n    warp::serve(routes).run(addr).await;\n}\n// warp::serve(x)\n",
        );
        assert_eq!(
            analysis.entry_points,
            vec!["warp::serve (line 3)", "#[tokio::main] (line 1)"]
        );
    }

    #[test]
    fn test_expand_use_tree() {
        assert_eq!(paths("crate::errors::ServiceError"), vec!["crate::errors::ServiceError"]);
        assert_eq!(
            paths("crate::{\n    market::{self, MarketLookup},\n    types::*,\n}"),
            vec!["crate::market", "crate::market::MarketLookup", "crate::types"]
        );
        assert_eq!(paths("super::*"), vec!["super"]);
        assert_eq!(paths("self::config::Config as Cfg"), vec!["self::config::Config"]);
    }

    #[test]
    fn test_references() {
        let analysis = analyze(
            "pub mod routes;\n#[cfg(test)] mod tests;\nmod inline { }\nuse crate::service::{PredictionService, Health};\nuse std::sync::Arc;\n",
        );
        let refs: Vec<_> = analysis
            .references
            .iter()
            .map(|r| (r.kind, r.path.join("::"), r.line))
            .collect();
        assert_eq!(
            refs,
            vec![
                (ReferenceKind::Use, "crate::service::PredictionService".to_string(), 4),
                (ReferenceKind::Use, "crate::service::Health".to_string(), 4),
                (ReferenceKind::Mod, "self::routes".to_string(), 1),
                (ReferenceKind::Mod, "self::tests".to_string(), 2),
            ]
        );
    }
}
