use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Keyword,
    Builtin,
    Str,
    Number,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*").unwrap());
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d[\d_]*(\.\d+)?").unwrap());

struct LanguageRules {
    line_comments: &'static [&'static str],
    block_comment: Option<(&'static str, &'static str)>,
    keywords: &'static [&'static str],
    builtins: &'static [&'static str],
}

static HCL: LanguageRules = LanguageRules {
    line_comments: &["#", "//"],
    block_comment: Some(("/*", "*/")),
    keywords: &[
        "resource", "variable", "output", "module", "provider", "data", "locals", "terraform",
        "backend", "for_each", "count", "depends_on", "lifecycle", "dynamic", "true", "false",
        "null",
    ],
    builtins: &["var", "local", "each", "path", "format", "length", "lookup", "merge", "toset"],
};

static BASH: LanguageRules = LanguageRules {
    line_comments: &["#"],
    block_comment: None,
    keywords: &[
        "if", "then", "else", "elif", "fi", "for", "in", "do", "done", "while", "case", "esac",
        "function", "export", "return", "local",
    ],
    builtins: &["echo", "cd", "set", "source", "sudo", "terraform", "az", "aws", "gcloud", "git"],
};

static JAVASCRIPT: LanguageRules = LanguageRules {
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    keywords: &[
        "const", "let", "var", "function", "return", "if", "else", "for", "while", "import",
        "export", "from", "default", "class", "new", "async", "await", "try", "catch", "throw",
        "true", "false", "null", "undefined",
    ],
    builtins: &["console", "require", "module", "JSON", "Promise"],
};

static JSON_RULES: LanguageRules = LanguageRules {
    line_comments: &[],
    block_comment: None,
    keywords: &["true", "false", "null"],
    builtins: &[],
};

static YAML: LanguageRules = LanguageRules {
    line_comments: &["#"],
    block_comment: None,
    keywords: &["true", "false", "null", "yes", "no"],
    builtins: &[],
};

fn language_rules(language: &str) -> Option<&'static LanguageRules> {
    match language.to_ascii_lowercase().as_str() {
        "hcl" | "terraform" | "tf" => Some(&HCL),
        "bash" | "sh" | "shell" | "zsh" => Some(&BASH),
        "javascript" | "js" | "typescript" | "ts" => Some(&JAVASCRIPT),
        "json" => Some(&JSON_RULES),
        "yaml" | "yml" => Some(&YAML),
        _ => None,
    }
}

/// Splits `code` into classified tokens. The tokens are a partition of the
/// input: concatenating their text reproduces `code` byte for byte. Unknown
/// language tags yield a single `Text` token, never an error.
pub fn highlight<'a>(language: &str, code: &'a str) -> Vec<Token<'a>> {
    let Some(rules) = language_rules(language) else {
        return vec![Token {
            kind: TokenKind::Text,
            text: code,
        }];
    };
    scan(rules, code)
}

fn scan<'a>(rules: &LanguageRules, code: &'a str) -> Vec<Token<'a>> {
    let mut tokens: Vec<Token<'a>> = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < code.len() {
        let rest = &code[pos..];
        let (kind, len) = match classify(rules, rest) {
            Some(hit) => hit,
            None => {
                pos += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            }
        };
        if text_start < pos {
            tokens.push(Token {
                kind: TokenKind::Text,
                text: &code[text_start..pos],
            });
        }
        tokens.push(Token {
            kind,
            text: &code[pos..pos + len],
        });
        pos += len;
        text_start = pos;
    }

    if text_start < code.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            text: &code[text_start..],
        });
    }
    if tokens.is_empty() {
        tokens.push(Token {
            kind: TokenKind::Text,
            text: code,
        });
    }
    tokens
}

fn classify(rules: &LanguageRules, rest: &str) -> Option<(TokenKind, usize)> {
    for marker in rules.line_comments {
        if rest.starts_with(marker) {
            let len = rest.find('\n').unwrap_or(rest.len());
            return Some((TokenKind::Comment, len));
        }
    }
    if let Some((open, close)) = rules.block_comment
        && rest.starts_with(open)
    {
        let len = match rest[open.len()..].find(close) {
            Some(idx) => open.len() + idx + close.len(),
            None => rest.len(),
        };
        return Some((TokenKind::Comment, len));
    }
    if rest.starts_with('"') || rest.starts_with('\'') {
        return Some((TokenKind::Str, quoted_len(rest)));
    }
    if let Some(found) = NUMBER_RE.find(rest) {
        return Some((TokenKind::Number, found.end()));
    }
    if let Some(found) = WORD_RE.find(rest) {
        let word = found.as_str();
        if rules.keywords.contains(&word) {
            return Some((TokenKind::Keyword, found.end()));
        }
        if rules.builtins.contains(&word) {
            return Some((TokenKind::Builtin, found.end()));
        }
        // Plain identifier; consumed as text so the scanner does not
        // re-match its tail against keyword prefixes.
        return Some((TokenKind::Text, found.end()));
    }
    None
}

fn quoted_len(rest: &str) -> usize {
    let mut chars = rest.char_indices();
    let (_, quote) = chars.next().expect("caller checked non-empty");
    let mut escaped = false;
    for (idx, ch) in chars {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\n' => return idx,
            _ if ch == quote => return idx + ch.len_utf8(),
            _ => {}
        }
    }
    rest.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(tokens: &[Token<'_>]) -> String {
        tokens.iter().map(|token| token.text).collect()
    }

    #[test]
    fn tokens_partition_the_input() {
        let code = "resource \"azurerm_storage_account\" \"sa\" {\n  count = 2 # two accounts\n}\n";
        let tokens = highlight("hcl", code);
        assert_eq!(joined(&tokens), code);
    }

    #[test]
    fn unknown_language_is_one_text_token() {
        let tokens = highlight("cobol", "MOVE A TO B.");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[0].text, "MOVE A TO B.");
    }

    #[test]
    fn classifies_hcl_pieces() {
        let tokens = highlight("hcl", "resource \"x\" { count = 1 } # done");
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Keyword && t.text == "resource"));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Str && t.text == "\"x\""));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Number && t.text == "1"));
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Comment && t.text == "# done"));
    }

    #[test]
    fn unterminated_string_runs_to_line_end() {
        let code = "name = \"oops\nnext";
        let tokens = highlight("hcl", code);
        assert_eq!(joined(&tokens), code);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Str && t.text == "\"oops"));
    }

    #[test]
    fn bash_command_names_are_builtins() {
        let tokens = highlight("bash", "terraform apply");
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Builtin && t.text == "terraform"));
    }
}
