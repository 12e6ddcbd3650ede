//! Lint: every `[X]` key hint drawn by `src/render.rs` must be tappable, and
//! tapping it must press the key it shows.
//!
//! Hints go through `ClickableList::push_clickable(line, key)`. A hint pushed
//! with plain `push()` renders fine but leaves a dead row on touch screens,
//! and a hint bound to a different key sends the wrong intent.

use std::fs;
use std::path::Path;

/// A `push(...)` or `push_clickable(...)` call found in the source.
#[derive(Debug)]
struct PushCall {
    line: usize,
    clickable: bool,
    /// Keys named by `[X]` hints inside string literals.
    hints: Vec<char>,
    /// Char literals among the arguments (the bound key is the last one).
    char_args: Vec<char>,
}

/// Keys shown as `[H]`, `[u]`, `[3]` in a string literal. `[{}]` placeholders
/// are filled at runtime and do not count.
fn hint_keys(text: &str) -> Vec<char> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .windows(3)
        .filter(|w| w[0] == '[' && w[2] == ']' && w[1].is_ascii_alphanumeric())
        .map(|w| w[1].to_ascii_lowercase())
        .collect()
}

/// Scan one call's arguments, starting just after its opening parenthesis.
/// Returns the call and the index just past its closing parenthesis.
fn scan_call(src: &[char], mut i: usize, line: usize, clickable: bool) -> (PushCall, usize) {
    let mut call = PushCall {
        line,
        clickable,
        hints: Vec::new(),
        char_args: Vec::new(),
    };
    let mut depth = 1;
    while i < src.len() && depth > 0 {
        match src[i] {
            '"' => {
                let start = i + 1;
                i += 1;
                while i < src.len() && src[i] != '"' {
                    if src[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
                let literal: String = src[start..i.min(src.len())].iter().collect();
                call.hints.extend(hint_keys(&literal));
            }
            '\'' if i + 2 < src.len() && src[i + 2] == '\'' => {
                call.char_args.push(src[i + 1].to_ascii_lowercase());
                i += 2;
            }
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    (call, i)
}

/// Find every `.push(` / `.push_clickable(` call, skipping `//` comment lines.
fn find_push_calls(source: &str) -> Vec<PushCall> {
    let code: String = source
        .lines()
        .map(|l| if l.trim_start().starts_with("//") { "" } else { l })
        .collect::<Vec<_>>()
        .join("\n");
    let src: Vec<char> = code.chars().collect();

    let mut calls = Vec::new();
    let mut line = 1;
    let mut i = 0;
    while i < src.len() {
        if src[i] == '\n' {
            line += 1;
        }
        let rest = || src[i..].iter().take(17).collect::<String>();
        let opener = if rest().starts_with(".push_clickable(") {
            Some((true, ".push_clickable(".len()))
        } else if rest().starts_with(".push(") {
            Some((false, ".push(".len()))
        } else {
            None
        };
        match opener {
            Some((clickable, len)) => {
                let (call, end) = scan_call(&src, i + len, line, clickable);
                line += src[i..end.min(src.len())].iter().filter(|c| **c == '\n').count();
                calls.push(call);
                i = end;
            }
            None => i += 1,
        }
    }
    calls
}

/// Human-readable problems with the calls in `source`.
fn violations(source: &str) -> Vec<String> {
    find_push_calls(source)
        .into_iter()
        .filter(|c| !c.hints.is_empty())
        .filter_map(|c| {
            if !c.clickable {
                return Some(format!("line {}: hint {:?} pushed without a click target", c.line, c.hints));
            }
            let bound = c.char_args.last().copied();
            let wrong: Vec<char> = c.hints.iter().copied().filter(|h| Some(*h) != bound).collect();
            (!wrong.is_empty())
                .then(|| format!("line {}: hint {:?} bound to key {:?}", c.line, wrong, bound))
        })
        .collect()
}

#[test]
fn render_key_hints_are_tappable() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/render.rs");
    let source = fs::read_to_string(&path).expect("src/render.rs should be readable");

    let found = violations(&source);
    assert!(
        found.is_empty(),
        "{}: key hints must use push_clickable with the matching key:\n  {}",
        path.display(),
        found.join("\n  ")
    );
}

#[test]
fn render_has_hints_to_check() {
    let source = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("src/render.rs"))
        .expect("src/render.rs should be readable");
    let hinted: Vec<char> = find_push_calls(&source)
        .into_iter()
        .flat_map(|c| c.hints)
        .collect();
    for key in ['h', 'u', 'c', 'r'] {
        assert!(hinted.contains(&key), "no [{}] hint found", key.to_ascii_uppercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_push_with_hint_is_flagged() {
        let src = r#"cl.push(Line::from(" [C] Keep playing"));"#;
        assert_eq!(violations(src).len(), 1);
    }

    #[test]
    fn clickable_hint_with_matching_key_passes() {
        let src = r#"cl.push_clickable(Line::from(" [R] Start over"), 'r');"#;
        assert!(violations(src).is_empty());
    }

    #[test]
    fn clickable_hint_with_wrong_key_is_flagged() {
        let src = r#"cl.push_clickable(Line::from(" [U] Bigger hands"), 'h');"#;
        let found = violations(src);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("'u'"), "{}", found[0]);
    }

    #[test]
    fn multi_line_call_is_scanned_whole() {
        let src = r#"
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [H] ", bold),
            Span::raw(format!("Harvest +{}", value)),
        ]),
        'h',
    );
    cl.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(" [2] ", bold),
    ]));
"#;
        let found = violations(src);
        assert_eq!(found.len(), 1, "{found:?}");
        assert!(found[0].starts_with("line 9:"), "{}", found[0]);
    }

    #[test]
    fn runtime_digit_keys_are_not_hints() {
        let src = r#"cl.push(Line::from(format!(" [{}] ", key)));"#;
        assert!(violations(src).is_empty());
    }

    #[test]
    fn commented_out_calls_are_ignored() {
        let src = r#"// cl.push(Line::from(" [H] Harvest"));"#;
        assert!(find_push_calls(src).is_empty());
    }

    #[test]
    fn hint_key_detection() {
        assert_eq!(hint_keys(" [H] Harvest [6] A-I"), vec!['h', '6']);
        assert!(hint_keys("[]").is_empty());
        assert!(hint_keys("[HH]").is_empty());
        assert!(hint_keys("[{}]").is_empty());
    }
}
