// src/exec/template.rs

use crate::watch::EventRecord;

/// Render a job's command template against one event.
///
/// Recognized placeholders, written `$name` or `${name}`:
/// - `watched`: directory whose watch produced the event
/// - `filename`: full path of the affected entry
/// - `tflags`: textual event name
/// - `nflags`: numeric event mask
/// - `cookie`: move-cookie, `0` when the event carries none
///
/// Every substituted value is quoted as a single shell token (see
/// [`shell_quote`]), so the rendered string is safe to hand to `sh -c`
/// whatever the path contains. `$$` renders a literal `$`. Placeholder names
/// that are not recognized are left untouched rather than erroring, so a
/// partial or forward-looking template still renders.
pub fn render(template: &str, event: &EventRecord) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                out.push('$');
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                match substitute(&name, event) {
                    Some(value) if closed => out.push_str(&value),
                    _ => {
                        out.push_str("${");
                        out.push_str(&name);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            Some(&c) if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match substitute(&name, event) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('$');
                        out.push_str(&name);
                    }
                }
            }
            _ => out.push('$'),
        }
    }

    out
}

fn substitute(name: &str, event: &EventRecord) -> Option<String> {
    let raw = match name {
        "watched" => event.watched.to_string_lossy().into_owned(),
        "filename" => event.filename.to_string_lossy().into_owned(),
        "tflags" => event.tflags.to_string(),
        "nflags" => event.nflags.to_string(),
        "cookie" => event.cookie.unwrap_or(0).to_string(),
        _ => return None,
    };
    Some(shell_quote(&raw))
}

/// Quote a value as one literal shell token.
///
/// Wraps in single quotes; an embedded single quote closes the quote, emits
/// an escaped quote and reopens, so `a'b` becomes `'a'\''b'`.
pub fn shell_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}
