//! Input sanitization for form fields and uploaded file names.

use validator::ValidateEmail;

/// Single-line text: tags stripped, control characters dropped, whitespace
/// (line breaks included) collapsed to single spaces, trimmed.
pub fn sanitize_text(input: &str) -> String {
    let stripped = strip_tags(input);
    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    for c in stripped.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else if c.is_control() {
            continue;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    out
}

/// Multi-line text: like [`sanitize_text`] per line, but line breaks survive.
pub fn sanitize_textarea(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let stripped = strip_tags(&normalized);
    let lines: Vec<String> = stripped
        .split('\n')
        .map(|line| {
            line.chars()
                .map(|c| if c == '\t' { ' ' } else { c })
                .filter(|c| !c.is_control())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect();
    lines.join("\n").trim_matches('\n').trim().to_string()
}

/// Returns the cleaned address, or an empty string if it is not a valid email.
pub fn sanitize_email(input: &str) -> String {
    let candidate: String = input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-@".contains(*c))
        .collect();

    let Some((local, domain)) = candidate.rsplit_once('@') else {
        return String::new();
    };
    let normalized = format!("{local}@{}", domain.to_ascii_lowercase());
    if normalized.validate_email() {
        normalized
    } else {
        String::new()
    }
}

/// Integer coercion of the leading numeric part; anything else is 0.
/// `"12abc"` → 12, `" -3"` → -3, `"abc"` → 0.
pub fn parse_int_or_zero(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    // Overlong digit runs saturate instead of failing.
    match digits[..end].parse::<i64>() {
        Ok(n) => sign * n,
        Err(_) if sign < 0 => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Years of experience: non-negative, saturating at `i32::MAX`.
pub fn parse_years(input: &str) -> i32 {
    parse_int_or_zero(input).clamp(0, i64::from(i32::MAX)) as i32
}

/// Reduces a client-supplied file name to `[A-Za-z0-9._-]`, no leading dots,
/// no path components.
pub fn sanitize_file_name(input: &str) -> String {
    let base = input.rsplit(['/', '\\']).next().unwrap_or(input);
    let mut out = String::with_capacity(base.len());
    let mut last_dash = false;
    for c in base.trim().chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
            Some(c)
        } else if c == '-' || c.is_whitespace() {
            Some('-')
        } else {
            None
        };
        match mapped {
            Some('-') if last_dash => {}
            Some(c) => {
                last_dash = c == '-';
                out.push(c);
            }
            None => {}
        }
    }
    out.trim_start_matches(['.', '-'])
        .trim_end_matches(['.', '-'])
        .chars()
        .take(120)
        .collect()
}

/// Removes markup. A `<` only opens a tag when a letter, `/` or `!` follows
/// it and a closing `>` exists; any other `<` is ordinary text.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let opens_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
        match after.find('>') {
            Some(close) if opens_tag => rest = &after[close + 1..],
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
