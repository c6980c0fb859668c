//! printf-style message formatting
//!
//! A log call takes a list of [`LogArg`]s. When the first one is a string it
//! is a template and the following arguments fill its placeholders in order:
//!
//! | placeholder | renders                                   |
//! |-------------|-------------------------------------------|
//! | `%s`        | the value as a plain string               |
//! | `%d`        | the value as a number (`NaN` if not one)  |
//! | `%i`        | the value truncated to an integer         |
//! | `%f`        | the value as a float                      |
//! | `%j`        | the value as JSON                         |
//! | `%o` `%O`   | the inspected value (4 / 2 levels deep)   |
//! | `%c`        | nothing (the argument is consumed)        |
//! | `%%`        | a literal `%`                             |
//!
//! A placeholder with no argument left stays as written. Arguments left over
//! after the template are appended, separated by single spaces. If the first
//! argument is not a string, all arguments are rendered and space-joined.
//!
//! Numbers print with the shortest round-trip digits and switch to exponent
//! form outside `1e-6 <= |x| < 1e21`. Inspected values are always one line:
//! strings single-quoted, objects as `{ key: value }` with keys in map order,
//! containers past the depth limit shown as `[Object]` / `[Array]`.

use serde_json::Value;

/// One argument of a log call
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Json(Value),
    Null,
}

impl From<&str> for LogArg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for LogArg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for LogArg {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<char> for LogArg {
    fn from(value: char) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<bool> for LogArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for LogArg {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for LogArg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Value> for LogArg {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<LogArg>> From<Option<T>> for LogArg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! impl_from_int {
    ($variant:ident as $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for LogArg {
                fn from(value: $ty) -> Self {
                    Self::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int as i64: i8, i16, i32, i64, isize);
impl_from_int!(UInt as u64: u8, u16, u32, u64, usize);

/// Format a log call's arguments into one message. Never fails.
pub fn format_message(args: &[LogArg]) -> String {
    let Some((first, rest)) = args.split_first() else {
        return String::new();
    };
    let LogArg::Str(template) = first else {
        return join_plain(args);
    };
    if rest.is_empty() {
        return template.clone();
    }

    let mut out = String::with_capacity(template.len() + 16 * rest.len());
    let mut remaining = rest.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&spec) = chars.peek() else {
            out.push('%');
            break;
        };
        if spec == '%' {
            chars.next();
            out.push('%');
            continue;
        }
        if !is_placeholder(spec) {
            out.push('%');
            continue;
        }
        chars.next();
        match remaining.next() {
            Some(arg) => render_placeholder(spec, arg, &mut out),
            None => {
                out.push('%');
                out.push(spec);
            }
        }
    }

    for arg in remaining {
        out.push(' ');
        push_plain(arg, &mut out);
    }
    out
}

fn is_placeholder(c: char) -> bool {
    matches!(c, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O' | 'c')
}

fn render_placeholder(spec: char, arg: &LogArg, out: &mut String) {
    match spec {
        's' => out.push_str(&as_string(arg)),
        'd' => out.push_str(&as_number_text(arg)),
        'i' => out.push_str(&as_integer_text(arg)),
        'f' => out.push_str(&js_number(as_float(arg))),
        'j' => out.push_str(&as_json(arg)),
        'o' => push_inspected(arg, OBJECT_DEPTH_O, out),
        'O' => push_inspected(arg, OBJECT_DEPTH, out),
        _ => {}
    }
}

fn join_plain(args: &[LogArg]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        push_plain(arg, &mut out);
    }
    out
}

/// Strings as-is, everything else inspected
fn push_plain(arg: &LogArg, out: &mut String) {
    match arg {
        LogArg::Str(s) => out.push_str(s),
        other => out.push_str(&inspect(other)),
    }
}

/// Render a float the way a number prints in log output: shortest
/// round-trip digits, exponent form outside `1e-6 <= |x| < 1e21`
/// (`1e+21`, `1.5e-7`), `NaN`, `Infinity`.
fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{value:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    value.to_string()
}

fn as_string(arg: &LogArg) -> String {
    match arg {
        LogArg::Str(s) => s.clone(),
        LogArg::Json(Value::String(s)) => s.clone(),
        LogArg::Float(f) => js_number(*f),
        LogArg::Json(value @ (Value::Array(_) | Value::Object(_))) => {
            let mut out = String::new();
            inspect_value(value, 0, &mut out);
            out
        }
        other => inspect(other),
    }
}

/// Numeric value of a string: surrounding whitespace ignored, empty is 0,
/// `Infinity` and `0x`/`0o`/`0b` literals accepted, anything else `NaN`
fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }
    // rejects `inf`, `nan` and friends
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Some(f64::NAN);
    }
    Some(
        u64::from_str_radix(digits, radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN),
    )
}

fn as_number(arg: &LogArg) -> f64 {
    match arg {
        LogArg::Str(s) => parse_number(s),
        LogArg::Int(i) => *i as f64,
        LogArg::UInt(u) => *u as f64,
        LogArg::Float(f) => *f,
        LogArg::Bool(b) => f64::from(u8::from(*b)),
        LogArg::Null => 0.0,
        LogArg::Json(value) => match value {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::String(s) => parse_number(s),
            Value::Array(_) | Value::Object(_) => f64::NAN,
        },
    }
}

fn as_number_text(arg: &LogArg) -> String {
    match arg {
        LogArg::Int(i) => i.to_string(),
        LogArg::UInt(u) => u.to_string(),
        other => js_number(as_number(other)),
    }
}

/// Leading integer prefix of a string (`"42px"` -> 42), `NaN` if none
fn parse_integer_prefix(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let digits_start = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return f64::NAN;
    }
    trimmed[..digits_start + digits_len]
        .parse()
        .unwrap_or(f64::NAN)
}

fn as_integer_text(arg: &LogArg) -> String {
    match arg {
        LogArg::Int(i) => i.to_string(),
        LogArg::UInt(u) => u.to_string(),
        LogArg::Float(f) => js_number(f.trunc()),
        LogArg::Str(s) => js_number(parse_integer_prefix(s)),
        LogArg::Json(Value::Number(n)) => js_number(n.as_f64().unwrap_or(f64::NAN).trunc()),
        LogArg::Json(Value::String(s)) => js_number(parse_integer_prefix(s)),
        _ => "NaN".to_string(),
    }
}

fn as_float(arg: &LogArg) -> f64 {
    match arg {
        LogArg::Str(s) | LogArg::Json(Value::String(s)) => parse_float_prefix(s),
        LogArg::Int(_) | LogArg::UInt(_) | LogArg::Float(_) => as_number(arg),
        LogArg::Json(Value::Number(_)) => as_number(arg),
        _ => f64::NAN,
    }
}

/// Longest leading decimal literal of a string (`"1.5kg"` -> 1.5), `NaN` if none
fn parse_float_prefix(s: &str) -> f64 {
    let trimmed = s.trim_start();
    for (literal, value) in [
        ("Infinity", f64::INFINITY),
        ("+Infinity", f64::INFINITY),
        ("-Infinity", f64::NEG_INFINITY),
    ] {
        if trimmed.starts_with(literal) {
            return value;
        }
    }

    let bytes = trimmed.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let mut end = usize::from(trimmed.starts_with(['+', '-']));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1 + usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    trimmed[..end].parse().unwrap_or(f64::NAN)
}

fn as_json(arg: &LogArg) -> String {
    match arg {
        LogArg::Str(s) => Value::String(s.clone()).to_string(),
        LogArg::Int(i) => i.to_string(),
        LogArg::UInt(u) => u.to_string(),
        LogArg::Float(f) if f.is_finite() => js_number(*f),
        LogArg::Float(_) | LogArg::Null => "null".to_string(),
        LogArg::Bool(b) => b.to_string(),
        LogArg::Json(value) => value.to_string(),
    }
}

/// Nesting shown by `%O` and for surplus arguments
const OBJECT_DEPTH: usize = 2;
/// Nesting shown by `%o`
const OBJECT_DEPTH_O: usize = 4;

/// Debug-style rendering: strings quoted, values as literals
fn inspect(arg: &LogArg) -> String {
    let mut out = String::new();
    push_inspected(arg, OBJECT_DEPTH, &mut out);
    out
}

fn push_inspected(arg: &LogArg, depth: usize, out: &mut String) {
    match arg {
        LogArg::Str(s) => push_quoted(s, out),
        LogArg::Int(i) => out.push_str(&i.to_string()),
        LogArg::UInt(u) => out.push_str(&u.to_string()),
        LogArg::Float(f) => out.push_str(&js_number(*f)),
        LogArg::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        LogArg::Null => out.push_str("null"),
        LogArg::Json(value) => inspect_value(value, depth, out),
    }
}

/// Single-line object literal style: `{ id: 7, tags: [ 'a', 'b' ] }`.
/// `depth` is how many levels of nested containers are expanded.
fn inspect_value(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => out.push_str(&i.to_string()),
            (None, Some(u)) => out.push_str(&u.to_string()),
            _ => out.push_str(&js_number(n.as_f64().unwrap_or(f64::NAN))),
        },
        Value::String(s) => push_quoted(s, out),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(fields) if fields.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str("[ ");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                push_nested(item, depth, out);
            }
            out.push_str(" ]");
        }
        Value::Object(fields) => {
            out.push_str("{ ");
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if is_identifier(key) {
                    out.push_str(key);
                } else {
                    push_quoted(key, out);
                }
                out.push_str(": ");
                push_nested(item, depth, out);
            }
            out.push_str(" }");
        }
    }
}

fn push_nested(value: &Value, depth: usize, out: &mut String) {
    match (value, depth.checked_sub(1)) {
        (Value::Array(_), None) => out.push_str("[Array]"),
        (Value::Object(_), None) => out.push_str("[Object]"),
        (_, remaining) => inspect_value(value, remaining.unwrap_or(0), out),
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Single quotes, or double quotes when the text contains a single quote
fn push_quoted(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fmt(args: Vec<LogArg>) -> String {
        format_message(&args)
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(format_message(&[]), "");
    }

    #[test]
    fn test_single_template_is_verbatim() {
        assert_eq!(fmt(vec!["100%% done %d".into()]), "100%% done %d");
    }

    #[test]
    fn test_positional_substitution() {
        assert_eq!(fmt(vec!["x=%d".into(), 5.into()]), "x=5");
        assert_eq!(
            fmt(vec!["%s took %d ms".into(), "query".into(), 12.into()]),
            "query took 12 ms"
        );
    }

    #[test]
    fn test_missing_args_keep_placeholder() {
        assert_eq!(fmt(vec!["%s and %d".into(), "a".into()]), "a and %d");
    }

    #[test]
    fn test_surplus_args_appended() {
        assert_eq!(
            fmt(vec!["count=%d".into(), 3.into(), "extra".into(), true.into()]),
            "count=3 extra true"
        );
        assert_eq!(fmt(vec!["hello".into(), "world".into()]), "hello world");
    }

    #[test]
    fn test_non_string_first_arg_joins_all() {
        assert_eq!(fmt(vec![5.into(), "a".into(), 1.5.into()]), "5 a 1.5");
    }

    #[test]
    fn test_percent_escape_and_unknown_specifier() {
        assert_eq!(fmt(vec!["%d%% %x".into(), 50.into()]), "50% %x");
        assert_eq!(fmt(vec!["trailing %".into(), 1.into()]), "trailing % 1");
    }

    #[test]
    fn test_number_conversions() {
        assert_eq!(fmt(vec!["%d".into(), "42".into()]), "42");
        assert_eq!(fmt(vec!["%d".into(), "abc".into()]), "NaN");
        assert_eq!(fmt(vec!["%d".into(), 2.0.into()]), "2");
        assert_eq!(fmt(vec!["%d".into(), true.into()]), "1");
        assert_eq!(fmt(vec!["%i".into(), 3.9.into()]), "3");
        assert_eq!(fmt(vec!["%i".into(), "42px".into()]), "42");
        assert_eq!(fmt(vec!["%f".into(), "1.25".into()]), "1.25");
        assert_eq!(fmt(vec!["%f".into(), f64::INFINITY.into()]), "Infinity");
    }

    #[test]
    fn test_json_and_inspect() {
        assert_eq!(fmt(vec!["%j".into(), "a".into()]), "\"a\"");
        assert_eq!(fmt(vec!["%j".into(), json!({"k": [1, 2]}).into()]), "{\"k\":[1,2]}");
        assert_eq!(fmt(vec!["%o".into(), "a".into()]), "'a'");
        assert_eq!(fmt(vec!["%s".into(), json!({"k": 1}).into()]), "{ k: 1 }");
        assert_eq!(fmt(vec!["%j".into(), f64::NAN.into()]), "null");
    }

    #[test]
    fn test_number_text_uses_exponent_outside_decimal_range() {
        assert_eq!(fmt(vec!["%d".into(), 1e21.into()]), "1e+21");
        assert_eq!(fmt(vec!["%d".into(), (-2.5e22).into()]), "-2.5e+22");
        assert_eq!(fmt(vec!["%s".into(), 1e-7.into()]), "1e-7");
        assert_eq!(fmt(vec!["%s".into(), 0.000001.into()]), "0.000001");
        assert_eq!(fmt(vec!["%d".into(), 1e20.into()]), "100000000000000000000");
        assert_eq!(fmt(vec!["%f".into(), 0.1.into()]), "0.1");
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(fmt(vec!["%d".into(), "inf".into()]), "NaN");
        assert_eq!(fmt(vec!["%d".into(), "nan".into()]), "NaN");
        assert_eq!(fmt(vec!["%d".into(), "Infinity".into()]), "Infinity");
        assert_eq!(fmt(vec!["%d".into(), " 12 ".into()]), "12");
        assert_eq!(fmt(vec!["%d".into(), "".into()]), "0");
        assert_eq!(fmt(vec!["%d".into(), "0x1f".into()]), "31");
        assert_eq!(fmt(vec!["%d".into(), "1e3".into()]), "1000");
        assert_eq!(fmt(vec!["%f".into(), "1.5kg".into()]), "1.5");
        assert_eq!(fmt(vec!["%f".into(), "inf".into()]), "NaN");
        assert_eq!(fmt(vec!["%f".into(), "-Infinity!".into()]), "-Infinity");
        assert_eq!(fmt(vec!["%f".into(), "".into()]), "NaN");
    }

    #[test]
    fn test_objects_render_in_inspect_style() {
        assert_eq!(fmt(vec!["a".into(), json!({"k": 1}).into()]), "a { k: 1 }");
        assert_eq!(
            fmt(vec!["%O".into(), json!({"id": 7, "my-key": null, "tags": ["x", "y"]}).into()]),
            "{ id: 7, 'my-key': null, tags: [ 'x', 'y' ] }"
        );
        assert_eq!(fmt(vec![json!([]).into(), json!({}).into()]), "[] {}");
        assert_eq!(fmt(vec!["%o".into(), "it's".into()]), "\"it's\"");
    }

    #[test]
    fn test_nesting_collapses_past_depth() {
        let nested = json!({"a": {"b": {"c": {"d": 1}}}});
        assert_eq!(
            fmt(vec!["%O".into(), nested.clone().into()]),
            "{ a: { b: { c: [Object] } } }"
        );
        assert_eq!(
            fmt(vec!["%o".into(), nested.clone().into()]),
            "{ a: { b: { c: { d: 1 } } } }"
        );
        assert_eq!(fmt(vec!["%s".into(), nested.into()]), "{ a: [Object] }");
        assert_eq!(fmt(vec!["%s".into(), json!([[1]]).into()]), "[ [Array] ]");
    }

    #[test]
    fn test_css_placeholder_consumes_arg() {
        assert_eq!(fmt(vec!["%cstyled".into(), "color: red".into()]), "styled");
    }

    #[test]
    fn test_option_and_null() {
        let none: Option<i32> = None;
        assert_eq!(fmt(vec!["v=%s".into(), none.into()]), "v=null");
        assert_eq!(fmt(vec!["v=%s".into(), Some(7).into()]), "v=7");
    }

    #[test]
    fn test_multibyte_template() {
        assert_eq!(fmt(vec!["温度=%d℃".into(), 21.into()]), "温度=21℃");
    }
}
