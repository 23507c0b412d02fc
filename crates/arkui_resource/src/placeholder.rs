//! `printf`-style placeholder substitution for string and plural resources
//!
//! Supported forms: `%d`, `%s`, `%f`, an optional precision (`%.2f`), positional
//! arguments (`%1$s`, `%2$d`) and the `%%` literal. Sequential placeholders consume
//! arguments in order; positional ones do not advance the sequence. Placeholders without
//! a matching argument, and unknown conversions, are copied through unchanged.

use crate::object::ResourceParam;

const MAX_EXPANDED_BYTES: usize = 64 * 1024;
/// Larger `%.Nf` precisions are clamped to this
const MAX_PRECISION: usize = 20;

fn take_prefix_by_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Append `s`, truncated so `out` never exceeds the expansion limit. Returns true once full.
fn push_str_limited(out: &mut String, s: &str) -> bool {
    if out.len() >= MAX_EXPANDED_BYTES {
        return true;
    }
    let remaining = MAX_EXPANDED_BYTES - out.len();
    out.push_str(take_prefix_by_bytes(s, remaining));
    out.len() >= MAX_EXPANDED_BYTES
}

fn push_char_limited(out: &mut String, c: char) -> bool {
    if out.len() + c.len_utf8() > MAX_EXPANDED_BYTES {
        return true;
    }
    out.push(c);
    out.len() >= MAX_EXPANDED_BYTES
}

/// A parsed `%...` directive
struct Conversion {
    position: Option<usize>,
    precision: Option<usize>,
    conversion: char,
    /// Byte length of the directive, including the leading `%`
    len: usize,
}

/// Parse the directive starting right after a `%`
fn parse_conversion(rest: &str) -> Option<Conversion> {
    let bytes = rest.as_bytes();
    let mut i = 0;

    let digits_end = |from: usize| {
        let mut j = from;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        j
    };

    let mut position = None;
    let end = digits_end(0);
    if end > 0 && bytes.get(end) == Some(&b'$') {
        position = Some(rest[..end].parse::<usize>().ok().filter(|&p| p > 0)?);
        i = end + 1;
    }

    let mut precision = None;
    if bytes.get(i) == Some(&b'.') {
        let end = digits_end(i + 1);
        let digits: usize = rest[i + 1..end].parse().ok()?;
        precision = Some(digits.min(MAX_PRECISION));
        i = end;
    }

    let conversion = *bytes.get(i)? as char;
    if !matches!(conversion, 'd' | 's' | 'f') {
        return None;
    }
    Some(Conversion {
        position,
        precision,
        conversion,
        len: i + 2,
    })
}

fn render(param: &ResourceParam, conv: &Conversion) -> String {
    match (conv.conversion, param) {
        ('d', ResourceParam::Int(v)) => v.to_string(),
        ('d', ResourceParam::Float(v)) => (*v as i64).to_string(),
        ('f', ResourceParam::Int(v)) => match conv.precision {
            Some(p) => format!("{:.*}", p, *v as f64),
            None => v.to_string(),
        },
        ('f', ResourceParam::Float(v)) => match conv.precision {
            Some(p) => format!("{:.*}", p, v),
            None => v.to_string(),
        },
        (_, ResourceParam::Int(v)) => v.to_string(),
        (_, ResourceParam::Float(v)) => v.to_string(),
        (_, ResourceParam::Str(s)) => s.clone(),
    }
}

/// Substitute `args` into `template`
pub fn apply_placeholders(template: &str, args: &[ResourceParam]) -> String {
    if !template.contains('%') {
        return template.to_string();
    }

    let mut out = String::with_capacity(std::cmp::min(template.len() + 16, MAX_EXPANDED_BYTES));
    let mut next_arg = 0;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        if push_str_limited(&mut out, &rest[..pos]) {
            return out;
        }
        let after = &rest[pos + 1..];

        if after.starts_with('%') {
            if push_char_limited(&mut out, '%') {
                return out;
            }
            rest = &after[1..];
            continue;
        }

        let Some(conv) = parse_conversion(after) else {
            if push_char_limited(&mut out, '%') {
                return out;
            }
            rest = after;
            continue;
        };

        let index = match conv.position {
            Some(p) => p - 1,
            None => {
                next_arg += 1;
                next_arg - 1
            }
        };
        let directive = &rest[pos..pos + conv.len];
        let full = match args.get(index) {
            Some(param) => push_str_limited(&mut out, &render(param, &conv)),
            None => push_str_limited(&mut out, directive),
        };
        if full {
            return out;
        }
        rest = &rest[pos + conv.len..];
    }

    push_str_limited(&mut out, rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(values: &[ResourceParam]) -> Vec<ResourceParam> {
        values.to_vec()
    }

    #[test]
    fn sequential_placeholders() {
        let a = args(&["Ann".into(), 3.into()]);
        assert_eq!(apply_placeholders("%s has %d apples", &a), "Ann has 3 apples");
    }

    #[test]
    fn positional_placeholders_do_not_advance() {
        let a = args(&["x".into(), "y".into()]);
        assert_eq!(apply_placeholders("%2$s-%1$s-%s", &a), "y-x-x");
    }

    #[test]
    fn float_precision() {
        let a = args(&[1.23456.into(), 2.into()]);
        assert_eq!(apply_placeholders("%.2f / %.1f", &a), "1.23 / 2.0");
        assert_eq!(apply_placeholders("%f", &a), "1.23456");
    }

    #[test]
    fn huge_precision_is_clamped() {
        let a = args(&[1.5.into(), 2.into()]);
        let out = apply_placeholders("%.200000000f|%1$.99999999999999999999999f", &a);
        assert_eq!(out, format!("{:.20}|%1$.99999999999999999999999f", 1.5));
        assert_eq!(apply_placeholders("%2$.21f", &a), format!("{:.20}", 2.0));
    }

    #[test]
    fn literal_percent_and_unknown_conversions() {
        let a = args(&[50.into()]);
        assert_eq!(apply_placeholders("%d%% done %x", &a), "50% done %x");
        assert_eq!(apply_placeholders("100%", &a), "100%");
    }

    #[test]
    fn missing_arguments_stay_visible() {
        let a = args(&[1.into()]);
        assert_eq!(apply_placeholders("%d of %d (%3$s)", &a), "1 of %d (%3$s)");
        assert_eq!(apply_placeholders("%0$s", &a), "%0$s");
    }

    #[test]
    fn output_is_bounded() {
        let long = "é".repeat(MAX_EXPANDED_BYTES);
        let a = args(&[long.as_str().into()]);
        let out = apply_placeholders("%s%s", &[a[0].clone(), a[0].clone()]);
        assert!(out.len() <= MAX_EXPANDED_BYTES);
        assert!(out.is_char_boundary(out.len()));
    }
}
