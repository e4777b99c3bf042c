use std::fmt::Write as _;

use ljs_core::errors::{ErrorInfo, SweepError};

/// Value bound to a template field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    /// Floating point value, formattable with a precision suffix.
    Number(f64),
    /// Raw text, inserted verbatim.
    Text(&'a str),
}

fn template_error(code: &str, message: impl Into<String>, template: &str) -> SweepError {
    SweepError::Template(ErrorInfo::new(code, message).with_context("template", template))
}

fn field_error(code: &str, message: &str, template: &str, field: &str) -> SweepError {
    SweepError::Template(
        ErrorInfo::new(code, message)
            .with_context("template", template)
            .with_context("field", field),
    )
}

/// Substitutes `fields` into `template`.
pub fn render(template: &str, fields: &[(&str, Field<'_>)]) -> Result<String, SweepError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(pos) = rest.find(|c| c == '{' || c == '}') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(template_error(
                "template_stray_brace",
                "closing brace without a placeholder",
                template,
            ));
        } else {
            let Some(end) = tail.find('}') else {
                return Err(template_error(
                    "template_unterminated",
                    "placeholder is missing its closing brace",
                    template,
                ));
            };
            render_placeholder(&mut out, &tail[1..end], fields, template)?;
            rest = &tail[end + 1..];
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn render_placeholder(
    out: &mut String,
    placeholder: &str,
    fields: &[(&str, Field<'_>)],
    template: &str,
) -> Result<(), SweepError> {
    let (name, spec) = match placeholder.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (placeholder, None),
    };
    let value = fields
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
        .ok_or_else(|| {
            field_error("template_unknown_field", "unknown template field", template, name)
        })?;
    match (value, spec) {
        (Field::Text(text), None) => out.push_str(text),
        (Field::Number(number), None) => {
            let _ = write!(out, "{number}");
        }
        (Field::Number(number), Some(spec)) => {
            let precision = parse_precision(spec).ok_or_else(|| {
                field_error("template_format", "unsupported format spec", template, name)
            })?;
            let _ = write!(out, "{number:.precision$}");
        }
        (Field::Text(_), Some(_)) => {
            return Err(field_error(
                "template_format",
                "text fields do not take a format spec",
                template,
                name,
            ));
        }
    }
    Ok(())
}

/// Widest precision a `{field:.Nf}` spec may ask for.
const MAX_PRECISION: usize = 17;

fn parse_precision(spec: &str) -> Option<usize> {
    if spec == "f" {
        return Some(6);
    }
    spec.strip_prefix('.')?
        .strip_suffix('f')?
        .parse()
        .ok()
        .filter(|&precision| precision <= MAX_PRECISION)
}
