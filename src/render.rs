use serde_json::Value;

/// Minimal logic-less template renderer over JSON data, covering the subset
/// the report and mail templates use:
///
/// - `{{name}}`       variable, HTML-escaped
/// - `{{{name}}}`     variable, inserted raw (pre-rendered fragments)
/// - `{{#name}}..{{/name}}` repeated section, once per array element with
///   that element as the lookup context; `{{#.}}` iterates the context
///   itself (a top-level array)
///
/// Escaping is not optional for the plain form: descriptions and names come
/// from upstream records and end up in HTML served back to a browser.
pub fn render(template: &str, data: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    render_into(&mut out, template, data);
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_into(out: &mut String, template: &str, ctx: &Value) {
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        rest = &rest[open..];

        if let Some(inner) = rest.strip_prefix("{{{") {
            let Some(close) = inner.find("}}}") else {
                break;
            };
            let name = inner[..close].trim();
            out.push_str(&value_text(lookup(ctx, name)));
            rest = &inner[close + 3..];
        } else if let Some(inner) = rest.strip_prefix("{{#") {
            let Some(close) = inner.find("}}") else {
                break;
            };
            let name = inner[..close].trim();
            let body_and_rest = &inner[close + 2..];
            let Some((body, after)) = split_section(body_and_rest, name) else {
                break;
            };
            if let Some(items) = lookup(ctx, name).and_then(Value::as_array) {
                for item in items {
                    render_into(out, body, item);
                }
            }
            rest = after;
        } else {
            let inner = &rest[2..];
            let Some(close) = inner.find("}}") else {
                break;
            };
            let name = inner[..close].trim();
            out.push_str(&escape_html(&value_text(lookup(ctx, name))));
            rest = &inner[close + 2..];
        }
    }
    out.push_str(rest);
}

/// Splits a section body from the text following its `{{/name}}` close tag,
/// skipping over nested sections of the same name.
fn split_section<'a>(text: &'a str, name: &str) -> Option<(&'a str, &'a str)> {
    let open_tag = format!("{{{{#{name}}}}}");
    let close_tag = format!("{{{{/{name}}}}}");
    let mut depth = 0usize;
    let mut pos = 0usize;

    loop {
        let next_open = text[pos..].find(&open_tag);
        let next_close = text[pos..].find(&close_tag)?;
        match next_open {
            Some(o) if o < next_close => {
                depth += 1;
                pos += o + open_tag.len();
            }
            _ if depth > 0 => {
                depth -= 1;
                pos += next_close + close_tag.len();
            }
            _ => {
                let close_at = pos + next_close;
                return Some((&text[..close_at], &text[close_at + close_tag.len()..]));
            }
        }
    }
}

fn lookup<'a>(ctx: &'a Value, name: &str) -> Option<&'a Value> {
    if name == "." {
        return Some(ctx);
    }
    ctx.get(name)
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
