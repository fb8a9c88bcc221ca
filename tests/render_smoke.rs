use incasso::render::{escape_html, render};
use serde_json::json;

#[test]
fn substitutes_and_escapes_variables() {
    let out = render("Hello {{name}}!", &json!({"name": "A & B <c>"}));
    assert_eq!(out, "Hello A &amp; B &lt;c&gt;!");
}

#[test]
fn triple_stache_inserts_raw() {
    let out = render("{{{fragment}}}", &json!({"fragment": "<b>bold</b>"}));
    assert_eq!(out, "<b>bold</b>");
}

#[test]
fn missing_variables_render_empty() {
    let out = render("[{{nope}}]", &json!({}));
    assert_eq!(out, "[]");
}

#[test]
fn sections_iterate_arrays() {
    let out = render(
        "<ul>{{#items}}<li>{{name}}</li>{{/items}}</ul>",
        &json!({"items": [{"name": "a"}, {"name": "b"}]}),
    );
    assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn dot_section_iterates_the_root_array() {
    let out = render(
        "{{#.}}<tr><td>{{code}}</td></tr>{{/.}}",
        &json!([{"code": "001"}, {"code": "002"}]),
    );
    assert_eq!(out, "<tr><td>001</td></tr><tr><td>002</td></tr>");
}

#[test]
fn empty_or_missing_section_renders_nothing() {
    let data = json!({"items": []});
    assert_eq!(render("x{{#items}}y{{/items}}z", &data), "xz");
    assert_eq!(render("x{{#other}}y{{/other}}z", &data), "xz");
}

#[test]
fn numbers_render_plainly() {
    let out = render("{{n}}", &json!({"n": 42}));
    assert_eq!(out, "42");
}

#[test]
fn escape_html_covers_the_usual_suspects() {
    assert_eq!(
        escape_html(r#"<a href="x" title='y'>&"#),
        "&lt;a href=&quot;x&quot; title=&#39;y&#39;&gt;&amp;"
    );
}
