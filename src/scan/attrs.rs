//! Tokenizer for raw HTML tag-attribute substrings.

use std::sync::OnceLock;

use regex::Regex;

/// Single attribute parsed from a tag, in source order.
///
/// A `None` value denotes a bare/boolean attribute (`<script defer>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written in the source.
    pub name: String,
    /// Quoted value with the quotes stripped, when present.
    pub value: Option<String>,
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)([a-z0-9_]+)(?:=(?:"([^"]*)"|'([^']*)'))?"#)
            .expect("invalid attribute regex")
    })
}

/// Iterate the `name[=value]` pairs of a raw attribute substring.
///
/// The input is the text between the tag name and the closing `>`/`/>`, so the
/// tag's own name never appears as a token. Values may be single- or
/// double-quoted, may be empty and may contain the other quote character; no
/// entity decoding is performed. Malformed quoting is not diagnosed, the
/// mangled remainder simply fails to tokenize.
///
/// Name tokens are ASCII letters/digits/underscore only. A hyphenated name
/// like `data-src` therefore splits into a bare `data` plus a `src` token
/// aliasing the real `src` attribute, which can turn a template tag into a
/// bundling candidate. Documents are trusted not to carry hyphenated
/// locator-suffixed attributes on scanned tags.
pub fn attributes(raw: &str) -> impl Iterator<Item = Attribute> + '_ {
    attribute_pattern().captures_iter(raw).map(|caps| {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|quoted| quoted.as_str().to_string());
        Attribute {
            name: caps[1].to_string(),
            value,
        }
    })
}

/// Parse a raw attribute substring into an ordered attribute list.
pub fn parse_attributes(raw: &str) -> Vec<Attribute> {
    attributes(raw).collect()
}

/// Look up an attribute value by name, ASCII-case-insensitively.
///
/// The last occurrence wins when a name is repeated; bare attributes yield
/// `None` just like absent ones.
pub fn attribute_value<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .rev()
        .find(|attr| attr.name.eq_ignore_ascii_case(name))
        .and_then(|attr| attr.value.as_deref())
}

/// Serialize an attribute list back to tag text, skipping excluded names.
///
/// Attributes keep their original relative order and are emitted as
/// ` name="value"` (single quotes when the value itself contains a double
/// quote) or bare ` name`. The result starts with a space unless empty.
pub fn render_attributes(attrs: &[Attribute], excluded: &[&str]) -> String {
    let mut rendered = String::new();
    for attr in attrs {
        if excluded
            .iter()
            .any(|name| attr.name.eq_ignore_ascii_case(name))
        {
            continue;
        }

        rendered.push(' ');
        rendered.push_str(&attr.name);
        if let Some(value) = &attr.value {
            if value.contains('"') {
                rendered.push_str(&format!("='{value}'"));
            } else {
                rendered.push_str(&format!("=\"{value}\""));
            }
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_and_bare_attributes() {
        let attrs = parse_attributes(r#" rel="stylesheet" type='text/css' defer href="""#);

        assert_eq!(attrs, vec![
            Attribute {
                name: "rel".into(),
                value: Some("stylesheet".into()),
            },
            Attribute {
                name: "type".into(),
                value: Some("text/css".into()),
            },
            Attribute {
                name: "defer".into(),
                value: None,
            },
            Attribute {
                name: "href".into(),
                value: Some(String::new()),
            },
        ]);
    }

    #[test]
    fn values_may_contain_the_other_quote() {
        let attrs = parse_attributes(r#" title='say "hi"' alt="it's fine""#);
        assert_eq!(attribute_value(&attrs, "title"), Some(r#"say "hi""#));
        assert_eq!(attribute_value(&attrs, "alt"), Some("it's fine"));
    }

    #[test]
    fn hyphenated_names_split_and_alias_their_suffix() {
        let attrs = parse_attributes(r#" data-src="x.js" defer"#);

        assert_eq!(attrs, vec![
            Attribute {
                name: "data".into(),
                value: None,
            },
            Attribute {
                name: "src".into(),
                value: Some("x.js".into()),
            },
            Attribute {
                name: "defer".into(),
                value: None,
            },
        ]);
        assert_eq!(attribute_value(&attrs, "src"), Some("x.js"));
    }

    #[test]
    fn lookup_is_case_insensitive_and_last_wins() {
        let attrs = parse_attributes(r#" HREF="first.css" href="second.css""#);
        assert_eq!(attribute_value(&attrs, "href"), Some("second.css"));
        assert_eq!(attribute_value(&attrs, "HREF"), Some("second.css"));
        assert_eq!(attribute_value(&attrs, "rel"), None);
    }

    #[test]
    fn renders_in_order_minus_excluded_names() {
        let attrs = parse_attributes(r#" rel="stylesheet" media="print" href="a.css" defer"#);
        let rendered = render_attributes(&attrs, &["href", "rel"]);
        assert_eq!(rendered, r#" media="print" defer"#);
    }

    #[test]
    fn renders_nothing_for_empty_list() {
        assert_eq!(render_attributes(&[], &[]), "");
    }
}
