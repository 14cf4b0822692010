//! Frequency-ranked class renaming across HTML, CSS and marked JS calls.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::assets::{AssetKind, AssetMap};

use super::names::CompactNameGenerator;

fn class_attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\b(class)=(?:"([^"]*)"|'([^']*)')"#)
            .expect("invalid class attribute regex")
    })
}

fn selector_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\.([A-Za-z_][A-Za-z0-9_-]*)").expect("invalid selector regex")
    })
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"cssClassName\((?:"([^"]*)"|'([^']*)')\)"#)
            .expect("invalid marker call regex")
    })
}

/// Usage counts with encounter order retained for deterministic tie-breaking.
struct UsageTable<'a> {
    whitelist: &'a [String],
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl<'a> UsageTable<'a> {
    fn new(whitelist: &'a [String]) -> Self {
        Self {
            whitelist,
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn record(&mut self, name: &str) {
        if self.whitelist.iter().any(|entry| entry == name) {
            return;
        }

        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.order.push(name.to_string());
                self.counts.insert(name.to_string(), 1);
            }
        }
    }

    /// Rank by descending count (stable, so ties keep encounter order) and
    /// assign generator values in rank order. Names counted exactly once are
    /// still renamed but produce an advisory warning.
    fn assign(self) -> (HashMap<String, String>, Vec<String>) {
        let Self {
            mut order, counts, ..
        } = self;
        order.sort_by(|a, b| counts[b].cmp(&counts[a]));

        let mut generator = CompactNameGenerator::new();
        let mut table = HashMap::new();
        let mut warnings = Vec::new();
        for name in order {
            if counts[&name] == 1 {
                warnings.push(format!("class name '{name}' is only used once"));
            }
            table.insert(name, generator.next_name());
        }

        (table, warnings)
    }
}

/// Immutable rename table computed from one consistent snapshot of all three
/// surfaces, plus the advisory warnings gathered while building it.
pub struct RenamePlan {
    table: HashMap<String, String>,
    /// Advisory single-use warnings; never fatal.
    pub warnings: Vec<String>,
}

/// Count class usage across the HTML text and every loaded CSS/JS asset and
/// assign compact identifiers by descending frequency.
///
/// Whitelisted names are counted nowhere and never renamed. The plan must be
/// applied to the same snapshot it was computed from; renaming is a single
/// atomic pass per invocation.
pub fn plan_renames(html: &str, assets: &AssetMap, whitelist: &[String]) -> RenamePlan {
    let mut usage = UsageTable::new(whitelist);

    for caps in class_attribute_pattern().captures_iter(html) {
        let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        for token in value.split_whitespace() {
            usage.record(token);
        }
    }

    for (_, css) in assets.contents_of_kind(AssetKind::Css) {
        for caps in selector_pattern().captures_iter(css) {
            usage.record(&caps[1]);
        }
    }

    for (_, js) in assets.contents_of_kind(AssetKind::Js) {
        for caps in marker_pattern().captures_iter(js) {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            usage.record(name);
        }
    }

    let (table, warnings) = usage.assign();
    RenamePlan { table, warnings }
}

impl RenamePlan {
    /// Whether no name was counted at all.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Assigned identifier for an original name, if it was counted.
    pub fn rename_of(&self, name: &str) -> Option<&str> {
        self.table.get(name).map(String::as_str)
    }

    /// Rewrite `class` attribute values, preserving quote style and the
    /// whitespace layout between tokens. Tokens absent from the table stay
    /// verbatim.
    pub fn rewrite_html(&self, html: &str) -> String {
        class_attribute_pattern()
            .replace_all(html, |caps: &Captures<'_>| {
                let (value, quote) = match caps.get(2) {
                    Some(value) => (value.as_str(), '"'),
                    None => (caps.get(3).map_or("", |m| m.as_str()), '\''),
                };
                let rewritten = self.rewrite_class_value(value);
                format!("{}={quote}{rewritten}{quote}", &caps[1])
            })
            .into_owned()
    }

    /// Rewrite `.name` selector tokens in stylesheet text.
    pub fn rewrite_css(&self, css: &str) -> String {
        selector_pattern()
            .replace_all(css, |caps: &Captures<'_>| match self.table.get(&caps[1]) {
                Some(renamed) => format!(".{renamed}"),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Rewrite `cssClassName("name")` marker calls in script text, keeping
    /// the original quote character. Any other call shape is ignored.
    pub fn rewrite_js(&self, js: &str) -> String {
        marker_pattern()
            .replace_all(js, |caps: &Captures<'_>| {
                let (name, quote) = match caps.get(1) {
                    Some(name) => (name.as_str(), '"'),
                    None => (caps.get(2).map_or("", |m| m.as_str()), '\''),
                };
                match self.table.get(name) {
                    Some(renamed) => format!("cssClassName({quote}{renamed}{quote})"),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn rewrite_class_value(&self, value: &str) -> String {
        static TOKEN: OnceLock<Regex> = OnceLock::new();
        let token_pattern =
            TOKEN.get_or_init(|| Regex::new(r"\S+").expect("invalid class token regex"));

        token_pattern
            .replace_all(value, |caps: &Captures<'_>| {
                match self.table.get(&caps[0]) {
                    Some(renamed) => renamed.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;
    use crate::assets::resolve_reference;

    fn loaded_assets(base: &Path, references: &[(&str, AssetKind)]) -> AssetMap {
        let mut assets = AssetMap::new();
        for (reference, kind) in references {
            assets.request(resolve_reference(base, reference).unwrap(), *kind);
        }
        assets.load_all().unwrap();
        assets
    }

    #[test]
    fn renames_consistently_across_html_and_css() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.css"), ".css-class-1 {}.css-class-2 {}").unwrap();
        let assets = loaded_assets(dir.path(), &[("app.css", AssetKind::Css)]);

        let html = r#"<div class="css-class-1 css-class-2"/>"#;
        let plan = plan_renames(html, &assets, &[]);

        assert_eq!(plan.rename_of("css-class-1"), Some("a"));
        assert_eq!(plan.rename_of("css-class-2"), Some("b"));
        assert_eq!(plan.rewrite_html(html), r#"<div class="a b"/>"#);
        assert_eq!(
            plan.rewrite_css(".css-class-1 {}.css-class-2 {}"),
            ".a {}.b {}"
        );
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn ranking_is_by_count_then_encounter_order() {
        let assets = AssetMap::new();
        let html = concat!(
            r#"<div class="a-name b-name"></div>"#,
            r#"<div class="a-name b-name"></div>"#,
            r#"<div class="a-name b-name c-name"></div>"#,
        );
        let plan = plan_renames(html, &assets, &[]);

        assert_eq!(plan.rename_of("a-name"), Some("a"));
        assert_eq!(plan.rename_of("b-name"), Some("b"));
        assert_eq!(plan.rename_of("c-name"), Some("c"));
        assert_eq!(plan.warnings, vec![
            "class name 'c-name' is only used once".to_string()
        ]);
    }

    #[test]
    fn most_used_name_gets_the_shortest_identifier() {
        let assets = AssetMap::new();
        let html = concat!(
            r#"<div class="rare"></div>"#,
            r#"<div class="common"></div>"#,
            r#"<div class="common"></div>"#,
        );
        let plan = plan_renames(html, &assets, &[]);

        assert_eq!(plan.rename_of("common"), Some("a"));
        assert_eq!(plan.rename_of("rare"), Some("b"));
    }

    #[test]
    fn whitelisted_names_are_never_counted_or_renamed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.css"), ".keep-me {}.rename-me {}").unwrap();
        let assets = loaded_assets(dir.path(), &[("app.css", AssetKind::Css)]);

        let html = r#"<div class='keep-me rename-me'></div>"#;
        let whitelist = vec!["keep-me".to_string()];
        let plan = plan_renames(html, &assets, &whitelist);

        assert_eq!(plan.rename_of("keep-me"), None);
        assert_eq!(plan.rename_of("rename-me"), Some("a"));
        assert_eq!(plan.rewrite_html(html), r#"<div class='keep-me a'></div>"#);
        assert_eq!(plan.rewrite_css(".keep-me {}.rename-me {}"), ".keep-me {}.a {}");
    }

    #[test]
    fn marker_calls_are_rewritten_with_their_quote_style() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("app.js"),
            r#"el.className = cssClassName("panel") + cssClassName('panel');"#,
        )
        .unwrap();
        let assets = loaded_assets(dir.path(), &[("app.js", AssetKind::Js)]);

        let html = r#"<div class="panel"></div>"#;
        let plan = plan_renames(html, &assets, &[]);

        assert_eq!(plan.rename_of("panel"), Some("a"));
        assert_eq!(
            plan.rewrite_js(r#"el.className = cssClassName("panel") + cssClassName('panel');"#),
            r#"el.className = cssClassName("a") + cssClassName('a');"#
        );
    }

    #[test]
    fn other_call_shapes_are_ignored() {
        let assets = AssetMap::new();
        let plan = plan_renames(r#"<div class="panel"></div>"#, &assets, &[]);

        let js = "cssClassName(variable); cssClassName(\"panel\" + suffix);";
        assert_eq!(plan.rewrite_js(js), js);
    }

    #[test]
    fn whitespace_layout_inside_class_values_is_preserved() {
        let assets = AssetMap::new();
        let html = "<div class=\"first   second\n\tthird\"></div><div class=\"first\"></div>";
        let plan = plan_renames(html, &assets, &[]);

        assert_eq!(
            plan.rewrite_html(html),
            "<div class=\"a   b\n\tc\"></div><div class=\"a\"></div>"
        );
    }

    #[test]
    fn renaming_minified_output_again_is_a_fixed_point() {
        let dir = tempdir().unwrap();
        let css_path = dir.path().join("app.css");
        fs::write(&css_path, ".css-class-1 {}.css-class-2 {}").unwrap();

        let html = r#"<div class="css-class-1 css-class-2"/>"#;
        let mut assets = loaded_assets(dir.path(), &[("app.css", AssetKind::Css)]);
        let plan = plan_renames(html, &assets, &[]);
        let html_once = plan.rewrite_html(html);
        assets.rewrite_contents_of_kind(AssetKind::Css, |css| plan.rewrite_css(css));

        let plan_again = plan_renames(&html_once, &assets, &[]);
        let html_twice = plan_again.rewrite_html(&html_once);
        let css_once = assets.content(&css_path).unwrap().to_string();
        let css_twice = plan_again.rewrite_css(&css_once);

        assert_eq!(html_twice, html_once);
        assert_eq!(css_twice, css_once);
    }
}
