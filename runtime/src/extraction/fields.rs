// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Declarative CSS-selector field extraction.
//!
//! A provider describes each entity as a table of [`FieldRule`]s:
//! `field -> (selector, text-or-attribute, transforms, default)`. Every rule
//! is evaluated on its own and never aborts the extraction. A missing node,
//! an unparsable selector or a transform that yields nothing produces the
//! rule's declared default.
//!
//! All functions are synchronous because `scraper` types are `!Send`.
//! Callers parse after the last `.await` of a fetch, never across one.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::warn;

/// Where a field's raw string comes from on the matched node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Text content of every matched node, concatenated.
    Text,
    /// The named attribute of the first matched node.
    Attr(&'static str),
}

/// A string-to-string step applied to the raw value, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Last non-empty `/`-separated path segment, ignoring query and fragment.
    LastPathSegment,
    /// Trailing run of ASCII digits, ignoring trailing slashes.
    TrailingNumber,
    /// Number that closes the path right after the last occurrence of the marker.
    NumberAfter(&'static str),
    /// Argument of a CSS `url(...)`, with surrounding quotes removed.
    CssUrl,
    /// Replace every occurrence of the first string with the second.
    Replace(&'static str, &'static str),
}

/// Declared fallback for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Text(&'static str),
    Number(u32),
}

/// One row of a selector table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    /// Descendant selector relative to the scope; `None` targets the scope node itself.
    pub selector: Option<&'static str>,
    pub source: Source,
    pub transforms: &'static [Transform],
    pub default: FieldDefault,
}

impl FieldRule {
    /// Text field defaulting to the empty string.
    pub const fn text(name: &'static str, selector: &'static str) -> Self {
        Self {
            name,
            selector: Some(selector),
            source: Source::Text,
            transforms: &[],
            default: FieldDefault::Text(""),
        }
    }

    /// Attribute field defaulting to the empty string.
    pub const fn attr(name: &'static str, selector: &'static str, attr: &'static str) -> Self {
        Self {
            name,
            selector: Some(selector),
            source: Source::Attr(attr),
            transforms: &[],
            default: FieldDefault::Text(""),
        }
    }

    /// Attribute of the scope node itself.
    pub const fn own_attr(name: &'static str, attr: &'static str) -> Self {
        Self {
            name,
            selector: None,
            source: Source::Attr(attr),
            transforms: &[],
            default: FieldDefault::Text(""),
        }
    }

    pub const fn with_transforms(mut self, transforms: &'static [Transform]) -> Self {
        self.transforms = transforms;
        self
    }

    /// Parse the transformed value as a number, defaulting to `default`.
    pub const fn numeric(mut self, default: u32) -> Self {
        self.default = FieldDefault::Number(default);
        self
    }
}

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(u32),
}

/// Values extracted for one scope, keyed by rule name.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    values: HashMap<&'static str, FieldValue>,
}

impl Fields {
    /// Text value of `name`, or the empty string if it is not a text field.
    pub fn text(&self, name: &str) -> String {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => s.clone(),
            Some(FieldValue::Number(n)) => n.to_string(),
            None => String::new(),
        }
    }

    /// Numeric value of `name`, or `0`.
    pub fn number(&self, name: &str) -> u32 {
        match self.values.get(name) {
            Some(FieldValue::Number(n)) => *n,
            _ => 0,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }
}

/// Apply `rules` inside `scope`.
pub fn extract(scope: ElementRef<'_>, rules: &[FieldRule]) -> Fields {
    let mut fields = Fields::default();
    for rule in rules {
        fields.values.insert(rule.name, evaluate(scope, rule));
    }
    fields
}

/// Apply `rules` to the whole document.
pub fn extract_document(document: &Html, rules: &[FieldRule]) -> Fields {
    extract(document.root_element(), rules)
}

/// Apply `rules` once per node matching `item_selector`.
///
/// Nodes that themselves match `exclude` are skipped before extraction.
/// An invalid item selector yields an empty list.
pub fn extract_all(
    document: &Html,
    item_selector: &str,
    exclude: Option<&str>,
    rules: &[FieldRule],
) -> Vec<Fields> {
    let Some(items) = parse_selector(item_selector) else {
        return Vec::new();
    };
    let exclude = exclude.and_then(parse_selector);

    document
        .select(&items)
        .filter(|el| !exclude.as_ref().is_some_and(|ex| ex.matches(el)))
        .map(|el| extract(el, rules))
        .collect()
}

fn evaluate(scope: ElementRef<'_>, rule: &FieldRule) -> FieldValue {
    let raw = match rule.selector {
        None => read_source(std::iter::once(scope), rule.source),
        Some(sel) => match parse_selector(sel) {
            Some(selector) => read_source(scope.select(&selector), rule.source),
            None => None,
        },
    };

    let value = raw.and_then(|raw| {
        rule.transforms
            .iter()
            .try_fold(raw, |acc, t| apply_transform(&acc, *t))
    });
    let value = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    match (rule.default, value) {
        (FieldDefault::Text(_), Some(v)) => FieldValue::Text(v),
        (FieldDefault::Text(d), None) => FieldValue::Text(d.to_string()),
        (FieldDefault::Number(d), v) => {
            FieldValue::Number(v.and_then(|v| v.parse().ok()).unwrap_or(d))
        }
    }
}

fn read_source<'a>(mut nodes: impl Iterator<Item = ElementRef<'a>>, source: Source) -> Option<String> {
    match source {
        Source::Attr(attr) => nodes
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(str::to_string),
        Source::Text => {
            let mut found = false;
            let mut text = String::new();
            for el in nodes {
                found = true;
                text.extend(el.text());
            }
            found.then_some(text)
        }
    }
}

fn apply_transform(value: &str, transform: Transform) -> Option<String> {
    match transform {
        Transform::LastPathSegment => last_path_segment(value).map(str::to_string),
        Transform::TrailingNumber => trailing_number(value).map(|n| n.to_string()),
        Transform::NumberAfter(marker) => number_after(value, marker).map(|n| n.to_string()),
        Transform::CssUrl => css_url(value).map(str::to_string),
        Transform::Replace(from, to) => Some(value.replace(from, to)),
    }
}

fn parse_selector(s: &str) -> Option<Selector> {
    match Selector::parse(s) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!(selector = s, "invalid selector: {e:?}");
            None
        }
    }
}

/// Last non-empty path segment of `href`, ignoring query and fragment.
pub fn last_path_segment(href: &str) -> Option<&str> {
    let path = href.split(['?', '#']).next().unwrap_or("");
    path.split('/').rev().find(|s| !s.is_empty())
}

/// Trailing numeric token of a URL path, e.g. `/ver/one-piece-1100` -> `1100`.
pub fn trailing_number(href: &str) -> Option<u32> {
    let path = href.split(['?', '#']).next().unwrap_or("");
    let path = path.trim_end_matches('/');
    let digits_start = path
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    path[digits_start..].parse().ok()
}

/// Number between the last `marker` of a URL path and its end,
/// e.g. `/btth-episodio-12/` with `-episodio-` -> `12`.
pub fn number_after(href: &str, marker: &str) -> Option<u32> {
    let path = href.split(['?', '#']).next().unwrap_or("");
    let path = path.trim_end_matches('/');
    let start = path.rfind(marker)? + marker.len();
    let digits = &path[start..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Argument of the first CSS `url(...)` in `style`.
pub fn css_url(style: &str) -> Option<&str> {
    let start = style.find("url(")? + "url(".len();
    let rest = &style[start..];
    let end = rest.find(')')?;
    let inner = rest[..end].trim().trim_matches(|c| c == '\'' || c == '"');
    (!inner.is_empty()).then_some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &[FieldRule] = &[
        FieldRule::text("name", "h3.Title"),
        FieldRule::attr("name_id", "a", "href").with_transforms(&[Transform::LastPathSegment]),
        FieldRule::attr("image", "figure img", "src"),
    ];

    const EPISODE_HTML: &str = r#"
        <ul class="ListCaps">
          <li class="Next"><a href="/anime/next"><h3 class="Title">Próximo episodio</h3></a></li>
          <li><a href="/ver/frieren-28"><h3 class="Title">Frieren</h3></a></li>
          <li><a href="/ver/frieren-27"><h3 class="Title">Frieren</h3></a></li>
          <li><a href="/ver/frieren-26"><h3 class="Title">Frieren</h3></a></li>
        </ul>"#;

    const EPISODE_ROW: &[FieldRule] = &[
        FieldRule::text("title", "a h3.Title"),
        FieldRule::attr("episode_id", "a", "href")
            .with_transforms(&[Transform::TrailingNumber])
            .numeric(0),
    ];

    #[test]
    fn test_missing_nodes_yield_defaults() {
        let doc = Html::parse_document("<html><body><p>nothing here</p></body></html>");
        let rules = [
            FieldRule::text("title", "h1.Title"),
            FieldRule::attr("image", "img", "src"),
            FieldRule::attr("id", "a", "href")
                .with_transforms(&[Transform::TrailingNumber])
                .numeric(0),
        ];
        let f = extract_document(&doc, &rules);
        assert_eq!(f.get("title"), Some(&FieldValue::Text(String::new())));
        assert_eq!(f.get("image"), Some(&FieldValue::Text(String::new())));
        assert_eq!(f.get("id"), Some(&FieldValue::Number(0)));
    }

    #[test]
    fn test_declared_text_default_is_used() {
        let doc = Html::parse_document("<div></div>");
        let rule = FieldRule {
            default: FieldDefault::Text("unknown"),
            ..FieldRule::text("status", "p.AnmStts")
        };
        assert_eq!(extract_document(&doc, &[rule]).text("status"), "unknown");
    }

    #[test]
    fn test_invalid_selector_yields_default() {
        let doc = Html::parse_document("<h1>x</h1>");
        let f = extract_document(&doc, &[FieldRule::text("t", "h1[[[")]);
        assert_eq!(f.text("t"), "");
        assert!(extract_all(&doc, "li[[", None, CARD).is_empty());
    }

    #[test]
    fn test_card_extraction() {
        let doc = Html::parse_document(
            r#"<ul class="ListAnimes">
                 <li><article class="Anime">
                   <a href="/anime/sousou-no-frieren"><h3 class="Title"> Sousou no Frieren </h3></a>
                   <figure><img src="https://cdn.example.com/1.jpg"></figure>
                 </article></li>
               </ul>"#,
        );
        let cards = extract_all(&doc, ".ListAnimes .Anime", None, CARD);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].text("name"), "Sousou no Frieren");
        assert_eq!(cards[0].text("name_id"), "sousou-no-frieren");
        assert_eq!(cards[0].text("image"), "https://cdn.example.com/1.jpg");
    }

    #[test]
    fn test_episode_list_round_trip_with_exclude() {
        let doc = Html::parse_document(EPISODE_HTML);
        let rows = extract_all(&doc, "ul.ListCaps li", Some("li.Next"), EPISODE_ROW);
        let got: Vec<(String, u32)> = rows
            .iter()
            .map(|r| (r.text("title"), r.number("episode_id")))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Frieren".to_string(), 28),
                ("Frieren".to_string(), 27),
                ("Frieren".to_string(), 26),
            ]
        );
    }

    #[test]
    fn test_own_attr_reads_scope_node() {
        let doc = Html::parse_document(
            r#"<a class="angled-img" href="https://seriesdonghua.com/battle-through-the-heavens/">x</a>"#,
        );
        let rules = [FieldRule::own_attr("id", "href").with_transforms(&[Transform::LastPathSegment])];
        let rows = extract_all(&doc, "a.angled-img", None, &rules);
        assert_eq!(rows[0].text("id"), "battle-through-the-heavens");
    }

    #[test]
    fn test_text_concatenates_matches() {
        let doc = Html::parse_document("<div class='d'><p>One.</p><p>Two.</p></div>");
        assert_eq!(
            extract_document(&doc, &[FieldRule::text("s", "div.d p")]).text("s"),
            "One.Two."
        );
    }

    #[test]
    fn test_transform_chain() {
        let doc = Html::parse_document(
            r#"<div class="AnimeCover"><img src="/uploads/animes/covers/42.jpg"></div>"#,
        );
        let rule = FieldRule::attr("cover", "div.AnimeCover img", "src")
            .with_transforms(&[Transform::Replace("covers", "banners")]);
        assert_eq!(
            extract_document(&doc, &[rule]).text("cover"),
            "/uploads/animes/banners/42.jpg"
        );
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("/ver/one-piece-1100"), Some(1100));
        assert_eq!(
            trailing_number("https://seriesdonghua.com/btth-episodio-12/"),
            Some(12)
        );
        assert_eq!(trailing_number("/ver/one-piece"), None);
        assert_eq!(trailing_number(""), None);
        assert_eq!(trailing_number("/ver/x-7?ref=home"), Some(7));
    }

    #[test]
    fn test_number_after_marker() {
        let marker = "-episodio-";
        assert_eq!(
            number_after("https://seriesdonghua.com/btth-episodio-12/", marker),
            Some(12)
        );
        assert_eq!(number_after("/soul-land-2-episodio-7?x=1", marker), Some(7));
        // A digit-suffixed series slug is not an episode.
        assert_eq!(number_after("https://seriesdonghua.com/soul-land-2/", marker), None);
        assert_eq!(number_after("/soul-land-episodio-7/comentarios", marker), None);
        assert_eq!(number_after("/soul-land-episodio-/", marker), None);
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("/anime/naruto"), Some("naruto"));
        assert_eq!(last_path_segment("https://a.b/naruto/"), Some("naruto"));
        assert_eq!(last_path_segment("/anime/naruto?x=1"), Some("naruto"));
        assert_eq!(last_path_segment("///"), None);
    }

    #[test]
    fn test_css_url() {
        assert_eq!(
            css_url("background-image: url('/img/cover.jpg');"),
            Some("/img/cover.jpg")
        );
        assert_eq!(css_url("background: url(/img/a.png)"), Some("/img/a.png"));
        assert_eq!(css_url("color: red"), None);
        assert_eq!(css_url("url('')"), None);
    }
}
