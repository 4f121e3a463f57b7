//! Label → entity link table.

use askama::Template;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::present::{LabelGroups, Palette};

const SEARCH_URL: &str = "https://www.google.com/search?q=";

#[derive(Template)]
#[template(path = "entity_table.html")]
struct EntityTable<'a> {
    rows: Vec<TableRow<'a>>,
}

struct TableRow<'a> {
    label: &'a str,
    links: String,
}

/// Search URL for an entity: spaces become `+`, nothing else is encoded.
pub fn search_url(entity: &str) -> String {
    format!("{SEARCH_URL}{}", entity.replace(' ', "+"))
}

/// One coloured, clickable link.
pub fn entity_link(entity: &str, color: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank"><span style="color: {};">{}</span></a>"#,
        encode_double_quoted_attribute(&search_url(entity)),
        encode_double_quoted_attribute(color),
        encode_text(entity)
    )
}

/// Render the styled table, one row per label sorted by label.
pub fn render(groups: &LabelGroups, palette: &Palette) -> askama::Result<String> {
    let rows = groups
        .sorted()
        .into_iter()
        .map(|(label, entities)| {
            let color = palette.link_color(label);
            let links = entities
                .iter()
                .map(|entity| entity_link(entity, color))
                .collect::<Vec<_>>()
                .join(", ");
            TableRow { label, links }
        })
        .collect();
    EntityTable { rows }.render()
}
