//! Inline entity highlighting rendered as an HTML fragment.

use html_escape::encode_text;

use crate::{nlp::Entity, present::Palette};

const WRAPPER_OPEN: &str =
    r#"<div class="entities" style="line-height: 2.5; direction: ltr; background: rgba(0,0,0,0)">"#;

/// Mark up `text` with the entities whose label is in the palette.
///
/// Entities with other labels, and any entity overlapping an earlier one,
/// pass through as plain text. Offsets must lie on char boundaries of `text`.
pub fn render(text: &str, entities: &[Entity], palette: &Palette) -> String {
    let mut ordered: Vec<&Entity> = entities.iter().collect();
    ordered.sort_by_key(|e| (e.start, std::cmp::Reverse(e.end)));

    let mut html = String::from(WRAPPER_OPEN);
    let mut cursor = 0;
    for entity in ordered {
        let Some(background) = palette.highlight(&entity.label) else {
            continue;
        };
        if entity.start < cursor || entity.end > text.len() || entity.start >= entity.end {
            continue;
        }
        push_plain(&mut html, &text[cursor..entity.start]);
        push_mark(&mut html, &text[entity.start..entity.end], &entity.label, background);
        cursor = entity.end;
    }
    push_plain(&mut html, &text[cursor..]);
    html.push_str("</div>");
    html
}

fn push_plain(html: &mut String, segment: &str) {
    let mut lines = segment.split('\n');
    if let Some(first) = lines.next() {
        html.push_str(&encode_text(first));
    }
    for line in lines {
        html.push_str("</br>");
        html.push_str(&encode_text(line));
    }
}

fn push_mark(html: &mut String, segment: &str, label: &str, background: &str) {
    html.push_str(&format!(
        r#"<mark class="entity" style="background: {background}; padding: 0.45em 0.6em; margin: 0 0.25em; line-height: 1; border-radius: 0.35em;">"#
    ));
    push_plain(html, segment);
    html.push_str(&format!(
        r#"<span style="font-size: 0.8em; font-weight: bold; line-height: 1; border-radius: 0.35em; vertical-align: middle; margin-left: 0.5rem">{}</span></mark>"#,
        encode_text(label)
    ));
}
