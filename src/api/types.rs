//! Request payloads, page templates and JSON responses.

use askama::Template;
use serde::{Deserialize, Serialize};

use crate::{
    nlp::Entity,
    pipeline::Analysis,
    present::{FrequencyTable, LabelGroups},
};

/// Body of `POST /extract_entities` and `POST /api/entities`.
#[derive(Debug, Default, Deserialize)]
pub struct TextForm {
    #[serde(default)]
    pub text: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage;

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultPage<'a> {
    pub highlighted_text: &'a str,
    pub entity_link_table: &'a str,
    pub wordcloud_url: &'a str,
    pub wordcloud_file: &'a str,
    pub network_url: &'a str,
    pub network_file: &'a str,
}

impl<'a> From<&'a Analysis> for ResultPage<'a> {
    fn from(analysis: &'a Analysis) -> Self {
        Self {
            highlighted_text: &analysis.highlighted_text,
            entity_link_table: &analysis.entity_link_table,
            wordcloud_url: &analysis.wordcloud.public_url,
            wordcloud_file: &analysis.wordcloud.file_name,
            network_url: &analysis.network.public_url,
            network_file: &analysis.network.file_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitiesResponse {
    pub entities: Vec<Entity>,
    pub labels: LabelGroups,
    pub frequencies: FrequencyTable,
}

impl EntitiesResponse {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            labels: LabelGroups::from_entities(&entities),
            frequencies: FrequencyTable::from_entities(&entities),
            entities,
        }
    }
}
