use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ScivaultError;

pub const APP_NAME: &str = "scivault";
pub const METADATA_CONTENT_TYPE: &str = "application/json";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const METADATA_VERSION: &str = "1.0.3";
pub const PDF_VERSION: &str = "1.0.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Doi,
    Title,
    Aid,
}

impl SearchField {
    pub fn tag_name(&self) -> &'static str {
        match self {
            SearchField::Doi => "doi",
            SearchField::Title => "title",
            SearchField::Aid => "aid",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag_name())
    }
}

impl FromStr for SearchField {
    type Err = ScivaultError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "doi" => Ok(SearchField::Doi),
            "title" => Ok(SearchField::Title),
            "aid" => Ok(SearchField::Aid),
            _ => Err(ScivaultError::InvalidSearchField(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionEdge {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl TransactionEdge {
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub aid: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default, rename = "txId")]
    pub tx_id: Option<String>,
    #[serde(default, rename = "pdfId")]
    pub pdf_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaperRecord {
    pub doi: String,
    pub title: String,
    pub aid: String,
    raw: Value,
}

impl PaperRecord {
    pub fn from_value(value: Value) -> Option<Self> {
        let doi = required_field(&value, "doi")?;
        let title = required_field(&value, "title")?;
        let aid = required_field(&value, "aid")?;
        Some(Self {
            doi,
            title,
            aid,
            raw: value,
        })
    }

    pub fn payload(&self) -> Vec<u8> {
        self.raw.to_string().into_bytes()
    }
}

fn required_field(value: &Value, name: &str) -> Option<String> {
    let field = value.get(name)?.as_str()?;
    if field.trim().is_empty() {
        return None;
    }
    Some(field.to_string())
}

#[derive(Debug, Default)]
pub struct PdfIndex {
    entries: HashMap<String, String>,
}

impl PdfIndex {
    pub fn from_edges(edges: &[TransactionEdge]) -> Self {
        let mut entries = HashMap::new();
        for edge in edges {
            if let Some(doi) = edge.tag_value("doi") {
                entries.insert(doi.to_string(), edge.id.clone());
            }
        }
        Self { entries }
    }

    pub fn get(&self, doi: &str) -> Option<&str> {
        self.entries.get(doi).map(|id| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub id: String,
}
