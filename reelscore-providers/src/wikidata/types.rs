//! Wikidata SPARQL response types.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<SparqlBinding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlBinding {
    #[serde(rename = "rtId")]
    pub rt_id: Option<SparqlValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    pub value: String,
}
