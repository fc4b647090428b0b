//! JSON response types and formatting for CLI output.

use serde::Serialize;

use mindvault::Metadata;

/// Response for an answered question.
#[derive(Serialize)]
pub struct AskResponse {
    pub question: String,
    pub context: Vec<String>,
    pub answer: String,
}

/// Response for search results.
#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
}

/// Individual search result item.
#[derive(Serialize)]
pub struct SearchResultItem {
    pub id: usize,
    pub text: String,
    pub distance: f64,
    pub metadata: Metadata,
}

/// Response for listing memories.
#[derive(Serialize)]
pub struct ListResponse {
    pub memories: Vec<ListItem>,
}

/// Individual list item.
#[derive(Serialize)]
pub struct ListItem {
    pub id: usize,
    pub text: String,
}

/// Response for a dataset export.
#[derive(Serialize)]
pub struct ExportResponse {
    pub status: String,
    pub path: String,
    pub examples: usize,
}

/// Response for errors.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Print a value as formatted JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}
