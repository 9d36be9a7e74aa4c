//! GET /: the themed chat page.

use askama::Template;
use axum::response::Html;

use crate::{
    app::catalog::{self, EXAMPLE_CATEGORIES, ExampleCategory},
    error_handler::AppResult,
};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    quote: &'static str,
    categories: &'static [ExampleCategory],
    /// Flat example list for the "Random Question" button, as a JSON array.
    examples_json: String,
}

pub async fn index_page() -> AppResult<Html<String>> {
    let examples: Vec<&str> = catalog::all_examples().collect();
    let page = IndexTemplate {
        quote: catalog::quote_of_the_moment(),
        categories: &EXAMPLE_CATEGORIES,
        examples_json: serde_json::to_string(&examples).unwrap_or_else(|_| "[]".into()),
    };
    Ok(Html(page.render()?))
}
