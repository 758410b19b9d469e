//! HTML → Markdown text extraction.
//!
//! Pulls the content region out of a page and converts it to Markdown via
//! `htmd`. Chrome elements (nav, header, footer, scripts) are stripped so the
//! quiz generator sees prose, not boilerplate.

use scraper::{Html, Selector};
use tracing::debug;

use quizforge_shared::{QuizForgeError, Result};

/// Extract the readable text content of an HTML page as Markdown.
pub fn extract_text(html: &str) -> Result<String> {
    let content_html = content_region(html);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec![
            "script", "style", "nav", "header", "footer", "aside", "iframe", "noscript", "svg",
        ])
        .build();

    let markdown = converter
        .convert(&content_html)
        .map_err(|e| QuizForgeError::Network(format!("content extraction failed: {e}")))?;

    let markdown = markdown.trim().to_string();
    debug!(len = markdown.len(), "extraction complete");
    Ok(markdown)
}

/// Pick the main content region: `<main>` or `<article>` if present,
/// otherwise the whole document.
fn content_region(html: &str) -> String {
    let doc = Html::parse_document(html);

    for sel in ["main", "article"] {
        let selector = Selector::parse(sel).expect("static selector");
        if let Some(el) = doc.select(&selector).next() {
            return el.html();
        }
    }

    html.to_string()
}
