//! # newsqa-html
//!
//! Pure HTML helpers shared by the crawler: pulling the main text out of an
//! article page and querying listing pages for links. Nothing here touches the
//! network.

use scraper::{node::Node, ElementRef, Html, Selector};
use thiserror::Error;

/// Tags whose text never counts as article content.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HtmlError {
    #[error("Invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Parses a CSS selector, keeping the offending text in the error.
pub fn parse_selector(selector: &str) -> Result<Selector, HtmlError> {
    Selector::parse(selector).map_err(|e| HtmlError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Where the main text of an article page lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSelectors {
    /// Content container candidates, tried in order. The first match wins.
    pub containers: Vec<String>,
    /// A block inside the container that is removed before text extraction.
    pub metadata: Option<String>,
}

impl Default for ArticleSelectors {
    fn default() -> Self {
        Self {
            containers: vec![
                "article.single-page-content".to_string(),
                "article.single-post-content.single-content".to_string(),
            ],
            metadata: Some("div.item-meta.single-post-meta.content-pad".to_string()),
        }
    }
}

/// Extracts the main text of an article page.
///
/// Every non-empty text node inside the content container is trimmed and
/// followed by a newline, in document order. The first metadata block inside
/// the container is skipped, as are script and style contents.
///
/// Returns `Ok(None)` when no content container is present.
pub fn extract_article_text(
    html: &str,
    selectors: &ArticleSelectors,
) -> Result<Option<String>, HtmlError> {
    let document = Html::parse_document(html);

    let mut container = None;
    for candidate in &selectors.containers {
        let selector = parse_selector(candidate)?;
        if let Some(found) = document.select(&selector).next() {
            container = Some(found);
            break;
        }
    }
    let Some(container) = container else {
        return Ok(None);
    };

    let metadata_block = match &selectors.metadata {
        Some(metadata) => {
            let selector = parse_selector(metadata)?;
            container.select(&selector).next()
        }
        None => None,
    };

    Ok(Some(collect_stripped_text(container, metadata_block)))
}

fn collect_stripped_text(container: ElementRef<'_>, skip: Option<ElementRef<'_>>) -> String {
    let skip_id = skip.map(|el| el.id());
    let mut text_content = String::new();
    for node in container.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let excluded = node.ancestors().any(|ancestor| {
            Some(ancestor.id()) == skip_id
                || ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| NON_CONTENT_TAGS.contains(&el.name()))
        });
        if excluded {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            text_content.push_str(trimmed);
            text_content.push('\n');
        }
    }
    text_content
}

/// Returns the given attribute of every element matching `selector`, in document
/// order. Elements without the attribute, or with an empty value, are skipped.
pub fn select_attribute(
    html: &str,
    selector: &str,
    attribute: &str,
) -> Result<Vec<String>, HtmlError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .filter_map(|el| el.value().attr(attribute))
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.trim().to_string())
        .collect())
}

/// Whether at least one element matches `selector`.
pub fn has_element(html: &str, selector: &str) -> Result<bool, HtmlError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    let found = document.select(&selector).next().is_some();
    Ok(found)
}
