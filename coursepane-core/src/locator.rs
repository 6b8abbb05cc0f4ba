use url::Url;

use crate::error::{CoursepaneError, Result};

pub const DEFAULT_ARTICLE_BASE: &str = "https://example.com";

/// Absolute base that article locators are templated under:
/// `<scheme>://<host>[/<prefix>]/article/<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBase {
    url: Url,
}

impl ArticleBase {
    /// Parse and validate a base URL. It must be absolute, have a host, and
    /// be able to carry a path.
    pub fn parse(base: &str) -> Result<Self> {
        let url = Url::parse(base.trim()).map_err(|e| CoursepaneError::InvalidBase {
            base: base.to_string(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(CoursepaneError::InvalidBase {
                base: base.to_string(),
                reason: "URL has no host".to_string(),
            });
        }
        Ok(ArticleBase { url })
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Locator for the article with the given header id.
    pub fn article_url(&self, id: i64) -> Url {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("article")
                .push(&id.to_string());
        }
        url
    }
}

impl Default for ArticleBase {
    fn default() -> Self {
        ArticleBase {
            url: Url::parse(DEFAULT_ARTICLE_BASE).expect("default article base is a valid URL"),
        }
    }
}

/// Parse `base` and build the locator for article `id` in one step.
pub fn article_url(base: &str, id: i64) -> Result<Url> {
    Ok(ArticleBase::parse(base)?.article_url(id))
}
