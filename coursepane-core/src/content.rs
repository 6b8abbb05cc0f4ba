use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoursepaneError, Result};

const SAMPLE_COURSES_JSON: &str = include_str!("../data/sample_courses.json");

/// A unit of curriculum. Every field is optional; children are owned by value,
/// so a tree can never contain a cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_info: Option<Vec<ContentInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_contents: Option<Vec<CourseContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_headers: Option<Vec<ArticleHeader>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_article_info: Option<Vec<UserArticleInfo>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<i64>,
}

/// A single readable article. The id is also used to build its locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleHeader {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserArticleInfo {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// Identity of an item within its sibling list, used only for render diffing.
pub trait Keyed {
    fn key(&self) -> Option<i64>;
}

impl Keyed for CourseContent {
    fn key(&self) -> Option<i64> {
        self.id
    }
}

impl Keyed for ContentInfo {
    fn key(&self) -> Option<i64> {
        self.content_id
    }
}

impl Keyed for ArticleHeader {
    fn key(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Keyed for UserArticleInfo {
    fn key(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl CourseContent {
    /// A node carrying nothing but an identifier.
    pub fn with_id(id: i64) -> Self {
        CourseContent {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Child nodes; an absent list reads as empty.
    pub fn children(&self) -> &[CourseContent] {
        self.course_contents.as_deref().unwrap_or(&[])
    }

    pub fn article_headers(&self) -> &[ArticleHeader] {
        self.article_headers.as_deref().unwrap_or(&[])
    }

    pub fn content_info(&self) -> &[ContentInfo] {
        self.content_info.as_deref().unwrap_or(&[])
    }

    pub fn user_article_info(&self) -> &[UserArticleInfo] {
        self.user_article_info.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// True for nodes with neither children nor article headers.
    pub fn is_leaf_container(&self) -> bool {
        self.children().is_empty() && self.article_headers().is_empty()
    }
}

impl ArticleHeader {
    /// The title, if present and non-empty. Whitespace counts as content.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

/// Pre-order walk over every node reachable from `roots`, calling
/// `visit(node, depth)` once per node. Roots are at depth 0.
pub fn walk<'a, F>(roots: &'a [CourseContent], mut visit: F)
where
    F: FnMut(&'a CourseContent, usize),
{
    let mut stack: Vec<(&'a CourseContent, usize)> =
        roots.iter().rev().map(|node| (node, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        visit(node, depth);
        for child in node.children().iter().rev() {
            stack.push((child, depth + 1));
        }
    }
}

/// Parse a JSON array of course content nodes, at any nesting depth.
pub fn parse_course_contents(json: &str) -> Result<Vec<CourseContent>> {
    from_json(json).map_err(|e| CoursepaneError::parse("course content JSON", e))
}

fn from_json(json: &str) -> serde_json::Result<Vec<CourseContent>> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    // Grows the stack on demand instead of overflowing on deep trees.
    let contents = Vec::<CourseContent>::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(contents)
}

/// Load the content tree from a JSON file on disk.
pub fn load_course_contents(path: &Path) -> Result<Vec<CourseContent>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CoursepaneError::io(format!("reading {}", path.display()), e))?;
    let contents =
        from_json(&json).map_err(|e| CoursepaneError::parse(path.display().to_string(), e))?;
    log::info!("Loaded course content from {}", path.display());
    Ok(contents)
}

/// The catalogue bundled with the application.
pub fn sample_course_contents() -> Vec<CourseContent> {
    match parse_course_contents(SAMPLE_COURSES_JSON) {
        Ok(contents) => contents,
        Err(e) => {
            log::error!("Bundled sample catalogue is invalid: {}", e);
            Vec::new()
        }
    }
}
