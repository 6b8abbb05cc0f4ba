use std::collections::HashSet;
use std::rc::Rc;

use url::Url;

use crate::content::{ArticleHeader, CourseContent};
use crate::locator::ArticleBase;

pub const ARTICLE_HEADERS_LABEL: &str = "Article Headers";

/// Index path of a node from the root sequence. Stable for the session since
/// the tree is never mutated, and defined even for nodes without an id.
pub type NodePath = Vec<usize>;

/// What a visible row shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Node {
        name: Option<String>,
        sequence_id: Option<i64>,
        expandable: bool,
        expanded: bool,
    },
    /// The collapsible "Article Headers" group of a node.
    HeadersDisclosure { expanded: bool, count: usize },
    Article { header_id: i64, title: String },
}

/// One visible row of the outline, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    /// Path of the node this row belongs to.
    pub path: NodePath,
    pub depth: usize,
    pub kind: RowKind,
}

impl OutlineRow {
    /// Text for the row's primary label, if any.
    pub fn label(&self) -> Option<String> {
        match &self.kind {
            RowKind::Node { name, .. } => name.clone(),
            RowKind::HeadersDisclosure { .. } => Some(ARTICLE_HEADERS_LABEL.to_string()),
            RowKind::Article { title, .. } => Some(format!("Title: {}", title)),
        }
    }

    pub fn subtitle(&self) -> Option<String> {
        match &self.kind {
            RowKind::Node {
                sequence_id: Some(seq),
                ..
            } => Some(format!("Sequence ID: {}", seq)),
            _ => None,
        }
    }
}

/// Result of activating a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A disclosure state changed; the rows need re-rendering.
    Toggled,
    /// An article was chosen.
    Selected(Url),
    Ignored,
}

/// Locator for a header, or `None` when it has no usable title.
pub fn article_locator_for(header: &ArticleHeader, base: &ArticleBase) -> Option<Url> {
    header.display_title()?;
    Some(base.article_url(header.id))
}

/// Disclosure state of the outline. Everything starts collapsed.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    expanded_nodes: HashSet<NodePath>,
    expanded_headers: HashSet<NodePath>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_node_expanded(&self, path: &[usize]) -> bool {
        self.expanded_nodes.contains(path)
    }

    pub fn are_headers_expanded(&self, path: &[usize]) -> bool {
        self.expanded_headers.contains(path)
    }

    pub fn toggle_node(&mut self, path: &[usize]) -> bool {
        toggle(&mut self.expanded_nodes, path)
    }

    pub fn toggle_headers(&mut self, path: &[usize]) -> bool {
        toggle(&mut self.expanded_headers, path)
    }

    pub fn collapse_all(&mut self) {
        self.expanded_nodes.clear();
        self.expanded_headers.clear();
    }

    /// Open every node and every header group reachable from `roots`.
    pub fn expand_all(&mut self, roots: &[CourseContent]) {
        fn visit(outline: &mut Outline, nodes: &[CourseContent], path: &mut NodePath) {
            for (i, node) in nodes.iter().enumerate() {
                path.push(i);
                if node.has_children() {
                    outline.expanded_nodes.insert(path.clone());
                }
                if !node.article_headers().is_empty() {
                    outline.expanded_headers.insert(path.clone());
                }
                visit(outline, node.children(), path);
                path.pop();
            }
        }
        visit(self, roots, &mut Vec::new());
    }

    /// Visible rows for `roots` under the current disclosure state.
    pub fn rows(&self, roots: &[CourseContent]) -> Vec<OutlineRow> {
        let mut rows = Vec::new();
        let mut path = Vec::new();
        self.push_rows(roots, 0, &mut path, &mut rows);
        rows
    }

    fn push_rows(
        &self,
        nodes: &[CourseContent],
        depth: usize,
        path: &mut NodePath,
        rows: &mut Vec<OutlineRow>,
    ) {
        for (i, node) in nodes.iter().enumerate() {
            path.push(i);

            let expandable = node.has_children();
            let expanded = expandable && self.is_node_expanded(path);
            rows.push(OutlineRow {
                path: path.clone(),
                depth,
                kind: RowKind::Node {
                    name: node.name.clone(),
                    sequence_id: node.sequence_id,
                    expandable,
                    expanded,
                },
            });

            let headers = node.article_headers();
            if !headers.is_empty() {
                let headers_expanded = self.are_headers_expanded(path);
                rows.push(OutlineRow {
                    path: path.clone(),
                    depth: depth + 1,
                    kind: RowKind::HeadersDisclosure {
                        expanded: headers_expanded,
                        count: headers.len(),
                    },
                });
                if headers_expanded {
                    for header in headers {
                        // Untitled headers are not selectable and get no row.
                        if let Some(title) = header.display_title() {
                            rows.push(OutlineRow {
                                path: path.clone(),
                                depth: depth + 2,
                                kind: RowKind::Article {
                                    header_id: header.id,
                                    title: title.to_string(),
                                },
                            });
                        }
                    }
                }
            }

            if expanded {
                self.push_rows(node.children(), depth + 1, path, rows);
            }

            path.pop();
        }
    }

    /// Apply a row activation: toggle disclosure rows, resolve article rows
    /// to their locator. Performs no navigation.
    pub fn activate(&mut self, row: &OutlineRow, base: &ArticleBase) -> Activation {
        match &row.kind {
            RowKind::Node {
                expandable: true, ..
            } => {
                self.toggle_node(&row.path);
                Activation::Toggled
            }
            RowKind::Node { .. } => Activation::Ignored,
            RowKind::HeadersDisclosure { .. } => {
                self.toggle_headers(&row.path);
                Activation::Toggled
            }
            RowKind::Article { header_id, title } if !title.is_empty() => {
                Activation::Selected(base.article_url(*header_id))
            }
            RowKind::Article { .. } => Activation::Ignored,
        }
    }
}

fn toggle(set: &mut HashSet<NodePath>, path: &[usize]) -> bool {
    if set.remove(path) {
        false
    } else {
        set.insert(path.to_vec());
        true
    }
}

type SelectionCallback = Box<dyn Fn(&Url)>;

/// The content list: the immutable tree, its disclosure state, and the
/// outward selection event. Toolkit frontends render `rows()` and route row
/// activations through `activate_row`.
pub struct ContentList {
    roots: Rc<[CourseContent]>,
    outline: Outline,
    base: ArticleBase,
    rows: Vec<OutlineRow>,
    on_article_selected: Option<SelectionCallback>,
}

impl ContentList {
    pub fn new(roots: Rc<[CourseContent]>, base: ArticleBase) -> Self {
        let outline = Outline::new();
        let rows = outline.rows(&roots);
        ContentList {
            roots,
            outline,
            base,
            rows,
            on_article_selected: None,
        }
    }

    pub fn roots(&self) -> &[CourseContent] {
        &self.roots
    }

    pub fn rows(&self) -> &[OutlineRow] {
        &self.rows
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn connect_article_selected<F>(&mut self, callback: F)
    where
        F: Fn(&Url) + 'static,
    {
        self.on_article_selected = Some(Box::new(callback));
    }

    /// Activate the visible row at `index`. Returns whether the visible rows
    /// changed and need re-rendering.
    pub fn activate_row(&mut self, index: usize) -> bool {
        let Some(row) = self.rows.get(index).cloned() else {
            log::debug!("Activation for out-of-range row {}", index);
            return false;
        };
        match self.outline.activate(&row, &self.base) {
            Activation::Toggled => {
                self.refresh();
                true
            }
            Activation::Selected(url) => {
                log::debug!("Article selected: {}", url);
                if let Some(callback) = &self.on_article_selected {
                    callback(&url);
                }
                false
            }
            Activation::Ignored => false,
        }
    }

    pub fn collapse_all(&mut self) {
        self.outline.collapse_all();
        self.refresh();
    }

    pub fn expand_all(&mut self) {
        self.outline.expand_all(&self.roots);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.rows = self.outline.rows(&self.roots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{sample_course_contents, walk};
    use std::cell::RefCell;

    fn header(id: i64, title: Option<&str>) -> ArticleHeader {
        ArticleHeader {
            id,
            title: title.map(str::to_string),
        }
    }

    fn recording_list(roots: Vec<CourseContent>) -> (ContentList, Rc<RefCell<Vec<String>>>) {
        let selected = Rc::new(RefCell::new(Vec::new()));
        let mut list = ContentList::new(roots.into(), ArticleBase::default());
        let sink = selected.clone();
        list.connect_article_selected(move |url| sink.borrow_mut().push(url.to_string()));
        (list, selected)
    }

    fn find_row(list: &ContentList, pred: impl Fn(&OutlineRow) -> bool) -> usize {
        list.rows().iter().position(pred).unwrap()
    }

    #[test]
    fn starts_with_only_root_rows_and_their_disclosures() {
        let outline = Outline::new();
        let rows = outline.rows(&sample_course_contents());
        // Two roots, each with a collapsed "Article Headers" group.
        assert_eq!(rows.len(), 4);
        assert!(matches!(
            rows[0].kind,
            RowKind::Node {
                expandable: true,
                expanded: false,
                ..
            }
        ));
        assert_eq!(rows[1].label().as_deref(), Some(ARTICLE_HEADERS_LABEL));
        assert_eq!(rows[1].depth, 1);
    }

    #[test]
    fn fully_expanded_outline_shows_every_node_exactly_once() {
        let roots = sample_course_contents();
        let mut outline = Outline::new();
        outline.expand_all(&roots);
        let rows = outline.rows(&roots);

        let mut node_paths: Vec<NodePath> = rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Node { .. }))
            .map(|r| r.path.clone())
            .collect();
        let mut walked = 0;
        walk(&roots, |_, _| walked += 1);
        assert_eq!(node_paths.len(), walked);
        node_paths.sort();
        node_paths.dedup();
        assert_eq!(node_paths.len(), walked);

        let articles = rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Article { .. }))
            .count();
        assert_eq!(articles, 8);
    }

    #[test]
    fn children_follow_parent_with_deeper_indent() {
        let roots = sample_course_contents();
        let mut outline = Outline::new();
        outline.toggle_node(&[0]);
        let rows = outline.rows(&roots);
        let child = rows.iter().find(|r| r.path == vec![0, 1]).unwrap();
        assert_eq!(child.depth, 1);
        assert_eq!(child.label().as_deref(), Some("Basic Syntax"));
        assert_eq!(child.subtitle().as_deref(), Some("Sequence ID: 2"));
    }

    #[test]
    fn activating_titled_article_selects_once() {
        let (mut list, selected) = recording_list(vec![CourseContent {
            id: Some(1),
            article_headers: Some(vec![header(1002, Some("Understanding Swift Syntax"))]),
            ..Default::default()
        }]);
        let disclosure = find_row(&list, |r| matches!(r.kind, RowKind::HeadersDisclosure { .. }));
        assert!(list.activate_row(disclosure));

        let article = find_row(&list, |r| matches!(r.kind, RowKind::Article { .. }));
        assert_eq!(
            list.rows()[article].label().as_deref(),
            Some("Title: Understanding Swift Syntax")
        );
        assert!(!list.activate_row(article));
        assert_eq!(
            *selected.borrow(),
            vec!["https://example.com/article/1002".to_string()]
        );
    }

    #[test]
    fn untitled_headers_are_never_selectable() {
        let (mut list, selected) = recording_list(vec![CourseContent {
            id: Some(1),
            article_headers: Some(vec![header(1, None), header(2, Some(""))]),
            ..Default::default()
        }]);
        list.expand_all();
        assert!(list
            .rows()
            .iter()
            .all(|r| !matches!(r.kind, RowKind::Article { .. })));
        for i in 0..list.rows().len() {
            list.activate_row(i);
        }
        assert!(selected.borrow().is_empty());

        let base = ArticleBase::default();
        assert_eq!(article_locator_for(&header(1, None), &base), None);
        assert_eq!(article_locator_for(&header(2, Some("")), &base), None);
        assert!(article_locator_for(&header(3, Some("x")), &base).is_some());
    }

    #[test]
    fn whitespace_title_is_still_selectable() {
        let (mut list, selected) = recording_list(vec![CourseContent {
            id: Some(1),
            article_headers: Some(vec![header(7, Some(" "))]),
            ..Default::default()
        }]);
        list.expand_all();
        assert_eq!(list.rows().len(), 3);
        assert_eq!(
            list.rows()[2].kind,
            RowKind::Article {
                header_id: 7,
                title: " ".to_string(),
            }
        );
        list.activate_row(2);
        assert_eq!(
            *selected.borrow(),
            vec!["https://example.com/article/7".to_string()]
        );
    }

    #[test]
    fn empty_header_list_has_no_disclosure() {
        let outline = Outline::new();
        let rows = outline.rows(&[CourseContent {
            id: Some(1),
            article_headers: Some(vec![]),
            ..Default::default()
        }]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn id_only_node_renders_single_leaf_row() {
        let (mut list, selected) = recording_list(vec![CourseContent::with_id(99)]);
        assert_eq!(list.rows().len(), 1);
        assert_eq!(
            list.rows()[0].kind,
            RowKind::Node {
                name: None,
                sequence_id: None,
                expandable: false,
                expanded: false,
            }
        );
        assert_eq!(list.rows()[0].label(), None);
        assert!(!list.activate_row(0));
        assert!(!list.activate_row(5));
        assert!(selected.borrow().is_empty());
    }

    #[test]
    fn toggling_node_twice_collapses_it() {
        let (mut list, _) = recording_list(sample_course_contents());
        let before = list.rows().len();
        assert!(list.activate_row(0));
        assert!(list.rows().len() > before);
        assert!(list.activate_row(0));
        assert_eq!(list.rows().len(), before);
    }

    #[test]
    fn collapse_all_restores_initial_rows() {
        let (mut list, _) = recording_list(sample_course_contents());
        let initial = list.rows().to_vec();
        list.expand_all();
        assert!(list.rows().len() > initial.len());
        list.collapse_all();
        assert_eq!(list.rows(), initial.as_slice());
    }
}
