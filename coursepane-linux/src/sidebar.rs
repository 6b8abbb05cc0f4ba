use gtk4::glib;
use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use coursepane_core::content::CourseContent;
use coursepane_core::locator::ArticleBase;
use coursepane_core::outline::{ContentList, OutlineRow, RowKind};
use url::Url;

/// The left pane: a toolbar and the content outline.
pub struct SidebarState {
    pub content_list: Rc<RefCell<ContentList>>,
}

impl SidebarState {
    /// Forward article selections to `callback`. The sidebar never navigates.
    pub fn connect_article_selected<F>(&self, callback: F)
    where
        F: Fn(&Url) + 'static,
    {
        self.content_list
            .borrow_mut()
            .connect_article_selected(callback);
    }
}

/// Build the sidebar widget for the given content tree.
pub fn build_sidebar(
    roots: Rc<[CourseContent]>,
    base: ArticleBase,
    min_width: i32,
) -> (gtk4::Box, SidebarState) {
    let sidebar = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    sidebar.add_css_class("sidebar");
    sidebar.set_width_request(min_width);

    let toolbar_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 2);
    toolbar_box.add_css_class("sidebar-toolbar");
    toolbar_box.set_halign(gtk4::Align::End);

    let expand_btn = gtk4::Button::from_icon_name("view-list-symbolic");
    expand_btn.set_tooltip_text(Some("Expand All"));
    expand_btn.set_cursor_from_name(Some("pointer"));
    expand_btn.add_css_class("flat");

    let collapse_btn = gtk4::Button::from_icon_name("view-restore-symbolic");
    collapse_btn.set_tooltip_text(Some("Collapse All"));
    collapse_btn.set_cursor_from_name(Some("pointer"));
    collapse_btn.add_css_class("flat");

    toolbar_box.append(&expand_btn);
    toolbar_box.append(&collapse_btn);

    let scroll = gtk4::ScrolledWindow::new();
    scroll.set_vexpand(true);
    scroll.set_hscrollbar_policy(gtk4::PolicyType::Never);
    let outline_list = gtk4::ListBox::new();
    outline_list.set_selection_mode(gtk4::SelectionMode::None);
    outline_list.set_activate_on_single_click(true);
    outline_list.add_css_class("content-outline");
    scroll.set_child(Some(&outline_list));

    sidebar.append(&toolbar_box);
    sidebar.append(&scroll);

    let content_list = Rc::new(RefCell::new(ContentList::new(roots, base)));
    render_outline(&outline_list, content_list.borrow().rows());

    {
        let content_list = content_list.clone();
        outline_list.connect_row_activated(move |list, row| {
            let Ok(index) = usize::try_from(row.index()) else {
                return;
            };
            let changed = content_list.borrow_mut().activate_row(index);
            if changed {
                // Rebuild after the activation signal has finished with the row.
                let list = list.clone();
                let content_list = content_list.clone();
                glib::idle_add_local_once(move || {
                    render_outline(&list, content_list.borrow().rows());
                });
            }
        });
    }

    {
        let content_list = content_list.clone();
        let list = outline_list.clone();
        expand_btn.connect_clicked(move |_| {
            content_list.borrow_mut().expand_all();
            render_outline(&list, content_list.borrow().rows());
        });
    }

    {
        let content_list = content_list.clone();
        let list = outline_list.clone();
        collapse_btn.connect_clicked(move |_| {
            content_list.borrow_mut().collapse_all();
            render_outline(&list, content_list.borrow().rows());
        });
    }

    (sidebar, SidebarState { content_list })
}

/// Build a single row widget for an outline row.
fn build_outline_row(row: &OutlineRow) -> gtk4::Box {
    let widget = gtk4::Box::new(gtk4::Orientation::Horizontal, 4);
    widget.add_css_class("outline-row");
    if row.depth > 0 {
        widget.set_margin_start((row.depth as i32) * 16);
    }

    // Disclosure arrow for expandable rows, spacer otherwise
    let arrow_state = match row.kind {
        RowKind::Node {
            expandable: true,
            expanded,
            ..
        } => Some(expanded),
        RowKind::HeadersDisclosure { expanded, .. } => Some(expanded),
        _ => None,
    };
    match arrow_state {
        Some(expanded) => {
            let arrow = gtk4::Image::from_icon_name(if expanded {
                "pan-down-symbolic"
            } else {
                "pan-end-symbolic"
            });
            arrow.set_pixel_size(12);
            widget.append(&arrow);
            widget.set_cursor_from_name(Some("pointer"));
        }
        None => {
            let spacer = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
            spacer.set_size_request(12, -1);
            widget.append(&spacer);
        }
    }

    match &row.kind {
        RowKind::Node { .. } => {
            let text_box = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
            if let Some(name) = row.label() {
                let label = gtk4::Label::new(Some(&name));
                label.add_css_class("outline-node-name");
                label.set_halign(gtk4::Align::Start);
                label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
                text_box.append(&label);
            }
            if let Some(subtitle) = row.subtitle() {
                let label = gtk4::Label::new(Some(&subtitle));
                label.add_css_class("outline-sequence");
                label.set_halign(gtk4::Align::Start);
                text_box.append(&label);
            }
            widget.append(&text_box);
        }
        RowKind::HeadersDisclosure { .. } => {
            let label = gtk4::Label::new(row.label().as_deref());
            label.add_css_class("outline-disclosure");
            label.set_halign(gtk4::Align::Start);
            widget.append(&label);
        }
        RowKind::Article { .. } => {
            let label = gtk4::Label::new(row.label().as_deref());
            label.add_css_class("outline-article");
            label.set_halign(gtk4::Align::Start);
            label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
            widget.append(&label);
            widget.set_cursor_from_name(Some("pointer"));
        }
    }

    widget
}

/// Render the visible rows into the ListBox.
fn render_outline(list: &gtk4::ListBox, rows: &[OutlineRow]) {
    clear_list(list);
    for row in rows {
        list.append(&build_outline_row(row));
    }
}

fn clear_list(list: &gtk4::ListBox) {
    while let Some(row) = list.row_at_index(0) {
        list.remove(&row);
    }
}
