use gtk4::prelude::*;
use libadwaita as adw;
use libadwaita::prelude::*;

use std::cell::RefCell;
use std::rc::Rc;

use coursepane_core::bridge::{ViewerSource, RETRY_MESSAGE};
use coursepane_core::content::{self, CourseContent};
use coursepane_core::layout::{SelectionChange, SplitLayout, PLACEHOLDER_TEXT};

use crate::settings::{self, Settings};
use crate::sidebar;
use crate::status_bar::StatusBar;
use crate::theme;
use crate::viewer::{self, ViewerHandle};

const PLACEHOLDER_PAGE: &str = "placeholder";
const VIEWER_PAGE: &str = "viewer";

/// Load the course tree from the configured file, or the bundled sample.
fn load_contents(settings: &Settings) -> Rc<[CourseContent]> {
    let contents = match settings.content_path() {
        Some(path) => content::load_course_contents(&path).unwrap_or_else(|e| {
            log::warn!("{}; falling back to the bundled catalogue", e);
            content::sample_course_contents()
        }),
        None => content::sample_course_contents(),
    };
    contents.into()
}

pub fn build_window(app: &adw::Application) {
    let settings = Rc::new(RefCell::new(settings::load()));
    let theme = theme::get_theme(&settings.borrow().color_scheme);

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Coursepane")
        .default_width(settings.borrow().window_width)
        .default_height(settings.borrow().window_height)
        .build();

    let layout = Rc::new(RefCell::new(SplitLayout::new(
        f64::from(settings.borrow().sidebar_width),
        settings.borrow().width_range(),
    )));

    // Main vertical layout
    let main_box = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    main_box.append(&header);

    // Horizontal pane: outline + viewer
    let paned = gtk4::Paned::new(gtk4::Orientation::Horizontal);
    paned.set_vexpand(true);
    paned.set_position(layout.borrow().width() as i32);
    paned.set_shrink_start_child(false);
    paned.set_shrink_end_child(false);
    paned.set_resize_start_child(false);

    let roots = load_contents(&settings.borrow());
    let (sidebar_widget, sidebar_state) = sidebar::build_sidebar(
        roots,
        settings.borrow().article_base(),
        layout.borrow().range().min as i32,
    );
    paned.set_start_child(Some(&sidebar_widget));

    // The divider reports positions continuously while dragging; keep them in range.
    {
        let layout = layout.clone();
        paned.connect_notify_local(Some("position"), move |paned, _| {
            let position = paned.position();
            let clamped = layout.borrow_mut().set_width(f64::from(position)) as i32;
            if clamped != position {
                paned.set_position(clamped);
            }
        });
    }

    // Right side: placeholder until the first selection, then the viewer
    let right_box = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let content_stack = gtk4::Stack::new();
    content_stack.set_vexpand(true);
    content_stack.set_hexpand(true);

    let placeholder = gtk4::Label::new(Some(PLACEHOLDER_TEXT));
    placeholder.add_css_class("viewer-placeholder");
    placeholder.set_hexpand(true);
    placeholder.set_vexpand(true);
    content_stack.add_named(&placeholder, Some(PLACEHOLDER_PAGE));
    content_stack.set_visible_child_name(PLACEHOLDER_PAGE);

    let status_bar = Rc::new(StatusBar::new());
    status_bar.widget.set_visible(false);

    right_box.append(&content_stack);
    right_box.append(&status_bar.widget);
    paned.set_end_child(Some(&right_box));

    main_box.append(&paned);
    window.set_content(Some(&main_box));

    // Selection: outline → layout state → viewer
    let viewer_handle: Rc<RefCell<Option<Rc<ViewerHandle>>>> = Rc::new(RefCell::new(None));
    {
        let layout = layout.clone();
        let viewer_handle = viewer_handle.clone();
        let content_stack = content_stack.clone();
        let status_bar = status_bar.clone();
        sidebar_state.connect_article_selected(move |url| {
            let change = layout.borrow_mut().select_article(url.clone());
            match change {
                SelectionChange::Mounted => {
                    let status_for_messages = status_bar.clone();
                    let (viewer_widget, handle) = viewer::create_viewer(
                        ViewerSource::Url(url.clone()),
                        theme,
                        move |handle, message| {
                            log::info!("JavaScript message received: {}", message);
                            status_for_messages.update_message(message);
                            if message == RETRY_MESSAGE {
                                handle.reload_current();
                            }
                        },
                    );
                    content_stack.add_named(&viewer_widget, Some(VIEWER_PAGE));
                    content_stack.set_visible_child_name(VIEWER_PAGE);
                    *viewer_handle.borrow_mut() = Some(handle);
                }
                SelectionChange::Replaced => {
                    if let Some(handle) = viewer_handle.borrow().as_ref() {
                        handle.set_source(ViewerSource::Url(url.clone()));
                    }
                }
                SelectionChange::Unchanged => return,
            }
            status_bar.update_url(url.as_str());
            status_bar.widget.set_visible(true);
        });
    }

    // Save window state on close
    {
        let settings = settings.clone();
        let layout = layout.clone();
        window.connect_close_request(move |window| {
            {
                let mut s = settings.borrow_mut();
                s.window_width = window.width();
                s.window_height = window.height();
                s.sidebar_width = layout.borrow().width() as i32;
            }
            settings::save(&settings.borrow());
            gtk4::glib::Propagation::Proceed
        });
    }

    window.present();
}
