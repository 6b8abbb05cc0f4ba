use gtk4::prelude::*;

/// Status bar under the viewer: the displayed locator and the last message
/// posted by the page.
pub struct StatusBar {
    pub widget: gtk4::Box,
    url_label: gtk4::Label,
    message_label: gtk4::Label,
}

impl StatusBar {
    pub fn new() -> Self {
        let widget = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
        widget.add_css_class("status-bar");

        let url_label = gtk4::Label::new(None);
        url_label.add_css_class("current-url");
        url_label.set_hexpand(true);
        url_label.set_halign(gtk4::Align::Start);
        url_label.set_ellipsize(gtk4::pango::EllipsizeMode::Middle);

        let message_label = gtk4::Label::new(None);
        message_label.add_css_class("last-message");
        message_label.set_visible(false);
        message_label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        message_label.set_max_width_chars(48);

        widget.append(&url_label);
        widget.append(&message_label);

        StatusBar {
            widget,
            url_label,
            message_label,
        }
    }

    pub fn update_url(&self, url: &str) {
        self.url_label.set_text(url);
        self.url_label.set_tooltip_text(Some(url));
    }

    /// Show the last page message. It may belong to content that has since
    /// been replaced.
    pub fn update_message(&self, message: &str) {
        self.message_label.set_text(&format!("Page: {}", message));
        self.message_label.set_visible(true);
    }
}
