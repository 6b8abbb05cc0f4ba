use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gtk4::prelude::*;
use webkit6::prelude::*;

use coursepane_core::bridge::{self, MessageBridge, ViewerSource, CALLBACK_CHANNEL};

use crate::theme::ThemeColors;

/// Handle for an embedded web view showing either a URL or raw markup.
pub struct ViewerHandle {
    webview: webkit6::WebView,
    source: RefCell<ViewerSource>,
    bridge: RefCell<MessageBridge>,
}

impl ViewerHandle {
    /// Point the existing view at new content of the same mode it was
    /// created with. Issues one load request, and only when the content
    /// actually changed. A source of the other mode is rejected.
    pub fn set_source(&self, source: ViewerSource) {
        if !self.source.borrow().same_mode(&source) {
            log::warn!("Ignoring viewer source of a different mode: {:?}", source);
            return;
        }
        if *self.source.borrow() == source {
            return;
        }
        *self.source.borrow_mut() = source;
        self.load_current();
    }

    /// Load the current source again, e.g. after a failed load.
    pub fn reload_current(&self) {
        log::info!("Reloading viewer content");
        self.load_current();
    }

    fn load_current(&self) {
        match &*self.source.borrow() {
            ViewerSource::Url(url) => {
                log::debug!("Loading {}", url);
                self.webview.load_uri(url.as_str());
            }
            ViewerSource::Markup(markup) => {
                // No base URI: relative references in the markup stay unresolved.
                self.webview.load_html(markup, None);
            }
        }
    }
}

/// Create a web view for `source` inside a container box.
///
/// A script message channel named `callbackHandler` is registered on
/// creation. String payloads posted on it reach `on_message`; anything else
/// is dropped. Load failures are logged and replaced by a page with a Retry
/// button that posts `"retry"` on the same channel.
pub fn create_viewer<F>(
    source: ViewerSource,
    theme: &ThemeColors,
    on_message: F,
) -> (gtk4::Box, Rc<ViewerHandle>)
where
    F: Fn(&ViewerHandle, &str) + 'static,
{
    let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    container.set_hexpand(true);
    container.set_vexpand(true);

    let user_content_manager = webkit6::UserContentManager::new();

    let webview = webkit6::WebView::builder()
        .user_content_manager(&user_content_manager)
        .hexpand(true)
        .vexpand(true)
        .build();

    // Match the theme so there is no white flash while loading
    webview.set_background_color(&theme.bg_rgba());

    if let Some(wk_settings) = webkit6::prelude::WebViewExt::settings(&webview) {
        wk_settings.set_enable_javascript(true);
        wk_settings.set_enable_developer_extras(true);
    }

    let handle = Rc::new(ViewerHandle {
        webview: webview.clone(),
        source: RefCell::new(source),
        bridge: RefCell::new(MessageBridge::new()),
    });

    // Host side of the channel
    {
        let weak: Weak<ViewerHandle> = Rc::downgrade(&handle);
        handle
            .bridge
            .borrow_mut()
            .register(CALLBACK_CHANNEL, move |message| {
                if let Some(handle) = weak.upgrade() {
                    on_message(&handle, message);
                }
            });
    }

    // JS→Rust messages
    user_content_manager.register_script_message_handler(CALLBACK_CHANNEL, None);
    {
        let weak = Rc::downgrade(&handle);
        user_content_manager.connect_script_message_received(
            Some(CALLBACK_CHANNEL),
            move |_ucm, value| {
                let Some(handle) = weak.upgrade() else {
                    return;
                };
                let Some(json) = value.to_json(0) else {
                    log::debug!("Dropped script message that has no JSON form");
                    return;
                };
                let result = handle.bridge.borrow().deliver_json(CALLBACK_CHANNEL, &json);
                if let Err(e) = result {
                    log::debug!("Dropped script message: {}", e);
                }
            },
        );
    }

    webview.connect_load_failed(|webview, _event, failing_uri, error| {
        if error.matches(webkit6::NetworkError::Cancelled) {
            // Superseded by a newer navigation
            return false;
        }
        log::warn!("Failed to load {}: {}", failing_uri, error);
        let page = bridge::load_failure_markup(failing_uri, &error.to_string());
        webview.load_alternate_html(&page, failing_uri, None);
        true
    });

    handle.load_current();
    container.append(&webview);

    (container, handle)
}
