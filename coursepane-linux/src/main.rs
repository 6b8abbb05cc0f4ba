mod settings;
mod sidebar;
mod status_bar;
mod theme;
mod viewer;
mod window;

use libadwaita as adw;
use libadwaita::prelude::*;

const APP_ID: &str = "dev.coursepane.Coursepane";

fn main() {
    env_logger::init();

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_startup(|_app| {
        let settings = settings::load();
        let theme = theme::get_theme(&settings.color_scheme);
        let style_manager = adw::StyleManager::default();
        style_manager.set_color_scheme(if theme.dark {
            adw::ColorScheme::ForceDark
        } else {
            adw::ColorScheme::ForceLight
        });
        theme::load_css(theme);
    });

    app.connect_activate(move |app| {
        window::build_window(app);
    });

    app.run();
}
