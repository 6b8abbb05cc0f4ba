use gtk4::gdk;

/// Colors for the whole application.
pub struct ThemeColors {
    pub bg: &'static str,
    pub bg_dark: &'static str,
    pub bg_highlight: &'static str,
    pub fg: &'static str,
    pub fg_dark: &'static str,
    pub accent: &'static str,
    pub link: &'static str,
    pub comment: &'static str,
    pub dark: bool,
}

impl ThemeColors {
    pub fn bg_rgba(&self) -> gdk::RGBA {
        parse_color(self.bg)
    }
}

// ---------------------------------------------------------------------------
// Built-in themes
// ---------------------------------------------------------------------------

/// Nord, the default.
pub static DEFAULT: ThemeColors = ThemeColors {
    bg: "#2E3440",
    bg_dark: "#272C36",
    bg_highlight: "#434C5E",
    fg: "#D8DEE9",
    fg_dark: "#E5E9F0",
    accent: "#88C0D0",
    link: "#81A1C1",
    comment: "#4C566A",
    dark: true,
};

pub static LIGHT: ThemeColors = ThemeColors {
    bg: "#ffffff",
    bg_dark: "#f6f8fa",
    bg_highlight: "#f0f2f4",
    fg: "#1f2328",
    fg_dark: "#656d76",
    accent: "#0a3069",
    link: "#0969da",
    comment: "#6e7781",
    dark: false,
};

/// Look up a built-in theme by name, falling back to the default.
pub fn get_theme(name: &str) -> &'static ThemeColors {
    match name.to_ascii_lowercase().as_str() {
        "light" | "github-light" | "github_light" => &LIGHT,
        "default" | "dark" | "nord" => &DEFAULT,
        other => {
            log::warn!("Unknown color scheme '{}', using default", other);
            &DEFAULT
        }
    }
}

// ---------------------------------------------------------------------------
// CSS loading
// ---------------------------------------------------------------------------

fn parse_color(hex: &str) -> gdk::RGBA {
    gdk::RGBA::parse(hex).unwrap_or_else(|_| {
        log::warn!("Invalid color value: '{}', using fallback", hex);
        gdk::RGBA::new(1.0, 0.0, 1.0, 1.0) // Magenta fallback makes errors visible
    })
}

/// Generate and apply the application-wide CSS for the given theme.
pub fn load_css(theme: &ThemeColors) -> Option<gtk4::CssProvider> {
    let css = format!(
        r#"
        /* --- Sidebar outline --- */
        .sidebar {{
            background-color: {bg_dark};
        }}
        .sidebar-toolbar {{
            padding: 2px 4px;
        }}
        .content-outline {{
            background-color: {bg_dark};
        }}
        .outline-row {{
            padding: 3px 8px;
            min-height: 26px;
        }}
        .outline-node-name {{
            color: {fg};
            font-weight: 700;
        }}
        .outline-sequence {{
            color: {comment};
            font-size: 11px;
        }}
        .outline-disclosure {{
            color: {fg_dark};
            font-size: 12px;
        }}
        .outline-article {{
            color: {link};
            font-size: 11px;
        }}

        /* --- Divider --- */
        paned > separator {{
            min-width: 5px;
            background-color: alpha({comment}, 0.5);
        }}

        /* --- Viewer pane --- */
        .viewer-placeholder {{
            color: {comment};
            font-size: 15px;
            font-weight: 700;
            background-color: {bg};
        }}
        .status-bar {{
            background-color: {bg_dark};
            padding: 2px 12px;
            min-height: 24px;
            border-top: 1px solid {bg_highlight};
        }}
        .status-bar label {{
            font-size: 12px;
            color: {fg_dark};
        }}
        .status-bar .current-url {{
            color: {fg};
        }}
        .status-bar .last-message {{
            color: {accent};
        }}
        "#,
        bg = theme.bg,
        bg_dark = theme.bg_dark,
        bg_highlight = theme.bg_highlight,
        fg = theme.fg,
        fg_dark = theme.fg_dark,
        accent = theme.accent,
        link = theme.link,
        comment = theme.comment,
    );

    let Some(display) = gdk::Display::default() else {
        log::error!("No default display; skipping CSS");
        return None;
    };
    let provider = gtk4::CssProvider::new();
    provider.load_from_string(&css);
    gtk4::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk4::STYLE_PROVIDER_PRIORITY_USER,
    );
    Some(provider)
}
