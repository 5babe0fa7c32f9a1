//! Stylesheet templates
//!
//! Mustache templates for the two stylesheets the viewer needs:
//!
//! - `Live`: injected once into the host page. Carries both palettes (light on
//!   `:root`, dark on `:root.dark`) so a theme switch is a single class flip.
//! - `Offscreen`: injected into the export surface. Carries only the palette of
//!   the theme active when export started, since the surface has no root marker.
//!
//! Page rules (`page.css`) are shared by both; viewer chrome (`viewer.css.mustache`) is
//! only in the live sheet.

use serde::Serialize;

use crate::theme::Theme;
use crate::viewport::transform::PERSPECTIVE_PX;

/// Colors for one theme
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Palette {
    pub stage_background: &'static str,
    pub page_background: &'static str,
    pub text: &'static str,
    pub heading: &'static str,
    pub muted: &'static str,
    pub rule: &'static str,
    pub header_rule: &'static str,
    pub link: &'static str,
    pub control_background: &'static str,
    pub control_border: &'static str,
}

pub const LIGHT: Palette = Palette {
    stage_background: "#e5e5e5",
    page_background: "#ffffff",
    text: "#000000",
    heading: "#000000",
    muted: "#4b5563",
    rule: "#000000",
    header_rule: "#000000",
    link: "#2563eb",
    control_background: "#ffffff",
    control_border: "#e5e5e5",
};

pub const DARK: Palette = Palette {
    stage_background: "#09090b",
    page_background: "#1a1a1a",
    text: "#cbd5e1",
    heading: "#ffffff",
    muted: "#94a3b8",
    rule: "#475569",
    header_rule: "#ffffff",
    link: "#60a5fa",
    control_background: "#171717",
    control_border: "#262626",
};

impl Palette {
    pub fn for_theme(theme: Theme) -> &'static Palette {
        match theme {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }
}

/// Template selection
#[derive(Debug, Clone, Copy)]
pub enum StyleTemplate {
    Live,
    Offscreen,
}

#[derive(Debug, Clone, Serialize)]
struct LiveContext<'a> {
    light: &'a Palette,
    dark: &'a Palette,
}

#[derive(Debug, Clone, Serialize)]
struct ViewerContext {
    perspective_px: u32,
}

const PALETTE_TEMPLATE: &str = include_str!("templates/palette.css.mustache");
const OFFSCREEN_TEMPLATE: &str = include_str!("templates/offscreen.css.mustache");
const PAGE_CSS: &str = include_str!("templates/page.css");
const VIEWER_TEMPLATE: &str = include_str!("templates/viewer.css.mustache");

fn render_template<T: Serialize>(template: &str, context: &T) -> Result<String, mustache::Error> {
    mustache::compile_str(template)?.render_to_string(context)
}

/// Render a stylesheet.
///
/// `theme` selects the palette for `Offscreen`; `Live` always carries both.
pub fn render_stylesheet(template: StyleTemplate, theme: Theme) -> Result<String, mustache::Error> {
    match template {
        StyleTemplate::Live => {
            let palettes = render_template(
                PALETTE_TEMPLATE,
                &LiveContext {
                    light: &LIGHT,
                    dark: &DARK,
                },
            )?;
            let chrome = render_template(
                VIEWER_TEMPLATE,
                &ViewerContext {
                    perspective_px: PERSPECTIVE_PX,
                },
            )?;
            Ok(format!("{}\n{}\n{}", palettes, PAGE_CSS, chrome))
        }
        StyleTemplate::Offscreen => {
            let vars = render_template(OFFSCREEN_TEMPLATE, Palette::for_theme(theme))?;
            Ok(format!("{}\n{}", vars, PAGE_CSS))
        }
    }
}
