//! Toolbar and sidebar controls
//!
//! The controls hold no state of their own. They are built once, their click
//! handlers are wired by the viewer, and `sync` repaints them from the
//! viewer's state after every change.

use web_sys::{Document, HtmlElement};

use super::helpers::{create_with_class, dom_error, ViewerError};
use crate::models::Labels;

const ACTIVE_CLASS: &str = "is-active";

fn button(document: &Document, class: &str, title: &str, glyph: &str) -> Result<HtmlElement, ViewerError> {
    let button = create_with_class(document, "button", class)?;
    button
        .set_attribute("type", "button")
        .map_err(dom_error("setAttribute"))?;
    button.set_title(title);
    button.set_text_content(Some(glyph));
    Ok(button)
}

/// Floating zoom/reset/download bar
pub struct Toolbar {
    pub root: HtmlElement,
    pub zoom_out: HtmlElement,
    pub zoom_label: HtmlElement,
    pub zoom_in: HtmlElement,
    pub reset: HtmlElement,
    pub download: HtmlElement,
}

impl Toolbar {
    pub fn build(document: &Document, labels: &Labels) -> Result<Self, ViewerError> {
        let root = create_with_class(document, "div", "cv-toolbar")?;
        let zoom_group = create_with_class(document, "div", "cv-toolbar-group")?;
        let action_group = create_with_class(document, "div", "cv-toolbar-group")?;

        let zoom_out = button(document, "cv-zoom-out", &labels.zoom_out, "−")?;
        let zoom_label = create_with_class(document, "span", "cv-zoom-label")?;
        let zoom_in = button(document, "cv-zoom-in", &labels.zoom_in, "+")?;
        let reset = button(document, "cv-reset", &labels.reset, "↺")?;
        let download = button(document, "cv-download", &labels.download, "⤓")?;

        for child in [&zoom_out, &zoom_label, &zoom_in] {
            zoom_group.append_child(child).map_err(dom_error("appendChild"))?;
        }
        for child in [&reset, &download] {
            action_group.append_child(child).map_err(dom_error("appendChild"))?;
        }
        root.append_child(&zoom_group).map_err(dom_error("appendChild"))?;
        root.append_child(&action_group).map_err(dom_error("appendChild"))?;

        Ok(Self {
            root,
            zoom_out,
            zoom_label,
            zoom_in,
            reset,
            download,
        })
    }

    pub fn sync(&self, zoom_percent: i32) {
        self.zoom_label
            .set_text_content(Some(&format!("{}%", zoom_percent)));
    }
}

/// Side panel with the 3D and theme toggles
pub struct Sidebar {
    pub root: HtmlElement,
    pub toggle_3d: HtmlElement,
    pub toggle_theme: HtmlElement,
}

impl Sidebar {
    pub fn build(document: &Document, labels: &Labels) -> Result<Self, ViewerError> {
        let root = create_with_class(document, "div", "cv-sidebar")?;
        let toggle_3d = button(document, "cv-toggle-3d", &labels.view_3d, "▦")?;
        let divider = create_with_class(document, "div", "cv-sidebar-divider")?;
        let toggle_theme = button(document, "cv-toggle-theme", &labels.theme_dark, "☾")?;

        for child in [&toggle_3d, &divider, &toggle_theme] {
            root.append_child(child).map_err(dom_error("appendChild"))?;
        }

        Ok(Self {
            root,
            toggle_3d,
            toggle_theme,
        })
    }

    pub fn sync(&self, is_3d: bool, is_dark: bool, labels: &Labels) {
        set_active(&self.toggle_3d, is_3d);
        self.toggle_3d
            .set_title(if is_3d { &labels.view_flat } else { &labels.view_3d });
        self.toggle_3d
            .set_text_content(Some(if is_3d { "◆" } else { "▦" }));

        set_active(&self.toggle_theme, is_dark);
        self.toggle_theme
            .set_title(if is_dark { &labels.theme_light } else { &labels.theme_dark });
        self.toggle_theme
            .set_text_content(Some(if is_dark { "☀" } else { "☾" }));
    }
}

fn set_active(element: &HtmlElement, active: bool) {
    if let Err(e) = element.class_list().toggle_with_force(ACTIVE_CLASS, active) {
        log::warn!("Could not update control state: {:?}", e);
    }
}
