//! Browser bindings for the theme preference

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Storage};

use super::preference::{ThemeError, ThemeMarker, ThemeStorage};
use super::transition::{RevealPlan, CONTRACT_CLASS};

pub const DARK_CLASS: &str = "dark";

/// `window.localStorage`, if the page is allowed to use it
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Returns `None` when storage is blocked (private mode, sandboxed frame)
    pub fn open() -> Option<Self> {
        let window = web_sys::window()?;
        match window.local_storage() {
            Ok(Some(storage)) => Some(Self { storage }),
            Ok(None) => None,
            Err(e) => {
                log::warn!("localStorage unavailable: {:?}", e);
                None
            }
        }
    }
}

impl ThemeStorage for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ThemeError> {
        self.storage
            .get_item(key)
            .map_err(|e| ThemeError::StorageUnavailable(format!("{:?}", e)))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), ThemeError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| ThemeError::StorageUnavailable(format!("{:?}", e)))
    }
}

/// The `dark` class on `document.documentElement`
pub struct RootClassMarker {
    root: Element,
}

impl RootClassMarker {
    pub fn new(document: &Document) -> Option<Self> {
        document.document_element().map(|root| Self { root })
    }
}

impl ThemeMarker for RootClassMarker {
    fn apply(&self, dark: bool) {
        if let Err(e) = self.root.class_list().toggle_with_force(DARK_CLASS, dark) {
            log::warn!("Could not update theme class: {:?}", e);
        }
    }

    fn is_dark(&self) -> bool {
        self.root.class_list().contains(DARK_CLASS)
    }
}

/// Run `update` inside a view transition and animate a circular reveal.
///
/// Returns false when the primitive is missing or refused to start; the
/// caller then applies the change directly. `update` must be idempotent since
/// it may already have run when the start call throws.
pub fn start_reveal(document: &Document, plan: RevealPlan, update: Rc<dyn Fn()>) -> bool {
    let start = match js_sys::Reflect::get(document, &JsValue::from_str("startViewTransition")) {
        Ok(value) if value.is_function() => value.unchecked_into::<js_sys::Function>(),
        _ => {
            log::debug!("View transitions unsupported; applying theme directly");
            return false;
        }
    };

    let root = match document.document_element() {
        Some(root) => root,
        None => return false,
    };
    if let Err(e) = root.class_list().toggle_with_force(CONTRACT_CLASS, plan.contracting) {
        log::warn!("Could not set reveal class: {:?}", e);
    }

    let callback = Closure::once_into_js(move || update());
    let transition = match start.call1(document, &callback) {
        Ok(transition) => transition,
        Err(e) => {
            log::warn!("startViewTransition failed: {:?}", e);
            clear_contract_class(&root);
            return false;
        }
    };

    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = animate_reveal(&root, &transition, &plan).await {
            log::warn!("Theme reveal animation skipped: {:?}", e);
        }
        if let Ok(finished) = js_sys::Reflect::get(&transition, &JsValue::from_str("finished")) {
            if let Ok(promise) = finished.dyn_into::<js_sys::Promise>() {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("View transition finished with rejection: {:?}", e);
                }
            }
        }
        clear_contract_class(&root);
    });
    true
}

fn clear_contract_class(root: &Element) {
    if let Err(e) = root.class_list().remove_1(CONTRACT_CLASS) {
        log::warn!("Could not clear reveal class: {:?}", e);
    }
}

async fn animate_reveal(root: &Element, transition: &JsValue, plan: &RevealPlan) -> Result<(), JsValue> {
    let ready: js_sys::Promise = js_sys::Reflect::get(transition, &JsValue::from_str("ready"))?.dyn_into()?;
    JsFuture::from(ready).await?;

    let keyframes = serde_wasm_bindgen::to_value(&plan.keyframes())?;
    let timing = serde_wasm_bindgen::to_value(&plan.timing())?;
    let animate: js_sys::Function = js_sys::Reflect::get(root, &JsValue::from_str("animate"))?.dyn_into()?;
    animate.call2(root, &keyframes, &timing)?;
    Ok(())
}
