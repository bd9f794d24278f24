use garden_core::{StorageKey, Theme};

use crate::utils::BrowserStorage;

pub(crate) const ATTR_NAME: &str = "data-theme";

fn update_html(theme: Theme) {
    use gloo::utils::document;

    let Some(html) = document().document_element() else {
        log::error!("document has no root element");
        return;
    };
    let scheme = theme.scheme();
    log::debug!("theme-scheme: {}", scheme);
    if let Err(err) = html.set_attribute(ATTR_NAME, scheme) {
        log::error!("failed to set theme: {:?}", err);
    }
}

pub(crate) fn init() {
    update_html(Theme::load_or_default(&BrowserStorage));
}

pub(crate) fn apply(theme: Theme) {
    theme.save(&mut BrowserStorage);
    update_html(theme);
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use garden_core::KeyValueStore;
    use gloo::utils::document;
    use wasm_bindgen_test::*;

    fn html_theme() -> Option<String> {
        document().document_element()?.get_attribute(ATTR_NAME)
    }

    #[wasm_bindgen_test]
    fn apply_marks_html_and_persists() {
        apply(Theme::Dark);

        assert_eq!(html_theme().as_deref(), Some("dark"));
        assert_eq!(Theme::load_or_default(&BrowserStorage), Theme::Dark);

        apply(Theme::Light);

        assert_eq!(html_theme().as_deref(), Some("light"));
    }

    #[wasm_bindgen_test]
    fn init_falls_back_to_light_on_malformed_value() {
        BrowserStorage.write(Theme::KEY, "purple");

        init();

        assert_eq!(html_theme().as_deref(), Some("light"));
    }
}
