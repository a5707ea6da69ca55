//! `window.Telegram.WebApp` bindings.

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::chrome::{Host, ImpactStyle, NotificationType, Theme};
use crate::error::VinylError;

use super::js_error;

// Every import catches: a throwing SDK call must come back as an error,
// never unwind through a handler holding the player borrow.
#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type WebApp;

    #[wasm_bindgen(method, catch)]
    fn expand(this: &WebApp) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = onEvent)]
    fn on_event(this: &WebApp, event_type: &str, callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, getter = MainButton)]
    fn main_button(this: &WebApp) -> Result<MainButton, JsValue>;

    #[wasm_bindgen(method, catch, getter = HapticFeedback)]
    fn haptic_feedback(this: &WebApp) -> Result<HapticFeedback, JsValue>;

    #[wasm_bindgen(method, catch, getter = themeParams)]
    fn theme_params(this: &WebApp) -> Result<ThemeParams, JsValue>;

    #[wasm_bindgen(method, catch, getter = backgroundColor)]
    fn background_color(this: &WebApp) -> Result<Option<String>, JsValue>;

    pub type MainButton;

    #[wasm_bindgen(method, catch, js_name = setText)]
    fn set_text(this: &MainButton, text: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = onClick)]
    fn on_click(this: &MainButton, callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn show(this: &MainButton) -> Result<(), JsValue>;

    pub type HapticFeedback;

    #[wasm_bindgen(method, catch, js_name = impactOccurred)]
    fn impact_occurred(this: &HapticFeedback, style: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = notificationOccurred)]
    fn notification_occurred(this: &HapticFeedback, kind: &str) -> Result<(), JsValue>;

    pub type ThemeParams;

    #[wasm_bindgen(method, catch, getter)]
    fn bg_color(this: &ThemeParams) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(method, catch, getter)]
    fn text_color(this: &ThemeParams) -> Result<Option<String>, JsValue>;
}

/// Host events the player subscribes to.
pub const THEME_CHANGED: &str = "themeChanged";
pub const VIEWPORT_CHANGED: &str = "viewportChanged";

#[derive(Debug, Clone)]
pub struct TelegramHost {
    app: WebApp,
}

impl TelegramHost {
    /// Look up `window.Telegram.WebApp`, loaded by telegram-web-app.js.
    pub fn from_window() -> Result<Self, VinylError> {
        let global = js_sys::global();
        let telegram = Reflect::get(&global, &JsValue::from_str("Telegram")).map_err(js_error)?;
        if telegram.is_undefined() {
            return Err(VinylError::Host("window.Telegram is not defined".to_string()));
        }
        let app = Reflect::get(&telegram, &JsValue::from_str("WebApp")).map_err(js_error)?;
        if app.is_undefined() {
            return Err(VinylError::Host("window.Telegram.WebApp is not defined".to_string()));
        }
        Ok(TelegramHost {
            app: app.unchecked_into(),
        })
    }

    pub fn on_main_button_click(&self, callback: &Closure<dyn FnMut()>) -> Result<(), VinylError> {
        self.app
            .main_button()
            .and_then(|button| button.on_click(callback.as_ref().unchecked_ref()))
            .map_err(js_error)
    }

    pub fn on_event(&self, event_type: &str, callback: &Closure<dyn FnMut()>) -> Result<(), VinylError> {
        self.app
            .on_event(event_type, callback.as_ref().unchecked_ref())
            .map_err(js_error)
    }

    fn haptics(&self) -> Result<HapticFeedback, VinylError> {
        self.app.haptic_feedback().map_err(js_error)
    }
}

impl Host for TelegramHost {
    fn expand(&mut self) -> Result<(), VinylError> {
        self.app.expand().map_err(js_error)
    }

    fn set_button_label(&mut self, label: &str) -> Result<(), VinylError> {
        let button = self.app.main_button().map_err(js_error)?;
        button.set_text(label).map_err(js_error)
    }

    fn show_button(&mut self) -> Result<(), VinylError> {
        let button = self.app.main_button().map_err(js_error)?;
        button.show().map_err(js_error)
    }

    fn impact(&mut self, style: ImpactStyle) -> Result<(), VinylError> {
        self.haptics()?
            .impact_occurred(style.as_str())
            .map_err(js_error)
    }

    fn notify(&mut self, kind: NotificationType) -> Result<(), VinylError> {
        self.haptics()?
            .notification_occurred(kind.as_str())
            .map_err(js_error)
    }

    fn theme(&self) -> Result<Theme, VinylError> {
        let params = self.app.theme_params().map_err(js_error)?;
        let background = match params.bg_color().map_err(js_error)? {
            Some(color) => Some(color),
            None => self.app.background_color().map_err(js_error)?,
        };
        Ok(Theme {
            background,
            foreground: params.text_color().map_err(js_error)?,
        })
    }
}
