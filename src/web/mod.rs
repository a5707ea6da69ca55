//! Browser bindings: Web Audio, the DOM and Telegram's WebApp SDK wired
//! into a [`VinylPlayer`].
//!
//! The player lives in an `Rc<RefCell<_>>` shared by the event closures.
//! Handlers run one at a time on the main thread, so a borrow never
//! overlaps another.

pub mod audio;
pub mod dom;
pub mod telegram;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, EventTarget, TouchEvent};

use crate::config::PlayerConfig;
use crate::error::VinylError;
use crate::gesture::Point;
use crate::player::VinylPlayer;

use audio::{WebAudio, load_track};
use dom::DomSurface;
use telegram::{TelegramHost, THEME_CHANGED, VIEWPORT_CHANGED};

pub type WebPlayer = VinylPlayer<WebAudio, TelegramHost, DomSurface>;

type SharedPlayer = Rc<RefCell<WebPlayer>>;

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn js_error(value: JsValue) -> VinylError {
    VinylError::Host(describe(&value))
}

/// WASM-exposed: build the player, bind it to the page and start loading
/// the track. `config` is an optional plain object of `PlayerConfig`
/// fields.
#[wasm_bindgen]
pub fn mount(config: JsValue) -> Result<(), JsValue> {
    let config: PlayerConfig = if config.is_undefined() || config.is_null() {
        PlayerConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&format!("{e}")))?
    };
    start(config).map_err(|e| JsValue::from_str(&format!("{e}")))
}

fn start(config: PlayerConfig) -> Result<(), VinylError> {
    let audio = WebAudio::new()?;
    let context = audio.context().clone();
    let host = TelegramHost::from_window()?;
    let surface = DomSurface::new(&config.disk_element_id, &config.paused_class)?;
    let url = config.asset_url.clone();

    let player: SharedPlayer = Rc::new(RefCell::new(VinylPlayer::new(
        audio,
        host.clone(),
        surface.clone(),
        config,
    )?));

    bind_host(&player, &host)?;
    bind_touch(&player, &surface)?;

    wasm_bindgen_futures::spawn_local(async move {
        match load_track(&context, &url).await {
            Ok(buffer) => player.borrow_mut().asset_loaded(buffer),
            Err(e) => player.borrow_mut().asset_failed(&e),
        }
    });

    log::debug!("vinyl player mounted");
    Ok(())
}

fn bind_host(player: &SharedPlayer, host: &TelegramHost) -> Result<(), VinylError> {
    let p = Rc::clone(player);
    let on_click = Closure::<dyn FnMut()>::new(move || {
        if let Err(e) = p.borrow_mut().toggle() {
            log::error!("toggle failed: {e}");
        }
    });
    host.on_main_button_click(&on_click)?;
    on_click.forget();

    let p = Rc::clone(player);
    let on_theme = Closure::<dyn FnMut()>::new(move || {
        if let Err(e) = p.borrow_mut().theme_changed() {
            log::error!("theme update failed: {e}");
        }
    });
    host.on_event(THEME_CHANGED, &on_theme)?;
    on_theme.forget();

    let p = Rc::clone(player);
    let on_viewport = Closure::<dyn FnMut()>::new(move || {
        p.borrow_mut().viewport_changed();
    });
    host.on_event(VIEWPORT_CHANGED, &on_viewport)?;
    on_viewport.forget();
    Ok(())
}

fn first_touch(event: &TouchEvent) -> Option<Point> {
    event
        .touches()
        .get(0)
        .map(|t| Point::new(t.client_x() as f64, t.client_y() as f64))
}

fn listen(
    target: &EventTarget,
    event_type: &str,
    passive: bool,
    handler: Closure<dyn FnMut(TouchEvent)>,
) -> Result<(), VinylError> {
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event_type,
            handler.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(js_error)?;
    handler.forget();
    Ok(())
}

fn bind_touch(player: &SharedPlayer, surface: &DomSurface) -> Result<(), VinylError> {
    // touchstart / touchmove are non-passive so the page doesn't scroll
    // while the record is being dragged.
    let p = Rc::clone(player);
    listen(
        surface.disk(),
        "touchstart",
        false,
        Closure::new(move |event: TouchEvent| {
            event.prevent_default();
            let Some(point) = first_touch(&event) else {
                return;
            };
            if let Err(e) = p.borrow_mut().touch_start(point) {
                log::error!("touchstart failed: {e}");
            }
        }),
    )?;

    let p = Rc::clone(player);
    listen(
        surface.document(),
        "touchmove",
        false,
        Closure::new(move |event: TouchEvent| {
            let mut player = p.borrow_mut();
            if !player.tracker().is_active() {
                return;
            }
            event.prevent_default();
            if let Some(point) = first_touch(&event) {
                if let Err(e) = player.touch_move(point) {
                    log::error!("touchmove failed: {e}");
                }
            }
        }),
    )?;

    let p = Rc::clone(player);
    listen(
        surface.document(),
        "touchend",
        true,
        Closure::new(move |_event: TouchEvent| {
            if let Err(e) = p.borrow_mut().touch_end() {
                log::error!("touchend failed: {e}");
            }
        }),
    )?;

    Ok(())
}
