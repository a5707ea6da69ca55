//! The disk element and the page body.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::chrome::{Surface, Theme};
use crate::error::VinylError;
use crate::gesture::Point;

#[derive(Debug, Clone)]
pub struct DomSurface {
    window: Window,
    document: Document,
    disk: HtmlElement,
    paused_class: String,
}

impl DomSurface {
    /// Find the disk element. Its absence is a page setup error.
    pub fn new(disk_id: &str, paused_class: &str) -> Result<Self, VinylError> {
        let window =
            web_sys::window().ok_or_else(|| VinylError::Host("no global window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| VinylError::Host("window has no document".to_string()))?;
        let disk = document
            .get_element_by_id(disk_id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| VinylError::MissingElement(disk_id.to_string()))?;

        Ok(DomSurface {
            window,
            document,
            disk,
            paused_class: paused_class.to_string(),
        })
    }

    pub fn disk(&self) -> &HtmlElement {
        &self.disk
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("could not set {property}: {e:?}");
    }
}

impl Surface for DomSurface {
    fn disk_center(&self) -> Point {
        let rect = self.disk.get_bounding_client_rect();
        Point::new(
            rect.left() + rect.width() / 2.0,
            rect.top() + rect.height() / 2.0,
        )
    }

    fn rotate_disk(&mut self, degrees: Option<f64>) {
        match degrees {
            Some(deg) => set_style(&self.disk, "transform", &format!("rotate({deg}deg)")),
            None => set_style(&self.disk, "transform", ""),
        }
    }

    fn set_disk_paused(&mut self, paused: bool) {
        if let Err(e) = self
            .disk
            .class_list()
            .toggle_with_force(&self.paused_class, paused)
        {
            log::warn!("could not toggle .{}: {e:?}", self.paused_class);
        }
    }

    fn set_disk_size(&mut self, px: f64) {
        let value = format!("{px}px");
        set_style(&self.disk, "width", &value);
        set_style(&self.disk, "height", &value);
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    fn apply_theme(&mut self, theme: &Theme) {
        let Some(body) = self.document.body() else {
            return;
        };
        if let Some(background) = &theme.background {
            set_style(&body, "background-color", background);
        }
        if let Some(foreground) = &theme.foreground {
            set_style(&body, "color", foreground);
        }
    }
}
