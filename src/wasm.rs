use log::LevelFilter;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::content::Catalog;
use crate::content::Category;
use crate::error::Error;
use crate::error::Result;
use crate::settings::Settings;

mod aura;
mod console;
mod cursor;
mod modal;
mod track;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console::init(LevelFilter::Info);
}

#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| Error::invalid("log level", format!("unknown level `{}`", level)))?;
    console::init(level);
    Ok(())
}

/// The project list as plain JS objects, optionally only one category.
#[wasm_bindgen]
pub fn projects(category: Option<String>) -> Result<JsValue, JsValue> {
    let catalog = Catalog::embedded()?;
    let category = match category {
        Some(name) => Some(
            serde_json::from_value::<Category>(serde_json::Value::String(name))
                .map_err(Error::Content)?,
        ),
        None => None,
    };

    let projects: Vec<_> = catalog
        .projects()
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect();

    to_js(&projects)
}

#[wasm_bindgen]
pub fn resume() -> Result<JsValue, JsValue> {
    let catalog = Catalog::embedded()?;
    to_js(&serde_json::json!({
        "experience": catalog.experience(),
        "education": catalog.education(),
    }))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(Error::Content)?;
    js_sys::JSON::parse(&json)
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub(crate) fn js_error(value: JsValue) -> Error {
    Error::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

pub(crate) fn window() -> Result<Window> {
    web_sys::window().ok_or(Error::MissingElement("window"))
}

pub(crate) fn settings_from(json: Option<String>) -> Result<Settings> {
    match json {
        Some(json) => Settings::from_json(&json),
        None => Ok(Settings::default()),
    }
}

pub(crate) fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Milliseconds on the same clock as animation frame timestamps.
pub(crate) fn now(window: &Window) -> f64 {
    window.performance().map_or(0.0, |p| p.now())
}

pub(crate) fn viewport(window: &Window) -> (f64, f64) {
    let dimension = |value: std::result::Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    (
        dimension(window.inner_width()),
        dimension(window.inner_height()),
    )
}
