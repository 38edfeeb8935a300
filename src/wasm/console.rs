use log::Level;
use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Routes `log` records to the browser console, at the matching console level.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug => console::debug_1(&message),
            Level::Trace => console::trace_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Safe to call more than once; later calls only change the level.
pub fn init(level: LevelFilter) {
    // This only fails when a logger is already installed, which is either us or the embedder's.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
