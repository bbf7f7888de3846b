use core::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;
use web_sys::console;

/// Forwards tracing events to the browser console, colored by level.
pub struct ConsoleLayer {
    max_level: tracing::Level,
}

impl ConsoleLayer {
    pub fn new(max_level: tracing::Level) -> Self {
        Self { max_level }
    }
}

impl Default for ConsoleLayer {
    fn default() -> Self {
        Self::new(tracing::Level::INFO)
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn enabled(&self, metadata: &tracing::Metadata<'_>, _: Context<'_, S>) -> bool {
        metadata.level() <= &self.max_level
    }

    fn on_event(&self, event: &tracing::Event<'_>, _: Context<'_, S>) {
        let mut recorder = StringRecorder::default();
        event.record(&mut recorder);

        let meta = event.metadata();
        let level = meta.level();
        let origin = meta
            .file()
            .and_then(|file| meta.line().map(|ln| format!("{}:{}", file, ln)))
            .unwrap_or_default();

        let console_fn = match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => console::debug_4,
            tracing::Level::INFO => console::info_4,
            tracing::Level::WARN => console::warn_4,
            tracing::Level::ERROR => console::error_4,
        };

        console_fn(
            &format!("%c{}%c {}%c{}", level, origin, recorder).into(),
            &match *level {
                tracing::Level::TRACE => "color: dodgerblue; background: #444",
                tracing::Level::DEBUG => "color: lawngreen; background: #444",
                tracing::Level::INFO => "color: whitesmoke; background: #444",
                tracing::Level::WARN => "color: orange; background: #444",
                tracing::Level::ERROR => "color: red; background: #444",
            }
            .into(),
            &"color: gray; font-style: italic".into(),
            &"color: inherit".into(),
        );
    }
}

pub fn set_as_global_default() {
    tracing::subscriber::set_global_default(Registry::default().with(ConsoleLayer::default()))
        .expect("default global");
}

#[derive(Default)]
struct StringRecorder {
    display: String,
    is_following_args: bool,
}

impl Visit for StringRecorder {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            if !self.display.is_empty() {
                self.display = format!("{:?}\n{}", value, self.display)
            } else {
                self.display = format!("{:?}", value)
            }
        } else {
            if self.is_following_args {
                writeln!(self.display).unwrap();
            } else {
                write!(self.display, " ").unwrap();
                self.is_following_args = true;
            }
            write!(self.display, "{} = {:?};", field.name(), value).unwrap();
        }
    }
}

impl fmt::Display for StringRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.display.is_empty() {
            write!(f, " {}", self.display)
        } else {
            Ok(())
        }
    }
}
