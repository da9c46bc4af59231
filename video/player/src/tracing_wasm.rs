// Console output for `tracing`, with a per-player maximum level.

use std::cell::Cell;
use std::fmt::{self, Write};
use std::rc::Rc;

use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, Layered, SubscriberExt};
use tracing_subscriber::registry::{LookupSpan, Registry};
use web_sys::console;

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleLayerConfig {
	use_console_color: bool,
	max_level: tracing::Level,
}

impl ConsoleLayerConfig {
	pub fn new(max_level: tracing::Level) -> Self {
		Self {
			max_level,
			..Default::default()
		}
	}
}

impl Default for ConsoleLayerConfig {
	fn default() -> Self {
		Self {
			use_console_color: true,
			max_level: tracing::Level::TRACE,
		}
	}
}

/// Writes every event to the browser console.
pub struct ConsoleLayer {
	config: ConsoleLayerConfig,
}

impl ConsoleLayer {
	pub fn new(config: ConsoleLayerConfig) -> Self {
		Self { config }
	}
}

fn level_style(level: &tracing::Level) -> &'static str {
	match *level {
		tracing::Level::TRACE => "color: dodgerblue; background: #444",
		tracing::Level::DEBUG => "color: lawngreen; background: #444",
		tracing::Level::INFO => "color: whitesmoke; background: #444",
		tracing::Level::WARN => "color: orange; background: #444",
		tracing::Level::ERROR => "color: red; background: #444",
	}
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for ConsoleLayer {
	fn enabled(&self, metadata: &tracing::Metadata<'_>, _: Context<'_, S>) -> bool {
		metadata.level() <= &self.config.max_level
	}

	fn on_event(&self, event: &tracing::Event<'_>, _: Context<'_, S>) {
		let mut recorder = FieldRecorder::default();
		event.record(&mut recorder);

		let meta = event.metadata();
		let level = meta.level();
		let origin = meta
			.file()
			.and_then(|file| meta.line().map(|line| format!("{file}:{line}")))
			.unwrap_or_default();

		if self.config.use_console_color {
			let log = match *level {
				tracing::Level::TRACE | tracing::Level::DEBUG => console::debug_4,
				tracing::Level::INFO => console::info_4,
				tracing::Level::WARN => console::warn_4,
				tracing::Level::ERROR => console::error_4,
			};

			log(
				&format!("%c{level}%c {origin}%c{recorder}").into(),
				&level_style(level).into(),
				&"color: gray; font-style: italic".into(),
				&"color: inherit".into(),
			);
		} else {
			let log = match *level {
				tracing::Level::TRACE | tracing::Level::DEBUG => console::debug_1,
				tracing::Level::INFO => console::info_1,
				tracing::Level::WARN => console::warn_1,
				tracing::Level::ERROR => console::error_1,
			};

			log(&format!("{level} {origin}{recorder}").into());
		}
	}
}

pub type LoggingInstance = Layered<ConsoleLayer, Registry>;

pub fn registry(config: ConsoleLayerConfig) -> LoggingInstance {
	Registry::default().with(ConsoleLayer::new(config))
}

/// Installs the console layer for the whole module. Called once at start.
pub fn set_as_global_default() {
	if tracing::subscriber::set_global_default(registry(ConsoleLayerConfig::default())).is_err() {
		console::warn_1(&"a global tracing subscriber was already installed".into());
	}
}

pub fn set_default(config: ConsoleLayerConfig) -> tracing_core::dispatcher::DefaultGuard {
	tracing::subscriber::set_default(registry(config))
}

/// The maximum level of one player. Shared with the element listeners and the
/// scheduler, which log on the player's behalf outside of a command call.
#[derive(Debug, Clone)]
pub struct PlayerLogLevel(Rc<Cell<tracing::Level>>);

impl Default for PlayerLogLevel {
	fn default() -> Self {
		Self(Rc::new(Cell::new(tracing::Level::INFO)))
	}
}

impl PlayerLogLevel {
	pub fn get(&self) -> tracing::Level {
		self.0.get()
	}

	pub fn set(&self, level: tracing::Level) {
		self.0.set(level);
	}

	/// A console subscriber limited to the current level.
	pub fn dispatch(&self) -> tracing::Dispatch {
		tracing::Dispatch::new(registry(ConsoleLayerConfig::new(self.get())))
	}
}

/// Collects the message first, followed by `key = value` pairs.
#[derive(Default)]
struct FieldRecorder {
	message: String,
	fields: String,
}

impl Visit for FieldRecorder {
	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.message.push_str(value);
		} else {
			self.record_debug(field, &value);
		}
	}

	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			let _ = write!(self.message, "{value:?}");
		} else {
			let _ = write!(self.fields, " {} = {:?};", field.name(), value);
		}
	}
}

impl fmt::Display for FieldRecorder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if !self.message.is_empty() {
			write!(f, " {}", self.message)?;
		}

		f.write_str(&self.fields)
	}
}

/// Routes the events of the current call through a console layer limited to
/// the player's configured level.
macro_rules! scope {
	($level:expr) => {
		let __guard = crate::tracing_wasm::set_default(crate::tracing_wasm::ConsoleLayerConfig::new($level));
	};
}

pub(crate) use scope;
