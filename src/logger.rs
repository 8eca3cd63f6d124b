use log::{Level, Metadata, Record};

/// Logs to stderr.
///
/// Informational messages are shown as they are. Everything else is
/// prefixed with its level and origin.
pub struct Logger;

impl log::Log for Logger {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &Record) {
		if !self.enabled(record.metadata()) {
			return;
		}
		if record.level() == Level::Info {
			eprintln!("{}", record.args());
		} else {
			eprintln!(
				"[{}] {}: {}",
				record.level(),
				record.target(),
				record.args()
			);
		}
	}

	fn flush(&self) {}
}
