use chrono::Local;
use log::{max_level, Level, Metadata, Record};

pub struct StdLogger;

impl log::Log for StdLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let time_str = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f");
            let line = format!(
                "{0} {1:<5} {2}: {3}",
                time_str,
                record.level(),
                record.target(),
                record.args()
            );

            if record.level() <= Level::Warn {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }

    fn flush(&self) {}
}
