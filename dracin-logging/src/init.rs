use anyhow::{Context, Result};
use dracin_config::{LogFormat, LoggingConfig};
use std::path::Path;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Build the filter for a level, letting `RUST_LOG` win when the level is
/// not a valid directive.
pub fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging from configuration
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config.level.as_str());

    let (writer, ansi) = match config.file {
        Some(ref file) => (file_writer(Path::new(file))?, false),
        None => (BoxMakeWriter::new(std::io::stderr), config.ansi),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    // Use try_init to avoid panic if global subscriber already set
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    let env_filter = build_env_filter(log_level);

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

fn file_writer(path: &Path) -> Result<BoxMakeWriter> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {:?}", path))?;

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {:?}", directory))?;

    Ok(BoxMakeWriter::new(tracing_appender::rolling::never(
        directory, file_name,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_build_env_filter_accepts_directives() {
        let filter = build_env_filter("dracin_runner=debug,info");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = build_env_filter("warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dracin-load.log");

        file_writer(&path).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_file_writer_rejects_missing_file_name() {
        assert!(file_writer(Path::new("/")).is_err());
    }
}
