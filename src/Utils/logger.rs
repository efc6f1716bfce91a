use chrono::Local;
use log::info;
use simplelog::*;
use std::fs::File;
use std::io::{self, Write};

/// map the string levels used across the crate to a filter
pub fn level_filter(loglevel: Option<&str>) -> Result<LevelFilter, String> {
    match loglevel {
        None => Ok(LevelFilter::Info),
        Some("debug") => Ok(LevelFilter::Debug),
        Some("trace") => Ok(LevelFilter::Trace),
        Some("info") => Ok(LevelFilter::Info),
        Some("warn") => Ok(LevelFilter::Warn),
        Some("error") => Ok(LevelFilter::Error),
        Some("off") | Some("none") => Ok(LevelFilter::Off),
        Some(other) => Err(format!(
            "loglevel must be debug, trace, info, warn, error, off or none, got {}",
            other
        )),
    }
}

/// Initialise terminal logging and, if `to_file`, a copy into
/// `log_<date>_<time>.txt`. A second call keeps the first logger.
pub fn init_logger(loglevel: Option<&str>, to_file: bool) -> Result<(), String> {
    let level = level_filter(loglevel)?;
    if level == LevelFilter::Off {
        return Ok(());
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        let file = File::create(&name).map_err(|e| format!("cannot create {}: {}", name, e))?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    // fails only if a logger is already set
    if CombinedLogger::init(loggers).is_ok() {
        info!("logger initialised at level {}", level);
    }
    Ok(())
}

/// Save labelled renderings as a tab-separated file, one `label\trendering`
/// line per entry, under a header line.
pub fn save_rendered_to_file<L, R>(rows: &[(L, R)], filename: &str) -> io::Result<()>
where
    L: AsRef<str>,
    R: ToString,
{
    let mut file = File::create(filename)?;
    writeln!(file, "label\trendering")?;
    for (label, rendered) in rows {
        writeln!(file, "{}\t{}", label.as_ref(), rendered.to_string())?;
    }
    info!("{} renderings saved to {}", rows.len(), filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formal::node::Formal;
    use crate::formal::render::render;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_level_names() {
        assert_eq!(level_filter(Some("warn")).unwrap(), LevelFilter::Warn);
        assert_eq!(level_filter(Some("none")).unwrap(), LevelFilter::Off);
        assert_eq!(level_filter(None).unwrap(), LevelFilter::Info);
        assert!(level_filter(Some("loud")).is_err());
    }

    #[test]
    fn test_logger_off_is_noop() {
        assert!(init_logger(Some("off"), false).is_ok());
        assert!(init_logger(Some("verbose"), false).is_err());
    }

    #[test]
    fn test_save_rendered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("renderings.tsv");
        let a = Formal::integer(2).named("a");
        let b = Formal::variable("b");
        let rows = vec![
            ("sum", render(&(a.clone() + b.clone()), None, None).unwrap()),
            ("power", render(&a.pow(b), None, None).unwrap()),
        ];
        save_rendered_to_file(&rows, path.to_str().unwrap()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["label\trendering", "sum\ta + b", "power\ta^{b}"]);
    }
}
