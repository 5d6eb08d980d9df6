mod bootstrap;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use history_core::settings::Settings;
use history_core::time_utils::DateTimeNormalizer;
use history_data::sample::SAMPLE_DATA;
use history_runtime::store::HistoryStore;
use history_ui::app::App;
use history_ui::report;

/// Where the input text came from.
#[derive(Debug)]
enum InputSource {
    Sample,
    Stdin,
    File(PathBuf),
}

impl InputSource {
    fn from_settings(settings: &Settings) -> Result<Self> {
        if settings.sample {
            return Ok(InputSource::Sample);
        }
        match settings.input.as_deref() {
            Some(path) if path == Path::new("-") => Ok(InputSource::Stdin),
            Some(path) => Ok(InputSource::File(path.to_path_buf())),
            None => bail!("no input given: pass a watch-history text file, `-` for stdin, or --sample"),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            InputSource::Sample => Ok(SAMPLE_DATA.to_string()),
            InputSource::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("reading watch history from stdin")?;
                Ok(text)
            }
            InputSource::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading watch history from {}", path.display())),
        }
    }

    /// File the dashboard re-reads on `r`.
    fn reload_path(&self) -> Option<PathBuf> {
        match self {
            InputSource::File(path) => Some(path.clone()),
            _ => None,
        }
    }
}

fn run_exports(settings: &Settings, store: &HistoryStore) -> Result<()> {
    if settings.export_csv.is_none() && settings.export_json.is_none() {
        return Ok(());
    }
    if !store.is_processed() {
        tracing::warn!("nothing parsed; skipping export");
        return Ok(());
    }
    if let Some(path) = &settings.export_csv {
        store
            .export_csv(path)
            .with_context(|| format!("exporting CSV to {}", path.display()))?;
    }
    if let Some(path) = &settings.export_json {
        store
            .export_json(path)
            .with_context(|| format!("exporting JSON to {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    let log_file = settings.log_file.clone().or_else(|| {
        settings
            .is_interactive()
            .then(|| bootstrap::default_log_file(&app_dir))
    });
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("yt-history v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Timezone: {}, Theme: {}",
        settings.view,
        settings.timezone,
        settings.theme
    );

    let source = InputSource::from_settings(&settings)?;
    let text = source.read()?;

    let mut store = HistoryStore::new(DateTimeNormalizer::new(&settings.timezone));
    store.set_input(text);
    let outcome = store.analyze();

    run_exports(&settings, &store)?;

    if settings.is_interactive() {
        // A failed parse is shown in the dashboard's error banner.
        let app = App::new(
            &settings.theme,
            source.reload_path(),
            settings.history_limit as usize,
        );
        app.run_dashboard(&mut store)
            .context("running the dashboard")?;
    } else {
        outcome.map_err(|e| anyhow::anyhow!(e.user_message()))?;
        print!(
            "{}",
            report::render_report(&settings.view, &store, settings.history_limit as usize)
        );
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn settings(args: &[&str]) -> Settings {
        Settings::parse_from(std::iter::once("yt-history").chain(args.iter().copied()))
    }

    #[test]
    fn test_input_source_selection() {
        assert!(matches!(
            InputSource::from_settings(&settings(&["--sample"])).unwrap(),
            InputSource::Sample
        ));
        assert!(matches!(
            InputSource::from_settings(&settings(&["-"])).unwrap(),
            InputSource::Stdin
        ));
        assert!(matches!(
            InputSource::from_settings(&settings(&["history.txt"])).unwrap(),
            InputSource::File(_)
        ));
        assert!(InputSource::from_settings(&settings(&[])).is_err());
    }

    #[test]
    fn test_sample_wins_over_path() {
        let source = InputSource::from_settings(&settings(&["--sample", "history.txt"])).unwrap();
        assert!(matches!(source, InputSource::Sample));
        assert!(source.reload_path().is_none());
    }

    #[test]
    fn test_read_file_source() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history.txt");
        std::fs::write(&path, SAMPLE_DATA).unwrap();

        let source = InputSource::File(path.clone());
        assert_eq!(source.read().unwrap(), SAMPLE_DATA);
        assert_eq!(source.reload_path(), Some(path));

        let missing = InputSource::File(tmp.path().join("missing.txt"));
        let err = missing.read().unwrap_err();
        assert!(err.to_string().contains("reading watch history from"));
    }

    #[test]
    fn test_run_exports_writes_files() {
        let tmp = TempDir::new().unwrap();
        let csv_path = tmp.path().join("out.csv");
        let json_path = tmp.path().join("out.json");
        let settings = settings(&[
            "--sample",
            "--export-csv",
            csv_path.to_str().unwrap(),
            "--export-json",
            json_path.to_str().unwrap(),
        ]);

        let mut store = HistoryStore::new(DateTimeNormalizer::new("UTC"));
        store.parse(SAMPLE_DATA).unwrap();
        run_exports(&settings, &store).unwrap();

        assert!(csv_path.is_file());
        assert!(json_path.is_file());
    }

    #[test]
    fn test_run_exports_skips_unprocessed_store() {
        let tmp = TempDir::new().unwrap();
        let csv_path = tmp.path().join("out.csv");
        let settings = settings(&["--sample", "--export-csv", csv_path.to_str().unwrap()]);

        let store = HistoryStore::new(DateTimeNormalizer::new("UTC"));
        run_exports(&settings, &store).unwrap();
        assert!(!csv_path.exists());
    }
}
