use super::ui;
use crate::core::config::AppConfig;
use crate::core::rate::ObservationProvider;
use crate::core::snapshot::{DashboardSnapshot, build_snapshot};
use crate::page;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "fx-dashboard.html";

/// Loads every configured currency behind a progress bar.
pub fn load_snapshot(
    config: &AppConfig,
    provider: &dyn ObservationProvider,
    strict: bool,
) -> Result<DashboardSnapshot> {
    let pb = ui::new_progress_bar(config.currencies.len() as u64, "Reading price files...");
    let snapshot = build_snapshot(config, provider, strict, &|| pb.inc(1));
    pb.finish_and_clear();
    snapshot
}

pub fn output_path(config: &AppConfig, output: Option<&Path>) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

pub fn run(snapshot: &DashboardSnapshot, config: &AppConfig, output: &Path) -> Result<()> {
    let html = page::render_page(snapshot, &config.map)?;
    page::write_page(output, &html)?;

    let failed = snapshot.failures().count();
    let message = format!("Dashboard written to {}", output.display());
    if failed == 0 {
        println!("{}", ui::style_text(&message, ui::StyleType::Title));
    } else {
        println!(
            "{} ({})",
            ui::style_text(&message, ui::StyleType::Title),
            ui::style_text(
                &format!("{failed} currency panel(s) show errors"),
                ui::StyleType::Error
            )
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_precedence() {
        let mut config: AppConfig =
            serde_yaml::from_str(include_str!("../../docs/example_config.yaml")).unwrap();

        assert_eq!(
            output_path(&config, Some(Path::new("cli.html"))),
            PathBuf::from("cli.html")
        );
        assert_eq!(output_path(&config, None), PathBuf::from("fx-dashboard.html"));

        config.output = Some(PathBuf::from("configured.html"));
        assert_eq!(output_path(&config, None), PathBuf::from("configured.html"));

        config.output = None;
        assert_eq!(output_path(&config, None), PathBuf::from(DEFAULT_OUTPUT));
    }
}
