use std::path::PathBuf;

use anyhow::{bail, Context};
use slidemark::session::{replay, Session};
use slidemark::{init_logging, AnnotationSettings, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let Some(session_path) = args.next().map(PathBuf::from) else {
        bail!("usage: slidemark <session.json> [settings.(json|toml)]");
    };
    tracing::info!("slidemark {} ({})", VERSION, BUILD_DATE);

    let settings = match args.next().map(PathBuf::from) {
        Some(path) => AnnotationSettings::load_from_file(&path)
            .with_context(|| format!("Failed to load settings {}", path.display()))?,
        None => match AnnotationSettings::default_path() {
            Ok(path) => AnnotationSettings::load_or_default(&path)?,
            Err(e) => {
                tracing::warn!("{}, using default settings", e);
                AnnotationSettings::default()
            }
        },
    };

    let session = Session::from_file(&session_path)?;
    let report = replay(&session, &settings)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
