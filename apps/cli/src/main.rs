//! Command-line front end for placing cells into a scene document

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use skycell::batch::DEFAULT_TICK_INTERVAL;
use skycell::manifest::{parse_line, read_manifest};
use skycell::{
    drive, AssetResolver, BatchDriver, ConsoleProgressReporter, ImportOptions,
    IntoProgressCallback, RunRequest, RunStatus, SceneDocument, normalize_object_name,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn, Level};

#[derive(Debug, Parser)]
#[command(
    name = "skycell",
    version,
    about = "Import whole cells at once from an exported manifest"
)]
struct Cli {
    /// Show per-record progress and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import every manifest object and write the placed scene as JSON
    Place(PlaceArgs),
    /// Parse a manifest and list malformed lines without importing anything
    Check {
        #[arg(long, env = "SKYCELL_MANIFEST")]
        manifest: PathBuf,
    },
    /// Show which mesh file an object name resolves to
    Resolve {
        name: String,
        #[arg(long, env = "SKYCELL_MESH_DIR")]
        meshes: PathBuf,
        #[arg(long, default_value = "nif")]
        extension: String,
    },
}

#[derive(Debug, Args)]
struct PlaceArgs {
    /// Cell manifest exported by the extraction tool
    #[arg(long, env = "SKYCELL_MANIFEST")]
    manifest: PathBuf,
    /// Directory searched recursively for mesh files
    #[arg(long, env = "SKYCELL_MESH_DIR")]
    meshes: PathBuf,
    /// Where to write the placed scene
    #[arg(long, default_value = "scene.json")]
    out: PathBuf,
    /// Where to write the end-of-run report (JSON)
    #[arg(long)]
    report: Option<PathBuf>,
    /// Options file (JSON); flags below override it
    #[arg(long)]
    options: Option<PathBuf>,
    #[arg(long)]
    ignore_position: bool,
    #[arg(long)]
    ignore_rotation: bool,
    #[arg(long)]
    ignore_scale: bool,
    /// Force this uniform scale on every object
    #[arg(long, value_name = "SCALE")]
    override_scale: Option<f64>,
    /// Manifest lines processed per tick
    #[arg(long)]
    batch_size: Option<usize>,
    /// Milliseconds between ticks
    #[arg(
        long,
        default_value_t = DEFAULT_TICK_INTERVAL.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    tick_ms: u64,
    #[arg(long, default_value = "nif")]
    extension: String,
}

impl PlaceArgs {
    /// Options file (or defaults) with command-line flags applied on top
    fn import_options(&self) -> Result<ImportOptions> {
        let mut options = match &self.options {
            Some(path) => ImportOptions::from_json_file(path)?,
            None => ImportOptions::default(),
        };

        options.ignore_position |= self.ignore_position;
        options.ignore_rotation |= self.ignore_rotation;
        options.ignore_scale |= self.ignore_scale;
        if let Some(scale) = self.override_scale {
            options.override_scale = true;
            options.scale_override_value = scale;
        }
        if let Some(batch_size) = self.batch_size {
            options.batch_size = batch_size;
        }

        options.validate()?;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match cli.command {
        Command::Place(args) => place(args, cli.verbose).await,
        Command::Check { manifest } => check(manifest),
        Command::Resolve { name, meshes, extension } => resolve(&name, meshes, &extension),
    }
}

async fn place(args: PlaceArgs, verbose: bool) -> Result<()> {
    let options = args.import_options()?;
    let request = RunRequest::new(args.manifest.clone(), args.meshes.clone())
        .with_mesh_extension(args.extension.as_str());

    let mut driver = BatchDriver::new()
        .with_progress_callback(ConsoleProgressReporter::new(verbose).into_callback());
    driver.start(request).context("Could not start placement")?;

    let token = driver.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let (_options_tx, options_rx) = watch::channel(options);
    let mut scene = SceneDocument::new();
    let tick_interval = Duration::from_millis(args.tick_ms);
    let status = drive(&mut driver, &mut scene, options_rx, tick_interval).await?;

    // Objects placed before a cancel are kept
    scene
        .write_json(&args.out)
        .with_context(|| format!("Failed to write scene to {}", args.out.display()))?;
    println!("💾 Wrote {} objects to {}", scene.len(), args.out.display());

    if let Some(report_path) = &args.report {
        if let Some(report) = driver.report() {
            let json = serde_json::to_string_pretty(report)?;
            std::fs::write(report_path, json)
                .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
            info!("Wrote run report to {}", report_path.display());
        }
    }

    if status == RunStatus::Cancelled {
        warn!("Placement was cancelled before the manifest was finished");
    }
    Ok(())
}

fn check(manifest: PathBuf) -> Result<()> {
    let lines = read_manifest(&manifest)?;

    let mut valid = 0;
    let mut malformed = 0;
    for line in lines.iter().filter(|l| !l.is_blank()) {
        match parse_line(&line.text, line.number) {
            Ok(_) => valid += 1,
            Err(e) => {
                malformed += 1;
                println!("⚠️ {}", e);
            }
        }
    }

    println!("📋 {}: {} valid, {} malformed", manifest.display(), valid, malformed);
    if malformed > 0 {
        bail!("{} malformed lines in {}", malformed, manifest.display());
    }
    Ok(())
}

fn resolve(name: &str, meshes: PathBuf, extension: &str) -> Result<()> {
    if !meshes.is_dir() {
        bail!("Mesh directory '{}' does not exist", meshes.display());
    }
    let resolver = AssetResolver::new(meshes, extension.trim_start_matches('.'));

    println!("🔍 {} -> {}", name, normalize_object_name(name));
    println!("   candidates: {}", resolver.candidate_file_names(name).join(", "));

    let resolved = resolver.resolve(name);
    match &resolved.file_path {
        Some(path) => println!("✅ {}", path.display()),
        None => bail!("Mesh file for {} not found", name),
    }
    for other in &resolved.collisions {
        println!("   also matches: {}", other.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn place_args(extra: &[&str]) -> PlaceArgs {
        let mut argv = vec!["skycell", "place", "--manifest", "cell.txt", "--meshes", "meshes"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Place(args) => args,
            other => panic!("expected place, got {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = place_args(&[
            "--ignore-position",
            "--override-scale",
            "2.5",
            "--batch-size",
            "3",
        ]);
        let options = args.import_options().unwrap();

        assert!(options.ignore_position);
        assert!(!options.ignore_rotation);
        assert!(options.override_scale);
        assert_eq!(options.scale_override_value, 2.5);
        assert_eq!(options.batch_size, 3);
    }

    #[test]
    fn test_zero_batch_size_flag_rejected() {
        let args = place_args(&["--batch-size", "0"]);
        assert!(args.import_options().is_err());
    }

    #[test]
    fn test_default_tick_interval() {
        let args = place_args(&[]);
        assert_eq!(args.tick_ms, 100);
        assert_eq!(args.out, PathBuf::from("scene.json"));
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let argv = [
            "skycell", "place", "--manifest", "cell.txt", "--meshes", "meshes", "--tick-ms", "0",
        ];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_check_accepts_manifest_with_blank_lines() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("cell.txt");
        fs::write(&manifest, "Name\tX\n\nTable01\t1\t2\t3\t0\t0\t90\t1.5\n  \t\n").unwrap();

        assert!(check(manifest).is_ok());
    }

    #[test]
    fn test_check_fails_on_malformed_line() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("cell.txt");
        fs::write(&manifest, "header\nRock 1 2 3 0 0 0 1\nChair 1 2 3\n").unwrap();

        let err = check(manifest).unwrap_err();
        assert!(err.to_string().contains("1 malformed lines"));
    }

    #[test]
    fn test_check_fails_on_missing_manifest() {
        let dir = tempdir().unwrap();
        assert!(check(dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_resolve_finds_numbered_instance_mesh() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("clutter");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("barrel.nif"), b"nif").unwrap();

        assert!(resolve("Barrel002", dir.path().to_path_buf(), ".nif").is_ok());
    }

    #[test]
    fn test_resolve_fails_on_missing_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("barrel.nif"), b"nif").unwrap();

        let err = resolve("Chair", dir.path().to_path_buf(), "nif").unwrap_err();
        assert!(err.to_string().contains("Chair"));
    }

    #[test]
    fn test_resolve_fails_on_missing_mesh_directory() {
        let dir = tempdir().unwrap();

        let err = resolve("Barrel", dir.path().join("meshes"), "nif").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
