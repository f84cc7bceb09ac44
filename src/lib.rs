pub mod audio;
pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod tts;

use anyhow::Context;
use batch::{BatchReport, BatchRunner, ConsoleProgress, NoProgress, Progress};
use catalog::Catalog;
use cli::{Cli, Commands};
use config::Config;
use std::path::PathBuf;
use tts::SpeechSynthesizer;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Lessons(args) => lessons(args),
        Commands::Synthesize(args) => synthesize(args),
        Commands::Config(args) => config_cmd(args),
    }
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(config: &Config, override_path: Option<PathBuf>) -> anyhow::Result<Catalog> {
    match override_path.or_else(|| config.lessons_path.clone()) {
        Some(path) => Catalog::load_from_path(&path),
        None => Ok(Catalog::builtin()),
    }
}

fn generate(args: cli::GenerateArgs) -> anyhow::Result<()> {
    let mut config = Config::load().context("load config")?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    config.validate().context("invalid config")?;
    let backend = args.backend.unwrap_or(config.backend);

    let mut catalog = load_catalog(&config, args.lessons)?;
    if !args.only.is_empty() {
        catalog = catalog.select(&args.only).context("select lessons")?;
    }

    let synth = tts::select_backend(&config, backend).context("initialize tts backend")?;
    let runner = BatchRunner::new(synth, config.voice(), &config.output_dir);

    let mut console = ConsoleProgress;
    let mut quiet = NoProgress;
    let progress: &mut dyn Progress = if args.json { &mut quiet } else { &mut console };

    let report = runner.run(&catalog, progress).context("run batch")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if args.fail_on_error && report.failures() > 0 {
        anyhow::bail!(
            "{} of {} lessons failed: {}",
            report.failures(),
            report.total,
            report.failed_ids().join(", ")
        );
    }

    Ok(())
}

fn print_summary(report: &BatchReport) {
    let rule = "=".repeat(50);
    println!("{rule}");
    println!("Generated: {}/{} files", report.successes, report.total);
    println!("Output: {}", report.output_dir.display());
    println!("{rule}");
}

fn lessons(args: cli::LessonsArgs) -> anyhow::Result<()> {
    let config = Config::load().context("load config")?;
    let catalog = load_catalog(&config, args.lessons)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(catalog.items())?);
        return Ok(());
    }

    for item in catalog.iter() {
        println!("{}\t{}", item.id, item.text);
    }
    println!("{} lessons", catalog.len());

    Ok(())
}

fn synthesize(args: cli::SynthesizeArgs) -> anyhow::Result<()> {
    let config = Config::load().context("load config")?;
    config.validate().context("invalid config")?;
    let backend = args.backend.unwrap_or(config.backend);

    let synth = tts::select_backend(&config, backend).context("initialize tts backend")?;
    let request = tts::SynthesisRequest::new(&args.text, &config.voice())?;
    let audio = synth.synthesize(&request).context("tts synthesis")?;

    std::fs::write(&args.output, &audio)
        .with_context(|| format!("write {}", args.output.display()))?;
    println!("Wrote {} ({} bytes)", args.output.display(), audio.len());

    Ok(())
}

fn config_cmd(args: cli::ConfigArgs) -> anyhow::Result<()> {
    if args.init {
        let path = Config::init_default()?;
        println!("Initialized config at {}", path.display());
        return Ok(());
    }

    if args.show {
        let config = Config::load()?;
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if args.validate {
        let config = Config::load()?;
        config.validate()?;
        println!("Config OK");
        return Ok(());
    }

    let path = Config::default_path()?;
    println!("{}", path.display());
    Ok(())
}
