use anyhow::{bail, Context};
use slicemark::{init_logging, run_script, DrawConfig, Script, BUILD_DATE, VERSION};
use std::path::PathBuf;

const USAGE: &str = "Usage: slicemark replay <script.json> [--config <file>] [--json]";

struct ReplayArgs {
    script: PathBuf,
    config: Option<PathBuf>,
    json: bool,
}

fn parse_replay_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<ReplayArgs> {
    let mut script = None;
    let mut config = None;
    let mut json = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a file")?;
                config = Some(PathBuf::from(path));
            }
            "--json" => json = true,
            other if other.starts_with("--") => bail!("Unknown option '{}'\n{}", other, USAGE),
            other => {
                if script.replace(PathBuf::from(other)).is_some() {
                    bail!("Only one script can be replayed\n{}", USAGE);
                }
            }
        }
    }
    Ok(ReplayArgs {
        script: script.context(USAGE)?,
        config,
        json,
    })
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("replay") => {}
        Some("--version") => {
            println!("slicemark {} ({})", VERSION, BUILD_DATE);
            return Ok(());
        }
        _ => bail!(USAGE),
    }
    let args = parse_replay_args(args)?;

    let config = match &args.config {
        Some(path) => DrawConfig::load_from_file(path)
            .with_context(|| format!("Loading config {}", path.display()))?,
        None => DrawConfig::default(),
    };
    let script = Script::load(&args.script)
        .with_context(|| format!("Loading script {}", args.script.display()))?;
    tracing::info!("Replaying {} steps", script.steps.len());

    let report = run_script(&script, config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
