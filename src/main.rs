use colored::*;
use log::info;
use slidekit::dom_renderer::markup::render_track_html;
use slidekit::sim::{SimScript, run_script};
use slidekit::{ConfigError, SiteConfig};

fn run(cli_args: &slidekit::CliArgs) -> Result<(), ConfigError> {
    let site = match &cli_args.config_path {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::default(),
    };
    let Some(script_path) = &cli_args.script_path else {
        return Err(ConfigError::invalid("missing --script=PATH (see --help)"));
    };
    let script = SimScript::load(script_path)?;
    let records = run_script(&site.carousel, &script)?;

    if cli_args.html {
        if let Some(last) = records.last() {
            println!("{}", render_track_html(&last.frame, script.card_count));
        }
    } else {
        for record in &records {
            println!("{}", serde_json::to_string(record)?);
        }
    }

    if let Some(last) = records.last() {
        info!(
            "{} {} frames, final card {}",
            "done:".green().bold(),
            records.len(),
            last.frame.active_card
        );
    }
    Ok(())
}

fn main() {
    let cli_args = slidekit::parse_args();
    slidekit::init_logger(&cli_args.log_level);

    if let Err(e) = run(&cli_args) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
