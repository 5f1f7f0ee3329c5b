use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use release_train::approval::ConsoleApproval;
use release_train::config;
use release_train::pipeline::ReleasePipeline;
use release_train::registry::ComponentRegistry;
use release_train::tools::{ExternalTools, SystemTools};
use release_train::ui;
use release_train::version::VersionSpec;

#[derive(clap::Parser)]
#[command(
    name = "release-train",
    about = "Release every platform component in dependency order"
)]
struct Args {
    #[arg(
        long,
        required_unless_present = "list",
        help = "Version to release, with or without a leading 'v'"
    )]
    version: Option<String>,

    #[arg(long, value_name = "COMPONENT", help = "Resume the release from this component")]
    from_step: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Show configured components in release order and exit")]
    list: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ui::init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;
    let tools: Arc<dyn ExternalTools> = Arc::new(SystemTools::new());
    let registry = ComponentRegistry::from_config(&config, Arc::clone(&tools))?;

    if args.list {
        ui::display_components(registry.components());
        return Ok(());
    }

    let Some(raw_version) = args.version.as_deref() else {
        anyhow::bail!("--version is required");
    };
    let version = VersionSpec::parse(raw_version)?;
    let components = registry.components_from(args.from_step.as_deref())?;

    ui::display_status(&format!(
        "Releasing {} from {}",
        version,
        config.settings.workspace.display()
    ));

    let pipeline = ReleasePipeline::new(config.settings, tools, ConsoleApproval::stdin());
    let report = pipeline.run(components, &version)?;

    ui::display_summary(&report);
    Ok(())
}
