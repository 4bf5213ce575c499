use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use coursebow::config::Overrides;
use coursebow::{logging, App, Config, CourseSource, HttpCourseSource, StaticCourseSource};

#[derive(Parser)]
#[command(name = "coursebow")]
#[command(about = "Browse and enroll in courses from the terminal")]
struct Args {
    #[arg(help = "Initial path to open, e.g. /search?id=<courseId>", default_value = "/")]
    path: String,

    #[arg(long, env = "COURSEBOW_API_URL", help = "Base URL of the courses API")]
    api_url: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Directory for log files")]
    log_dir: Option<PathBuf>,

    #[arg(long, help = "Use built-in sample courses instead of the API")]
    demo: bool,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(
        args.config.as_deref(),
        Overrides {
            api_url: args.api_url,
            log_dir: args.log_dir,
        },
    )?;
    let _log_guard = logging::init_file_logger(&config.log_dir, args.verbose)?;
    info!(api_url = %config.api_url, demo = args.demo, "starting coursebow");

    let source: Arc<dyn CourseSource> = if args.demo {
        Arc::new(StaticCourseSource::demo())
    } else {
        Arc::new(HttpCourseSource::new(&config.api_url, config.request_timeout())?)
    };

    let mut app = App::new(source, &args.path, config.carousel_interval())?;
    app.run().await?;

    Ok(())
}
