mod form;

use std::time::Duration;

use clap::Parser;
use formcheck_engine::resolver::{DEFAULT_POLL_INTERVAL, Resolver};
use formcheck_engine::runner::ScenarioRunner;
use formcheck_engine::surface::Surface;
use formcheck_engine::Actions;
use formcheck_wd::{WebDriverSurface, chrome_capabilities};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "formcheck", version, about = "Automated practice-form functional check")]
struct Args {
    /// Page to check
    #[arg(long, default_value = form::DEFAULT_FORM_URL)]
    url: String,

    /// WebDriver endpoint (chromedriver)
    #[arg(long, default_value = "http://localhost:9515")]
    webdriver_url: String,

    /// Per-candidate wait timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Run the browser headless
    #[arg(long)]
    headless: bool,

    /// Where to save a screenshot if the run fails
    #[arg(long, default_value = "formcheck-failure.png")]
    screenshot: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr so stdout stays clean for scripting
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut surface =
        WebDriverSurface::with_capabilities(&args.webdriver_url, chrome_capabilities(args.headless));
    if let Err(e) = surface.launch().await {
        eprintln!("Failed to start browser session: {e}");
        return Err(e.into());
    }

    let resolver = Resolver::new(Duration::from_secs(args.timeout), DEFAULT_POLL_INTERVAL);
    let mut runner = ScenarioRunner::new(Actions::new(resolver));
    let scenario = form::practice_form_scenario(&args.url);

    let report = runner.run(&mut surface, &scenario).await;

    if report.succeeded() {
        info!(fields = report.fields_applied, "form check passed");
    } else if let Some(failure) = &report.failure {
        error!(%failure, "form check failed");
        match surface.screenshot().await {
            Ok(png) => {
                if let Err(e) = std::fs::write(&args.screenshot, png) {
                    warn!(path = %args.screenshot, error = %e, "could not save screenshot");
                } else {
                    info!(path = %args.screenshot, "saved failure screenshot");
                }
            }
            Err(e) => warn!(error = %e, "could not capture screenshot"),
        }
    }

    // Session always comes down, pass or fail
    if let Err(e) = surface.close().await {
        warn!(error = %e, "session close failed");
    }

    if report.succeeded() {
        println!("PASS: {} fields verified", report.fields_applied);
        Ok(())
    } else {
        println!("FAIL: stopped in state {}", report.state);
        std::process::exit(1);
    }
}
