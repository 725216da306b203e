use chrono::Utc;
use deploy_notify::context::RevisionContext;
use deploy_notify::delivery::HttpTransport;
use deploy_notify::git::GitCli;
use deploy_notify::{NotifyConfig, logging, notify};
use tracing::{error, info};

const DEFAULT_REPO_DIR: &str = ".";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let _guard = logging::init();
    let started_at = Utc::now();

    let config = match NotifyConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let context = match RevisionContext::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let repo_dir =
        std::env::var("GITHUB_WORKSPACE").unwrap_or_else(|_| DEFAULT_REPO_DIR.to_string());
    let inspector = GitCli::new(repo_dir);
    let transport = HttpTransport::new();

    match notify::run(&config, &context, &inspector, &transport).await {
        Ok(()) => info!(
            "Deployment notification sent in {} ms",
            (Utc::now() - started_at).num_milliseconds()
        ),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
