use clap::Parser;

use bookinfo::ci::{BuildTrigger, DEFAULT_BRANCH, DEFAULT_REPO, TOKEN_ENV, TRAVIS_API};

#[derive(Parser)]
#[command(name = "ci-trigger")]
#[command(about = "Trigger a Travis CI build for a branch", long_about = None)]
struct Cli {
    #[arg(long, default_value = DEFAULT_REPO)]
    repo: String,

    #[arg(long, default_value = DEFAULT_BRANCH)]
    branch: String,

    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    token: String,

    #[arg(long, default_value = TRAVIS_API, hide = true)]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let trigger = BuildTrigger {
        api_base: cli.api_url,
        repo: cli.repo,
        branch: cli.branch,
        token: cli.token,
    };

    let reply = trigger.send(&client).await?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
