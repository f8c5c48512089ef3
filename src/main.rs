use anyhow::{Context, Result};
use clap::Parser;
use directadmin::{utils, Api, ConnectionConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "directadmin", version, about = "DirectAdmin Web API client")]
struct AppCli {
    /// Config file path (JSON with username, password, hostname, port, https)
    #[arg(short, long)]
    config: Option<String>,

    /// Panel host
    #[arg(long)]
    host: Option<String>,

    /// Panel port
    #[arg(long)]
    port: Option<u16>,

    /// Login name
    #[arg(short, long)]
    username: Option<String>,

    /// Password or login key
    #[arg(long, env = "DIRECTADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Use HTTPS
    #[arg(long)]
    https: bool,

    /// API command, e.g. CMD_API_SHOW_USERS
    command: String,

    /// Body parameter as key=value (repeatable). Any body makes the request a POST
    #[arg(short = 'p', long = "param", value_parser = parse_pair)]
    params: Vec<(String, String)>,

    /// Query parameter as key=value (repeatable)
    #[arg(short = 'g', long = "get", value_parser = parse_pair)]
    get: Vec<(String, String)>,

    /// Send a POST even when no --param is given
    #[arg(long)]
    post: bool,
}

fn parse_pair(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in `{}`", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Body parameters to send, if any. `force_post` sends an empty body.
fn body_for<'a>(
    force_post: bool,
    body: &'a [(&'a str, &'a str)],
) -> Option<&'a [(&'a str, &'a str)]> {
    (force_post || !body.is_empty()).then_some(body)
}

fn borrow_pairs(pairs: &[(String, String)]) -> Vec<(&str, &str)> {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Config file first, then command-line flags on top.
fn resolve_config(cli: &AppCli) -> Result<ConnectionConfig> {
    let mut config = match &cli.config {
        Some(path) => ConnectionConfig::from_file(path)?,
        None => {
            let username = cli
                .username
                .clone()
                .context("--username is required when no --config is given")?;
            let password = cli
                .password
                .clone()
                .context("--password (or DIRECTADMIN_PASSWORD) is required when no --config is given")?;
            ConnectionConfig::new(username, password)
        }
    };

    if let Some(username) = &cli.username {
        config.username = username.clone();
    }
    if let Some(password) = &cli.password {
        config.password = password.clone();
    }
    if let Some(host) = &cli.host {
        config.hostname = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.https {
        config.https = true;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::logging::init();

    let args = AppCli::parse();
    let config = resolve_config(&args)?;

    info!(
        hostname = %config.hostname,
        port = config.port,
        command = %args.command,
        "executing DirectAdmin command"
    );

    let api = Api::new(config)?;
    let body = borrow_pairs(&args.params);
    let query = borrow_pairs(&args.get);

    let parameters = body_for(args.post, &body);
    let get = (!query.is_empty()).then_some(query.as_slice());

    let result = api.execute(&args.command, parameters, get).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
