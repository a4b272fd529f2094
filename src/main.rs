//!
//! librarium server binary
//! -----------------------
//! Command-line entry point for starting the librarium HTTP server. Supports
//! configuration via CLI flags and environment variables.

use anyhow::Result;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

fn parse_port_env(name: &str) -> Option<u16> {
    match env::var(name) {
        Ok(val) => val.parse::<u16>().ok(),
        Err(_) => None,
    }
}

fn parse_port_arg(args: &[String], flag: &str) -> Option<u16> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag
            && i + 1 < args.len() {
                return args[i + 1].parse::<u16>().ok();
            }
        i += 1;
    }
    None
}

fn parse_string_arg(args: &[String], flag: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag {
            if i + 1 < args.len() { return Some(args[i + 1].clone()); }
            break;
        }
        i += 1;
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[tokio::main]
async fn main() -> Result<()> {
    println!(r"    ___ __                          _
   / (_) /_  _________ ______ _____(_)_  ______ ___
  / / / __ \/ ___/ __ `/ ___// ___/ / / / / __ `__ \
 / / / /_/ / /  / /_/ / /   / /  / / /_/ / / / / / /
/_/_/_.___/_/   \__,_/_/   /_/  /_/\__,_/_/ /_/ /_/  ");

    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("librarium Server\n\nUSAGE:\n  librarium [--http-port N] [--token-secret SECRET]\n\nOPTIONS:\n  --http-port N          HTTP API port (env: LIBRARIUM_HTTP_PORT, default 7878)\n  --token-secret SECRET  Signing secret for bearer tokens (env: LIBRARIUM_TOKEN_SECRET)\n");
        return Ok(());
    }

    // Defaults
    let default_http: u16 = 7878;

    // Environment variables
    let env_http = parse_port_env("LIBRARIUM_HTTP_PORT");
    let env_secret = env::var("LIBRARIUM_TOKEN_SECRET").ok();

    // CLI arguments override environment
    let arg_http = parse_port_arg(&args, "--http-port");
    let arg_secret = parse_string_arg(&args, "--token-secret");

    let http_port = arg_http.or(env_http).unwrap_or(default_http);
    let token_secret = arg_secret
        .or(env_secret)
        .unwrap_or_else(|| librarium::server::DEFAULT_TOKEN_SECRET.to_string());

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    println!("librarium starting using port: http={}", http_port);
    info!(
        target: "librarium",
        "librarium starting: RUST_LOG='{}', http_port={}",
        rust_log, http_port
    );

    librarium::server::run_with_config(http_port, &token_secret).await
}
