//! Sign in against the marketplace API and print the validated profile.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use client::config::ClientConfig;
use client::domain::LoginCredentials;
use client::domain::session::{
    AdminProfile, InstructorProfile, RoleProfile, SchoolProfile, SessionController,
};
use client::outbound::http::{HttpGateway, resolve_base_url};
use client::outbound::storage::FileIdentityStore;
use ortho_config::OrthoConfig;
use reqwest::Url;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `session-probe` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "session-probe",
    about = "Sign in against the marketplace API and print the validated profile",
    version
)]
struct CliArgs {
    /// Account role to sign in as.
    #[arg(long, value_enum)]
    role: ProbeRole,
    /// Account email.
    #[arg(long)]
    email: String,
    /// Account password.
    #[arg(long)]
    password: String,
    /// API base URL override. Falls back to the configured resolution.
    #[arg(long = "base-url", value_name = "url")]
    base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProbeRole {
    Ecole,
    Intervenant,
    Admin,
}

fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let config = ClientConfig::load_from_iter([OsString::from("session-probe")])
        .map_err(|error| io::Error::other(format!("load configuration: {error}")))?;

    let base_url = effective_base_url(&args, &config)?;
    info!(base_url = %base_url, "probing marketplace API");

    let gateway = Arc::new(
        HttpGateway::new(base_url, config.request_timeout())
            .map_err(|error| io::Error::other(format!("build HTTP client: {error}")))?,
    );
    let store = Arc::new(
        FileIdentityStore::open(&config.storage_dir())
            .map_err(|error| io::Error::other(format!("open identity store: {error}")))?,
    );
    let credentials = LoginCredentials::try_from_parts(&args.email, &args.password)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;

    match args.role {
        ProbeRole::Ecole => probe::<SchoolProfile>(gateway, store, &credentials).await,
        ProbeRole::Intervenant => probe::<InstructorProfile>(gateway, store, &credentials).await,
        ProbeRole::Admin => probe::<AdminProfile>(gateway, store, &credentials).await,
    }
}

async fn probe<R: RoleProfile>(
    gateway: Arc<HttpGateway>,
    store: Arc<FileIdentityStore>,
    credentials: &LoginCredentials,
) -> io::Result<()> {
    let controller = Arc::new(SessionController::<R>::new(gateway.clone(), store));
    gateway.register_auth_expiry_hook(controller.auth_expiry_hook());

    let identity = controller
        .login(credentials)
        .await
        .map_err(|error| io::Error::other(format!("sign-in failed: {error}")))?;
    if let Some(intent) = controller.routes().latest() {
        info!(route = %intent.target, "sign-in confirmed");
    }

    let rendered = serde_json::to_string_pretty(&identity)
        .map_err(|error| io::Error::other(format!("render profile: {error}")))?;
    println!("{rendered}");

    controller.logout().await;
    Ok(())
}

fn effective_base_url(args: &CliArgs, config: &ClientConfig) -> io::Result<Url> {
    let explicit = args.base_url.as_deref().or(config.api_base_url.as_deref());
    resolve_base_url(explicit, config.origin.as_deref())
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use clap::Parser;
    use rstest::rstest;

    use super::{CliArgs, ProbeRole};

    fn parse(extra: &[&str]) -> CliArgs {
        let mut argv = vec![
            "session-probe",
            "--role",
            "ecole",
            "--email",
            "direction@jaures.fr",
            "--password",
            "motdepasse",
        ];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).expect("arguments should parse")
    }

    #[rstest]
    #[case::school("ecole", ProbeRole::Ecole)]
    #[case::instructor("intervenant", ProbeRole::Intervenant)]
    #[case::admin("admin", ProbeRole::Admin)]
    fn roles_parse_from_their_wire_names(#[case] raw: &str, #[case] expected: ProbeRole) {
        let args = CliArgs::try_parse_from([
            "session-probe",
            "--role",
            raw,
            "--email",
            "a@b.fr",
            "--password",
            "pw",
        ])
        .expect("arguments should parse");
        assert_eq!(args.role, expected);
    }

    #[rstest]
    fn the_base_url_flag_is_optional() {
        assert_eq!(parse(&[]).base_url, None);
        assert_eq!(
            parse(&["--base-url", "http://localhost:8080"]).base_url,
            Some("http://localhost:8080".to_owned())
        );
    }

    #[rstest]
    fn unknown_roles_are_rejected() {
        let error = CliArgs::try_parse_from([
            "session-probe",
            "--role",
            "professeur",
            "--email",
            "a@b.fr",
            "--password",
            "pw",
        ])
        .expect_err("unknown role should fail");
        assert!(error.to_string().contains("professeur"));
    }
}
