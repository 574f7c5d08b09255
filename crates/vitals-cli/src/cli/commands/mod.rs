//! Command implementations.

pub mod config;
pub mod counters;
pub mod watch;

use anyhow::Result;
use std::sync::Arc;
use vitals::{Credentials, JolokiaClient, MetricsSource, DEFAULT_BASE_URL};

use crate::cli::args::SourceArgs;
use crate::config::{Config, SourceKind};
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration file
    pub config: Config,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,

    /// Disable colors
    pub no_color: bool,
}

impl Context {
    /// Build the metrics source selected by flags, environment and config.
    pub fn source(&self, args: &SourceArgs) -> Result<Arc<dyn MetricsSource>> {
        match args.source.unwrap_or(self.config.source) {
            SourceKind::Local => local_source(args.pid),
            SourceKind::Jolokia => Ok(Arc::new(self.jolokia(args)?)),
        }
    }

    fn jolokia(&self, args: &SourceArgs) -> Result<JolokiaClient> {
        let url = args
            .url
            .clone()
            .or_else(|| self.config.jolokia_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let username = args.username.clone().or_else(|| self.config.username.clone());
        let password = args.password.clone().or_else(|| self.config.password.clone());

        let mut builder = JolokiaClient::builder().base_url(url);
        match (username, password) {
            (Some(user), Some(pass)) => builder = builder.credentials(Credentials::new(user, pass)),
            (None, None) => {}
            _ => anyhow::bail!(
                "Jolokia credentials need both a username and a password.\n\n\
                 Set them with --username/--password, VITALS_USERNAME/VITALS_PASSWORD\n\
                 or `vitals config set username <USER>`"
            ),
        }

        Ok(builder.build()?)
    }
}

#[cfg(target_os = "linux")]
fn local_source(pid: Option<i32>) -> Result<Arc<dyn MetricsSource>> {
    let source = pid.map_or_else(vitals::ProcfsSource::current, vitals::ProcfsSource::for_pid);
    Ok(Arc::new(source))
}

#[cfg(not(target_os = "linux"))]
fn local_source(_pid: Option<i32>) -> Result<Arc<dyn MetricsSource>> {
    anyhow::bail!("The local source reads /proc and is only available on Linux; use --source jolokia")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(config: Config) -> Context {
        Context {
            config,
            output_format: OutputFormat::Pretty,
            verbose: false,
            no_color: true,
        }
    }

    #[test]
    fn test_flag_overrides_config_url() {
        let ctx = context(Config {
            jolokia_url: Some("http://from-config:8778/jolokia".into()),
            ..Config::default()
        });

        let from_config = ctx.jolokia(&SourceArgs::default()).unwrap();
        assert_eq!(from_config.base_url(), "http://from-config:8778/jolokia");

        let args = SourceArgs {
            url: Some("http://from-flag:8778/jolokia".into()),
            ..SourceArgs::default()
        };
        assert_eq!(ctx.jolokia(&args).unwrap().base_url(), "http://from-flag:8778/jolokia");
    }

    #[test]
    fn test_default_url() {
        let ctx = context(Config::default());
        let client = ctx.jolokia(&SourceArgs::default()).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_half_credentials_rejected() {
        let ctx = context(Config {
            username: Some("monitor".into()),
            ..Config::default()
        });
        assert!(ctx.jolokia(&SourceArgs::default()).is_err());

        let args = SourceArgs {
            password: Some("secret".into()),
            ..SourceArgs::default()
        };
        assert!(ctx.jolokia(&args).is_ok());
    }
}
