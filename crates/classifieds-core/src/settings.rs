//! Project settings.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional TOML file, and `CLASSIFIEDS_*` environment variables.
//!
//! ```toml
//! debug = true
//! fixtures = ["fixtures/school.json"]
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [logging]
//! level = "debug"
//!
//! [[users]]
//! username = "alice"
//! token = "9944b09199c62bcf9418ad846dd0e4bb"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CLASSIFIEDS_";

/// Main settings structure
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
	/// Debug mode (don't run with debug=true in production)
	pub debug: bool,
	pub server: ServerSettings,
	pub logging: LoggingSettings,
	pub api: ApiSettings,
	pub courses: CourseSettings,
	/// Users known at startup, each with an API token.
	pub users: Vec<SeedUser>,
	/// JSON fixture files loaded into the tables at startup, in order.
	pub fixtures: Vec<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
	/// Seconds to wait for open connections after a shutdown signal.
	pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 8000,
			shutdown_timeout_secs: 30,
		}
	}
}

impl ServerSettings {
	/// Address to listen on. `host` is an IPv4 or IPv6 literal; IPv6 may be
	/// written with or without brackets.
	pub fn bind_address(&self) -> Result<SocketAddr> {
		let host = self
			.host
			.strip_prefix('[')
			.and_then(|h| h.strip_suffix(']'))
			.unwrap_or(&self.host);
		let ip: IpAddr = host.parse().map_err(|_| {
			Error::Config(format!("server.host must be an IP address, got '{}'", self.host))
		})?;
		Ok(SocketAddr::new(ip, self.port))
	}
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
	/// Default filter directive, e.g. `info` or `classifieds=debug,info`.
	pub level: String,
	pub ansi: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			ansi: true,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
	/// URL prefix every viewset is mounted under, without slashes.
	pub prefix: String,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			prefix: "api/v1".to_string(),
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CourseSettings {
	pub max_students_per_course: usize,
}

impl Default for CourseSettings {
	fn default() -> Self {
		Self {
			max_students_per_course: 20,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedUser {
	pub username: String,
	pub token: String,
	#[serde(default)]
	pub is_staff: bool,
}

impl Settings {
	/// Parse settings from TOML text. Missing sections keep their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use classifieds_core::settings::Settings;
	///
	/// let settings = Settings::from_toml_str("[server]\nport = 9000\n").unwrap();
	/// assert_eq!(settings.server.port, 9000);
	/// assert_eq!(settings.server.host, "127.0.0.1");
	/// assert_eq!(settings.api.prefix, "api/v1");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self> {
		toml::from_str(source).map_err(|e| Error::Config(format!("Invalid settings: {}", e)))
	}

	/// Read and parse a TOML settings file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|e| {
			Error::Config(format!("Cannot read settings file {}: {}", path.display(), e))
		})?;
		Self::from_toml_str(&source)
	}

	/// Load settings the way the binaries do: file (if any), then
	/// environment overrides, then validation.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let mut settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.apply_env_overrides(|key| std::env::var(key).ok())?;
		settings.validate()?;
		Ok(settings)
	}

	/// Apply `CLASSIFIEDS_HOST`, `CLASSIFIEDS_PORT`, `CLASSIFIEDS_LOG_LEVEL`
	/// and `CLASSIFIEDS_DEBUG`.
	///
	/// The lookup is injected so tests don't have to touch the process
	/// environment.
	pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

		if let Some(host) = var("HOST") {
			self.server.host = host;
		}
		if let Some(port) = var("PORT") {
			self.server.port = port
				.parse()
				.map_err(|_| Error::Config(format!("{}PORT must be a port number, got '{}'", ENV_PREFIX, port)))?;
		}
		if let Some(level) = var("LOG_LEVEL") {
			self.logging.level = level;
		}
		if let Some(debug) = var("DEBUG") {
			self.debug = matches!(debug.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
		}
		Ok(())
	}

	/// Reject settings the server cannot run with.
	pub fn validate(&self) -> Result<()> {
		if self.server.port == 0 {
			return Err(Error::Config("server.port must not be 0".to_string()));
		}
		self.server.bind_address()?;
		if self.api.prefix.trim_matches('/').is_empty() {
			return Err(Error::Config("api.prefix must not be empty".to_string()));
		}
		if self.courses.max_students_per_course == 0 {
			return Err(Error::Config(
				"courses.max_students_per_course must be at least 1".to_string(),
			));
		}

		let mut usernames = HashSet::new();
		let mut tokens = HashSet::new();
		for user in &self.users {
			if user.username.is_empty() || user.token.is_empty() {
				return Err(Error::Config(
					"users entries need a username and a token".to_string(),
				));
			}
			if !usernames.insert(user.username.as_str()) {
				return Err(Error::Config(format!("duplicate user '{}'", user.username)));
			}
			if !tokens.insert(user.token.as_str()) {
				return Err(Error::Config(format!(
					"duplicate token for user '{}'",
					user.username
				)));
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;
	use std::io::Write;

	fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| map.get(key).cloned()
	}

	#[rstest]
	fn test_defaults_are_valid() {
		let settings = Settings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.server.bind_address().unwrap().to_string(), "127.0.0.1:8000");
		assert_eq!(settings.courses.max_students_per_course, 20);
	}

	#[rstest]
	fn test_parse_full_file() {
		let settings = Settings::from_toml_str(
			r#"
			debug = true
			fixtures = ["students.json", "school.json"]

			[server]
			host = "0.0.0.0"
			port = 8080

			[courses]
			max_students_per_course = 3

			[[users]]
			username = "alice"
			token = "alice-token"

			[[users]]
			username = "admin"
			token = "admin-token"
			is_staff = true
			"#,
		)
		.unwrap();

		assert!(settings.debug);
		assert_eq!(settings.server.bind_address().unwrap().to_string(), "0.0.0.0:8080");
		assert_eq!(settings.courses.max_students_per_course, 3);
		assert_eq!(settings.users.len(), 2);
		assert!(settings.users[1].is_staff);
		assert_eq!(
			settings.fixtures,
			vec![PathBuf::from("students.json"), PathBuf::from("school.json")]
		);
		assert!(settings.validate().is_ok());
	}

	#[rstest]
	#[case("127.0.0.1", "127.0.0.1:8000")]
	#[case("::1", "[::1]:8000")]
	#[case("[::1]", "[::1]:8000")]
	#[case("::", "[::]:8000")]
	fn test_bind_address(#[case] host: &str, #[case] expected: &str) {
		let server = ServerSettings {
			host: host.to_string(),
			..ServerSettings::default()
		};
		assert_eq!(server.bind_address().unwrap().to_string(), expected);
	}

	#[rstest]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

		let settings = Settings::from_file(file.path()).unwrap();
		assert_eq!(settings.logging.level, "debug");
	}

	#[rstest]
	fn test_missing_file_is_config_error() {
		let result = Settings::from_file("/definitely/not/here.toml");
		assert!(matches!(result, Err(Error::Config(_))));
	}

	#[rstest]
	fn test_malformed_toml_is_config_error() {
		let result = Settings::from_toml_str("[server\nport = ");
		assert!(matches!(result, Err(Error::Config(_))));
	}

	#[rstest]
	fn test_env_overrides() {
		let mut settings = Settings::default();
		settings
			.apply_env_overrides(env(&[
				("CLASSIFIEDS_HOST", "0.0.0.0"),
				("CLASSIFIEDS_PORT", "9001"),
				("CLASSIFIEDS_LOG_LEVEL", "warn"),
				("CLASSIFIEDS_DEBUG", "true"),
			]))
			.unwrap();

		assert_eq!(settings.server.host, "0.0.0.0");
		assert_eq!(settings.server.port, 9001);
		assert_eq!(settings.logging.level, "warn");
		assert!(settings.debug);
	}

	#[rstest]
	fn test_env_override_rejects_bad_port() {
		let mut settings = Settings::default();
		let result = settings.apply_env_overrides(env(&[("CLASSIFIEDS_PORT", "eighty")]));
		assert!(matches!(result, Err(Error::Config(_))));
	}

	#[rstest]
	#[case("[server]\nport = 0\n")]
	#[case("[server]\nhost = \"localhost\"\n")]
	#[case("[server]\nhost = \"127.0.0.1:8000\"\n")]
	#[case("[api]\nprefix = \"/\"\n")]
	#[case("[courses]\nmax_students_per_course = 0\n")]
	#[case("[[users]]\nusername = \"a\"\ntoken = \"t\"\n[[users]]\nusername = \"a\"\ntoken = \"u\"\n")]
	#[case("[[users]]\nusername = \"a\"\ntoken = \"t\"\n[[users]]\nusername = \"b\"\ntoken = \"t\"\n")]
	#[case("[[users]]\nusername = \"\"\ntoken = \"t\"\n")]
	fn test_validation_rejects(#[case] source: &str) {
		let settings = Settings::from_toml_str(source).unwrap();
		assert!(matches!(settings.validate(), Err(Error::Config(_))));
	}
}
