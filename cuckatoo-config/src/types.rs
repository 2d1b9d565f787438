// Copyright 2017 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Public types for config modules

use std::fmt;
use std::io;
use std::path::PathBuf;

use cuckatoo_pow::SolverParams;
use cuckatoo_util::LoggingConfig;

/// Error type wrapping config errors.
#[derive(Debug)]
pub enum ConfigError {
	/// Error with parsing of config file
	ParseError(String, String),

	/// Error with fileIO while reading config file
	FileIOError(String, String),

	/// No file found
	FileNotFoundError(String),

	/// Error serializing config values
	SerializationError(String),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			ConfigError::ParseError(ref file_name, ref message) => write!(
				f,
				"Error parsing configuration file at {} - {}",
				file_name, message
			),
			ConfigError::FileIOError(ref file_name, ref message) => {
				write!(f, "{} {}", message, file_name)
			}
			ConfigError::FileNotFoundError(ref file_name) => {
				write!(f, "Configuration file not found: {}", file_name)
			}
			ConfigError::SerializationError(ref message) => {
				write!(f, "Error serializing configuration: {}", message)
			}
		}
	}
}

impl From<io::Error> for ConfigError {
	fn from(error: io::Error) -> ConfigError {
		ConfigError::FileIOError(
			String::from(""),
			String::from(format!("Error loading config file: {}", error)),
		)
	}
}

impl From<toml::de::Error> for ConfigError {
	fn from(error: toml::de::Error) -> ConfigError {
		ConfigError::ParseError(String::from(""), format!("{}", error))
	}
}

/// Top-level configuration file contents: the solver's tunable parameters
/// plus logging, flattened into two `[sections]` the way grin's
/// `GlobalConfig` flattens server/mining/wallet into one TOML file (spec
/// §6's `fill_default_params`/CLI `--config` surface).
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct GlobalConfig {
	/// Keep track of the file we've read, if any.
	#[serde(skip)]
	pub config_file_path: Option<PathBuf>,
	/// Solver tuning parameters (spec §6: device, edge_bits, proof_size,
	/// bucket_bits, ntrims, max_sols and the launch-shape knobs).
	#[serde(default)]
	pub solver: SolverParams,
	/// Logging configuration.
	#[serde(default)]
	pub logging: Option<LoggingConfig>,
}
