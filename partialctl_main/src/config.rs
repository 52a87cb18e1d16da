// PartialCTL: Checking CTL Properties on Partially Explored State Spaces
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Configuration of the validation run, derived from the command line.

use partialctl::ts::LoaderOptions;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error in the configuration of the validation run
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The translation table cannot be read
    #[error("Cannot read the translation table {file}")]
    Io {
        /// name of the file
        file: String,
        /// cause
        source: std::io::Error,
    },
    /// A line of the translation table is not of the form `raw = pretty`
    #[error("{file}:{line}: expected `raw = pretty`, found `{content}`")]
    InvalidTranslation {
        /// name of the file
        file: String,
        /// line number
        line: usize,
        /// content of the line
        content: String,
    },
    /// The same raw name is translated twice
    #[error("{file}:{line}: `{raw}` is translated twice")]
    DuplicateTranslation {
        /// name of the file
        file: String,
        /// line number
        line: usize,
        /// the raw name
        raw: String,
    },
    /// Zero worker threads requested
    #[error("The number of threads must be at least 1")]
    NoThreads,
    /// Zero timeout requested
    #[error("The timeout must be at least one second")]
    NoTimeout,
}

/// Read the translation table from a file.
pub fn load_translation(path: impl AsRef<Path>) -> Result<HashMap<String, String>, ConfigError> {
    let file = path.as_ref().display().to_string();
    let src = fs::read_to_string(path.as_ref())
        .map_err(|source| ConfigError::Io { file: file.clone(), source })?;
    parse_translation(&file, &src)
}

/// Parse the translation table. Every non-empty line (not starting with `#`) has the form
/// `raw = pretty`.
pub fn parse_translation(file: &str, src: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut table = HashMap::new();
    for (i, content) in src.lines().enumerate() {
        let line = i + 1;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let invalid = || ConfigError::InvalidTranslation {
            file: file.to_string(),
            line,
            content: content.to_string(),
        };
        let mut parts = trimmed.splitn(2, '=');
        let raw = parts.next().map(str::trim).filter(|x| !x.is_empty()).ok_or_else(invalid)?;
        let pretty = parts.next().map(str::trim).filter(|x| !x.is_empty()).ok_or_else(invalid)?;
        if table.insert(raw.to_string(), pretty.to_string()).is_some() {
            return Err(ConfigError::DuplicateTranslation {
                file: file.to_string(),
                line,
                raw: raw.to_string(),
            });
        }
    }
    Ok(table)
}

/// Build the options for loading the transition system.
pub fn loader_options(
    sink: i64,
    prefix: &str,
    translation: Option<&Path>,
    delete_sources: bool,
) -> Result<LoaderOptions, ConfigError> {
    let translation = match translation {
        Some(path) => load_translation(path)?,
        None => HashMap::new(),
    };
    Ok(LoaderOptions { sink, label_prefix: prefix.to_string(), translation, delete_sources })
}
