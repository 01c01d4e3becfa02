//! Tool configuration stored in `inftrim.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::rules::{Insertion, LineRule, RuleSet};

pub const DEFAULT_CONFIG_FILE: &str = "inftrim.toml";

/// Tool configuration (TOML).
///
/// Edited by humans; missing fields default to an inert rule set and the
/// usual PE module extensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub patch: PatchConfig,
    pub prune: PruneConfig,
}

/// Section filter applied by `inftrim patch`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PatchConfig {
    /// Regexes on section names; matching sections are dropped whole.
    pub drop_sections: Vec<String>,

    /// Regexes on line text (terminator excluded), applied in every section.
    pub drop_lines: Vec<String>,

    /// Exact section names that must exist in the input.
    pub expect_sections: Vec<String>,

    pub drop_lines_in: Vec<ScopedLineRule>,

    pub insert: Vec<InsertConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScopedLineRule {
    /// Regex on the section name.
    pub section: String,
    /// Regex on line text; empty matches every line.
    #[serde(default)]
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsertConfig {
    pub section: String,
    /// Lines without terminators.
    #[serde(default)]
    pub lines: Vec<String>,
}

/// Module graph settings for `inftrim prune`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PruneConfig {
    /// File extensions (without dot, case-insensitive) treated as modules.
    pub extensions: Vec<String>,

    /// File names left out of the graph entirely.
    pub skip: Vec<String>,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["dll".to_string(), "exe".to_string()],
            skip: Vec::new(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.patch.rule_set()?;
        self.prune.validate()
    }
}

impl PatchConfig {
    /// Compile the configured patterns.
    pub fn rule_set(&self) -> Result<RuleSet> {
        let drop_sections = self
            .drop_sections
            .iter()
            .map(|pattern| compile("patch.drop_sections", pattern))
            .collect::<Result<Vec<_>>>()?;

        let mut drop_lines = self
            .drop_lines
            .iter()
            .map(|pattern| {
                Ok(LineRule {
                    section: None,
                    pattern: compile("patch.drop_lines", pattern)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        for rule in &self.drop_lines_in {
            drop_lines.push(LineRule {
                section: Some(compile("patch.drop_lines_in.section", &rule.section)?),
                pattern: compile("patch.drop_lines_in.pattern", &rule.pattern)?,
            });
        }

        let mut inserts = Vec::with_capacity(self.insert.len());
        for insert in &self.insert {
            validate_section_name("patch.insert.section", &insert.section)?;
            if let Some(line) = insert.lines.iter().find(|line| line.contains(['\r', '\n'])) {
                return Err(anyhow!(
                    "patch.insert line {line:?} for [{}] must not contain line breaks",
                    insert.section
                ));
            }
            inserts.push(Insertion {
                section: insert.section.clone(),
                lines: insert.lines.clone(),
            });
        }

        for section in &self.expect_sections {
            validate_section_name("patch.expect_sections", section)?;
        }

        Ok(RuleSet {
            drop_sections,
            drop_lines,
            inserts,
            expect_sections: self.expect_sections.clone(),
        })
    }
}

impl PruneConfig {
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(anyhow!("prune.extensions must be a non-empty array"));
        }
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|ext| ext.trim().is_empty() || ext.starts_with('.'))
        {
            return Err(anyhow!(
                "prune.extensions entry {ext:?} must be a bare extension like \"dll\""
            ));
        }
        Ok(())
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }

    pub fn is_skipped(&self, file_name: &str) -> bool {
        self.skip
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(file_name))
    }
}

fn compile(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("invalid regex {pattern:?} in {field}"))
}

fn validate_section_name(field: &str, section: &str) -> Result<()> {
    if section.is_empty() || section.contains(['\r', '\n']) {
        return Err(anyhow!("{field} entry {section:?} is not a valid section name"));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `Config::default()`.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let cfg = Config::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &Config) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    crate::io::transform::write_atomic(path, buf.as_bytes())
}
