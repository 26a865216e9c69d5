use crate::config::toml_config::HubSettings;
use crate::domain::model::ContentSet;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Blog,
    Portfolio,
    Services,
}

impl Category {
    /// 從匯整結果中挑出要輸出的部分
    pub fn select(self, set: &ContentSet) -> Result<Value> {
        let value = match self {
            Category::All => serde_json::to_value(set)?,
            Category::Blog => serde_json::to_value(&set.blog_posts)?,
            Category::Portfolio => serde_json::to_value(&set.portfolio_projects)?,
            Category::Services => serde_json::to_value(&set.services)?,
        };
        Ok(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "content-hub")]
#[command(about = "Merge the bundled content dataset with the headless CMS")]
pub struct CliConfig {
    #[arg(long, help = "TOML settings file")]
    pub settings: Option<String>,

    #[arg(long, help = "Bundled dataset path or URL (overrides settings)")]
    pub dataset: Option<String>,

    #[arg(long, help = "Remote source JSON config (overrides settings)")]
    pub remote_config: Option<String>,

    #[arg(long, value_enum, default_value_t = Category::All)]
    pub category: Category,

    #[arg(long, help = "Write the result to this file instead of stdout")]
    pub output: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage around the load")]
    pub monitor: bool,
}

impl CliConfig {
    /// Loads the settings file (or defaults) and applies command-line
    /// overrides on top.
    pub fn resolve_settings(&self) -> Result<HubSettings> {
        let mut settings = match &self.settings {
            Some(path) => HubSettings::from_file(path)?,
            None => HubSettings::default(),
        };

        if let Some(dataset) = &self.dataset {
            settings.sources.dataset = dataset.clone();
        }
        if let Some(remote_config) = &self.remote_config {
            settings.sources.remote_config = Some(remote_config.clone());
        }

        settings.validate()?;
        Ok(settings)
    }
}
