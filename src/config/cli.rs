use crate::config::toml_config::RegistryConfig;
use crate::domain::model::PersonId;
use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "uni-registry")]
#[command(about = "University registry with JSON persistence")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the registry file
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Registry file name
    #[arg(long)]
    pub data_file: Option<String>,

    /// University name used by `demo`
    #[arg(long)]
    pub name: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build the sample university, save it, reload it and print every roster
    Demo,
    /// Load the registry file and print every course with its roster
    Show,
    /// Look up a student by id
    FindStudent { id: PersonId },
    /// Look up a teacher by id
    FindTeacher { id: PersonId },
    /// Look up a course by code
    FindCourse { code: String },
}

impl CliConfig {
    /// 讀取 TOML 配置（若有指定），再套用命令列覆蓋
    pub fn resolve(&self) -> crate::Result<RegistryConfig> {
        let mut config = match &self.config {
            Some(path) => RegistryConfig::from_file(Path::new(path))?,
            None => RegistryConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        if let Some(file) = &self.data_file {
            config.storage.data_file = file.clone();
        }
        if let Some(name) = &self.name {
            config.university.name = name.clone();
        }

        Ok(config)
    }
}
