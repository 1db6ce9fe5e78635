use clap::Parser;
use std::path::PathBuf;

use crate::calc::DEFAULT_PASS_MARK;
use crate::model::{MAX_GRADE, MIN_GRADE};

#[derive(Debug, Clone, Parser)]
#[command(name = "rosterd")]
#[command(about = "Roster server for teachers, students, classes and grades")]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "ROSTERD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port (0 picks a free one)
    #[arg(short, long, env = "ROSTERD_PORT", default_value_t = 50007)]
    pub port: u16,

    /// Directory holding the JSON records
    #[arg(long, env = "ROSTERD_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Where generated documents are written (defaults to the data directory)
    #[arg(long, env = "ROSTERD_REPORTS_DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Minimum overall average for a passing transcript
    #[arg(long, env = "ROSTERD_PASS_MARK", default_value_t = DEFAULT_PASS_MARK)]
    pub pass_mark: f64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&self.pass_mark) {
            anyhow::bail!(
                "pass mark must be between {MIN_GRADE} and {MAX_GRADE}, got {}",
                self.pass_mark
            );
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.reports_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.clone())
    }
}
