// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ai::{resolve_ai_config, JobAnalyzer};
use crate::config::AppConfig;
use crate::document::ResumeParser;
use crate::job::{detect, HtmlPage, JobDetection};
use crate::storage::{KvStore, StorageKey};
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Extract resumes, detect job postings and analyze them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract a structured resume from a .txt, .pdf, .docx or .doc file
    ParseResume {
        file: PathBuf,
        /// Store the result as the current resume
        #[arg(long)]
        save: bool,
    },
    /// Detect a job posting in a saved HTML page
    DetectJob {
        html_file: PathBuf,
        #[arg(long)]
        url: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Detect and analyze a job posting, storing the analysis
    AnalyzeJob {
        html_file: PathBuf,
        #[arg(long)]
        url: String,
        #[arg(long)]
        title: Option<String>,
        /// Skip the remote AI and use heuristics only
        #[arg(long)]
        offline: bool,
    },
    /// Profile a company with the remote AI, cached per company
    AnalyzeCompany { name: String },
    /// Print a stored value (resumeData, tailoredResume, jobAnalysis, aiConfig, companyProfiles)
    Show { key: String },
    /// Store the API key used for remote analysis
    SetApiKey { key: String },
    /// Start the HTTP API
    Serve,
}

pub async fn handle_command(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Command::ParseResume { file, save } => {
            let record = ResumeParser::new()
                .parse_file(&file)
                .await
                .with_context(|| format!("Failed to parse resume {}", file.display()))?;

            if record.is_sentinel() {
                warn!("No resume fields found in {}", file.display());
            }
            if save {
                let store = open_store(&config).await?;
                store.set(StorageKey::ResumeData, &record).await?;
                info!("Saved resume as {}", StorageKey::ResumeData);
            }
            print_json(&record)
        }

        Command::DetectJob {
            html_file,
            url,
            title,
        } => {
            let detection = detect_file(&html_file, &url, title.as_deref()).await?;
            print_json(&detection)
        }

        Command::AnalyzeJob {
            html_file,
            url,
            title,
            offline,
        } => {
            let detection = detect_file(&html_file, &url, title.as_deref()).await?;
            let posting = detection
                .posting
                .with_context(|| format!("No job posting detected on {}", url))?;

            let store = open_store(&config).await?;
            let analyzer = if offline {
                JobAnalyzer::offline()
            } else {
                JobAnalyzer::new(&resolve_ai_config(&store, &config.ai).await?)
            };

            let analysis = analyzer.analyze(&posting).await;
            store.set(StorageKey::JobAnalysis, &analysis).await?;
            info!(
                "Stored analysis for {} at {}",
                analysis.title, analysis.company
            );
            print_json(&analysis)
        }

        Command::AnalyzeCompany { name } => {
            let store = open_store(&config).await?;
            let analyzer = JobAnalyzer::new(&resolve_ai_config(&store, &config.ai).await?);
            let profile = analyzer.analyze_company(&name, &store).await?;
            print_json(&profile)
        }

        Command::Show { key } => {
            let key: StorageKey = key.parse()?;
            let store = open_store(&config).await?;
            match store.get::<serde_json::Value>(key).await? {
                Some(value) => print_json(&value),
                None => {
                    info!("Nothing stored under {}", key);
                    Ok(())
                }
            }
        }

        Command::SetApiKey { key } => {
            let store = open_store(&config).await?;
            let mut ai_config = resolve_ai_config(&store, &config.ai).await?;
            ai_config.api_key = Some(key);
            store.set(StorageKey::AiConfig, &ai_config).await?;
            info!("API key saved");
            Ok(())
        }

        Command::Serve => start_web_server(config).await,
    }
}

async fn open_store(config: &AppConfig) -> Result<KvStore> {
    let store = KvStore::open(&config.database_path()?).await?;
    store.initialize_defaults(&config.ai).await?;
    Ok(store)
}

async fn detect_file(html_file: &Path, url: &str, title: Option<&str>) -> Result<JobDetection> {
    let html = tokio::fs::read_to_string(html_file)
        .await
        .with_context(|| format!("Failed to read {}", html_file.display()))?;
    let page = HtmlPage::parse(url, title, &html);
    Ok(detect(&page))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
