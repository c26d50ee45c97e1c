pub mod ai;
pub mod cli;
pub mod config;
pub mod document;
pub mod extraction;
pub mod job;
pub mod pdf;
pub mod storage;
pub mod types;
pub mod utils;
pub mod web;

pub use ai::{AiClient, AiPayload, JobAnalyzer};
pub use config::{AppConfig, ConfigSource};
pub use document::{DocumentError, DocumentFormat, ResumeParser};
pub use extraction::TextExtractor;
pub use job::{detect, HtmlPage, JobDetection, PageDom};
pub use storage::{KvStore, StorageKey};
pub use types::{JobAnalysis, JobPosting, ResumeRecord};
pub use web::start_web_server;
