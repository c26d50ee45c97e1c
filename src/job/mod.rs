//! Job-posting detection and analysis over a page capability

pub mod analysis;
pub mod detector;
pub mod dom;
pub mod sites;

pub use detector::{detect, DetectionSource, JobDetection};
pub use dom::{HtmlPage, PageDom};
pub use sites::JobSite;
