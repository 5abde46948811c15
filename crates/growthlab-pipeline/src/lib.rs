//! One analysis run: features, baseline, drivers, topics and the final report

mod analyzer;
mod request;
mod source;

pub use analyzer::ChannelAnalyzer;
pub use request::AnalysisRequest;
pub use source::{ReportSink, VideoSource};
