//! Output formatting utilities

use crate::types::{SourceFile, UploadStats};
use std::time::Duration;

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    human_bytes::human_bytes(bytes as f64)
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    format_duration_secs(secs)
}

/// Format duration from seconds
pub fn format_duration_secs(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining = secs - mins * 60.0;
        format!("{}m {:.0}s", mins as u64, remaining)
    } else {
        let hours = (secs / 3600.0).floor();
        let remaining = secs - hours * 3600.0;
        let mins = (remaining / 60.0).floor();
        format!("{}h {}m", hours as u64, mins as u64)
    }
}

/// Format transfer rate in human-readable format
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", human_bytes::human_bytes(bytes_per_sec))
}

/// Format a count with a unit
pub fn format_count(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Format a file count
pub fn format_files(count: u64) -> String {
    format_count(count, "file", "files")
}

/// Dry run report listing what would be uploaded
pub struct DryRunReport<'a> {
    pub destination: String,
    pub files: &'a [SourceFile],
}

impl DryRunReport<'_> {
    /// Format the dry run report
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Dry Run ===".to_string());
        lines.push(String::new());

        for file in self.files {
            lines.push(format!(
                "Would upload: {} ({})",
                file.name,
                format_size(file.size)
            ));
        }

        let total: u64 = self.files.iter().map(|f| f.size).sum();
        lines.push(String::new());
        lines.push(format!(
            "{}, {} to {}",
            format_files(self.files.len() as u64),
            format_size(total),
            self.destination
        ));

        lines.join("\n")
    }

    /// Print the report to stdout
    pub fn print(&self) {
        println!("{}", self.format());
    }
}

/// Upload completion report
pub struct UploadReport {
    pub duration_secs: f64,
    pub files_uploaded: u64,
    pub blocks_staged: u64,
    pub bytes_transferred: u64,
}

impl From<&UploadStats> for UploadReport {
    fn from(stats: &UploadStats) -> Self {
        Self {
            duration_secs: stats.duration_secs,
            files_uploaded: stats.files_uploaded,
            blocks_staged: stats.blocks_staged,
            bytes_transferred: stats.bytes_transferred,
        }
    }
}

impl UploadReport {
    /// Format the upload report
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Upload Complete ===".to_string());
        lines.push(String::new());
        lines.push(format!(
            "Duration:         {}",
            format_duration_secs(self.duration_secs)
        ));
        lines.push(format!(
            "Uploaded:         {}",
            format_files(self.files_uploaded)
        ));
        lines.push(format!(
            "Blocks staged:    {}",
            self.blocks_staged
        ));
        lines.push(format!(
            "Data transferred: {}",
            format_size(self.bytes_transferred)
        ));

        if self.duration_secs > 0.0 {
            let rate = self.bytes_transferred as f64 / self.duration_secs;
            lines.push(format!("Transfer rate:    {}", format_rate(rate)));
        }

        lines.join("\n")
    }

    /// Print the report to stdout
    pub fn print(&self) {
        println!("{}", self.format());
    }
}
