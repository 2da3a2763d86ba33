use crate::{
    addon::orchestrate::InstallOutcome,
    types::installation::Installation,
    utils::logger::{LogLevel, Logger},
};
use std::path::Path;

pub fn print_install_summary(outcome: &InstallOutcome, target: &Path) {
    let logger = Logger::new();

    let addon_lines: Vec<String> = outcome
        .addons
        .iter()
        .map(|a| {
            format!(
                "{:<24} {:<7} release {:<10} {} KiB",
                a.request.name,
                a.request.provider,
                a.release,
                a.bytes.len().div_ceil(1024)
            )
        })
        .collect();
    let refs: Vec<&str> = addon_lines.iter().map(|s| s.as_str()).collect();
    logger.log_message_with_trace(LogLevel::Info, "📦 Addons", refs);

    let target_lines = [
        format!("Path        : {}", target.display()),
        format!("Directories : {}", outcome.summary.directories),
        format!("Files       : {}", outcome.summary.files),
    ];
    logger.log_message_with_trace(
        LogLevel::Info,
        "📁 Target",
        target_lines.iter().map(|s| s.as_str()).collect(),
    );

    if !outcome.summary.collisions.is_empty() {
        let refs: Vec<&str> = outcome
            .summary
            .collisions
            .iter()
            .map(|s| s.as_str())
            .collect();
        logger.log_message_with_trace(
            LogLevel::Warning,
            "Paths overwritten by a later addon",
            refs,
        );
    }
}

pub fn print_installation(installation: &Installation, file_count: Option<usize>) {
    let logger = Logger::new();

    let mut header = format!("Installation path: {}", installation.path);
    if let Some(count) = file_count {
        header.push_str(&format!(" ({} file(s))", count));
    }
    logger.log_message(LogLevel::Info, &header);

    if installation.addons.is_empty() {
        logger.log_message(LogLevel::Info, "No addons recorded");
        return;
    }

    let lines: Vec<String> = installation
        .addons
        .iter()
        .map(|a| {
            format!(
                "{:<24} {:<7} release {:<10} {}  sha256:{}",
                a.name,
                a.provider,
                a.release,
                a.installed_at.format("%Y-%m-%d %H:%M"),
                a.archive_sha256.get(..12).unwrap_or(&a.archive_sha256)
            )
        })
        .collect();
    let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
    logger.log_message_with_trace(LogLevel::Info, "Installed addons", refs);
}
