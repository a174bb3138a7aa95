//! Terminal styling utilities

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static SHIP: Emoji<'_, '_> = Emoji("🚢 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static REPORT: Emoji<'_, '_> = Emoji("📝 ", "");
pub static PICTURE: Emoji<'_, '_> = Emoji("🖼️  ", "");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ██╗     ██╗███████╗███████╗██████╗  ██████╗  █████╗ ████████╗
    ██║     ██║██╔════╝██╔════╝██╔══██╗██╔═══██╗██╔══██╗╚══██╔══╝
    ██║     ██║█████╗  █████╗  ██████╔╝██║   ██║███████║   ██║
    ██║     ██║██╔══╝  ██╔══╝  ██╔══██╗██║   ██║██╔══██║   ██║
    ███████╗██║██║     ███████╗██████╔╝╚██████╔╝██║  ██║   ██║
    ╚══════╝╚═╝╚═╝     ╚══════╝╚═════╝  ╚═════╝ ╚═╝  ╚═╝   ╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("⚓").magenta().bold(),
        style("Who made it onto the lifeboats?").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Resolved run configuration, for display
pub struct RunConfig<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub report: &'a Path,
    pub figures: Option<&'a Path>,
    pub missing_threshold: f64,
    pub bundle: bool,
}

/// Print configuration card
pub fn print_config(config: &RunConfig<'_>) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:   {:<38}│",
        FOLDER,
        truncate_path(config.input, 37)
    );
    println!(
        "    │  {} Output:  {:<38}│",
        SAVE,
        truncate_path(config.output, 37)
    );
    println!(
        "    │  {} Report:  {:<38}│",
        REPORT,
        truncate_path(config.report, 37)
    );
    let figures = config
        .figures
        .map(|p| truncate_path(p, 37))
        .unwrap_or_else(|| "disabled".to_string());
    println!("    │  {} Figures: {:<38}│", PICTURE, figures);
    println!("    ├{}┤", line);
    println!(
        "    │  {} Missing threshold: {:<28}│",
        CHART,
        style(format!("{:.1}%", config.missing_threshold * 100.0)).yellow()
    );
    println!(
        "    │  {} Bundle:            {:<28}│",
        SAVE,
        style(if config.bundle { "yes" } else { "no" }).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print the elapsed time of a step
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        SHIP,
        style("Lifeboat analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!(
            "      Found {} {}",
            style(count).yellow().bold(),
            description
        );
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("data/very/long/path.csv", 10), "...ath.csv");
    }
}
