use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::constants::progress::TICK_INTERVAL;
use crate::utils::string::pluralize;

const PROGRESS_BAR_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {per_sec}";

/// Terminal status output for batch rendering, written to stderr
pub struct ProgressReporter {
    term: Term,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub fn start_discovery(&self) {
        let _ = self.term.clear_line();
        eprintln!("{} Discovering fact files...", style("🔍").cyan());
    }

    pub fn finish_discovery(&self, count: usize) {
        if count == 0 {
            eprintln!("{} No fact files found", style("✗").red());
        } else {
            eprintln!(
                "{} Discovery complete: found {} {}",
                style("✓").green(),
                style(count).yellow().bold(),
                pluralize("fact file", count)
            );
        }
    }

    pub fn start_rendering(&self, total: usize) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        let bar_style = ProgressStyle::default_bar()
            .template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ");
        pb.set_style(bar_style);
        pb.set_message("Rendering graphs");
        pb.enable_steady_tick(TICK_INTERVAL);
        pb
    }

    pub fn finish_rendering(&self, pb: &ProgressBar, rendered: usize, failed: usize) {
        pb.finish_and_clear();
        if failed == 0 {
            eprintln!(
                "{} Rendered {} {}",
                style("✓").green().bold(),
                style(rendered).yellow().bold(),
                pluralize("graph", rendered)
            );
        } else {
            eprintln!(
                "{} Rendered {} {}, {} failed",
                style("⚠").yellow().bold(),
                style(rendered).yellow().bold(),
                pluralize("graph", rendered),
                style(failed).red().bold()
            );
        }
    }
}
