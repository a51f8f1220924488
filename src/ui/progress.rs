use crate::ui::output::{palette, quiet};
use crate::ui::Icons;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::{Duration, Instant};

/// Page-level progress for a refresh.
///
/// Draws a bar on a terminal; otherwise prints one percentage line per page.
/// Does nothing at all when disabled.
pub struct RefreshProgress {
    pb: Option<ProgressBar>,
    plain: bool,
    started: Instant,
}

impl RefreshProgress {
    pub fn new(expected_pages: usize, enabled: bool) -> Self {
        let enabled = enabled && !quiet();
        let is_term = console::Term::stdout().is_term();

        let pb = if enabled && is_term {
            let pb = ProgressBar::new(100);
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{bar:30}] {pos:>3}%") {
                pb.set_style(style.progress_chars("=> "));
            }
            pb.set_message(format!("Fetching {} page(s)", expected_pages));
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        Self {
            pb,
            plain: enabled && !is_term,
            started: Instant::now(),
        }
    }

    pub fn page_done(&self, page: usize, percent: u64) {
        if let Some(pb) = &self.pb {
            pb.set_position(percent);
            pb.set_message(format!("Page {}", page));
        } else if self.plain {
            println!("{:2}%", percent);
        }
    }

    pub fn finish(&self, records: usize) {
        let line = format!(
            "Stored {} repositories in {}",
            records,
            HumanDuration(self.started.elapsed())
        );
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
            println!("{} {}", Icons::CHECK, line.style(palette().good));
        } else if self.plain {
            println!("{} {}", Icons::CHECK, line);
        }
    }

    pub fn abandon(&self) {
        if let Some(pb) = &self.pb {
            pb.abandon_with_message("Refresh failed");
        }
    }
}
