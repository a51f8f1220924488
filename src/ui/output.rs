use crate::ui::Icons;
use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;

/// Styles for the status lines the CLI prints around a refresh
#[derive(Debug, Clone)]
pub(crate) struct Palette {
    pub heading: Style,
    pub good: Style,
    pub bad: Style,
    pub caution: Style,
    pub accent: Style,
    pub faint: Style,
}

impl Palette {
    fn for_stdout() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::monochrome();
        }
        Self {
            heading: Style::new().cyan().bold(),
            good: Style::new().green().bold(),
            bad: Style::new().red().bold(),
            caution: Style::new().yellow().bold(),
            accent: Style::new().magenta(),
            faint: Style::new().white().dimmed(),
        }
    }

    fn monochrome() -> Self {
        Self {
            heading: Style::new(),
            good: Style::new(),
            bad: Style::new(),
            caution: Style::new(),
            accent: Style::new(),
            faint: Style::new(),
        }
    }
}

pub(crate) fn palette() -> &'static Palette {
    static PALETTE: OnceLock<Palette> = OnceLock::new();
    PALETTE.get_or_init(Palette::for_stdout)
}

fn quiet_flag(value: Option<&str>) -> bool {
    matches!(value, Some(v) if v == "1" || v.eq_ignore_ascii_case("true"))
}

/// `REPOCACHE_QUIET=1` silences status lines and the progress bar; logging is unaffected
pub fn quiet() -> bool {
    static QUIET: OnceLock<bool> = OnceLock::new();
    *QUIET.get_or_init(|| quiet_flag(std::env::var("REPOCACHE_QUIET").ok().as_deref()))
}

pub fn success(label: &str) {
    if quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(palette().good));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(palette().bad));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(palette().caution));
}

pub fn info(icon: &str, label: &str, value: &str) {
    if quiet() {
        return;
    }
    println!(
        "{} {}: {}",
        icon.style(palette().accent),
        label.style(palette().faint),
        value
    );
}

pub fn section(title: &str) {
    if quiet() {
        return;
    }
    println!();
    println!("━{}━", title.style(palette().heading));
}

pub fn summary_row(label: &str, value: &str) {
    if quiet() {
        return;
    }
    println!("  {} {}", label.style(palette().faint), value);
}
