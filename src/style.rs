//! Terminal styling for CLI output

use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// Print an error message to stderr
pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

/// Print a warning message to stderr
pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green().bold(), msg);
}

pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".dimmed(), msg.dimmed());
}

pub fn header(msg: &str) {
    eprintln!("{}", msg.cyan().bold());
}

pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

pub fn url(u: &str) -> String {
    u.bright_blue().underline().to_string()
}

/// Render markdown with colors on a TTY, plain otherwise.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    if io::stdout().is_terminal() {
        let skin = create_skin();
        write!(output, "{}", skin.term_text(markdown))
    } else {
        write!(output, "{}", markdown)
    }
}

fn create_skin() -> termimad::MadSkin {
    use crossterm::style::Color;
    use termimad::{MadSkin, StyledChar};

    let mut skin = MadSkin::default();
    skin.set_headers_fg(Color::Cyan);
    skin.bold.set_fg(Color::White);
    skin.bullet = StyledChar::from_fg_char(Color::Blue, '•');
    skin.inline_code.set_fg(Color::Yellow);
    // Link targets are printed in italics
    skin.italic.set_fg(Color::Magenta);
    skin.horizontal_rule = StyledChar::from_fg_char(Color::DarkGrey, '─');
    skin
}
