use console::style;

/// Console status lines; `quiet` keeps only errors
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    pub fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn header(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold().underlined());
        }
    }

    /// Numbered pipeline step, e.g. `[2/4] Parsing header files...`
    pub fn step(&self, index: usize, total: usize, message: &str) {
        if !self.quiet {
            println!("\n{} {}", style(format!("[{}/{}]", index, total)).cyan(), message);
        }
    }

    /// Indented per-item progress line
    pub fn item(&self, message: &str) {
        if !self.quiet {
            println!("   {}", style(message).dim());
        }
    }

    pub fn section(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold());
            println!("{}", "─".repeat(40));
        }
    }

    /// Aligned `label: value` line inside a section
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        if !self.quiet {
            println!("  {:<20} {}", format!("{}:", label), value);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
