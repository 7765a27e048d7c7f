use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub heading: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub value: fn(&str) -> String,
    pub idx: fn(&str) -> String,
    pub rank: fn(&str) -> String,
    pub dim: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "temp" | "" => Self::temp(),
            "arcade" => Self::arcade(),
            "canvas" => Self::canvas(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::temp() // Fallback to default
            }
        }
    }

    fn temp() -> Self {
        Self {
            title: |s| s.bright_magenta().italic().bold().underline().to_string(),
            heading: |s| s.cyan().bold().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            label: |s| s.white().to_string(),
            value: |s| s.yellow().to_string(),
            idx: |s| s.bright_white().to_string(),
            rank: |s| s.green().bold().to_string(),
            dim: |s| s.bright_white().dimmed().italic().to_string(),
        }
    }

    fn arcade() -> Self {
        Self {
            title: |s| s.red().italic().bold().underline().to_string(),
            heading: |s| s.bright_yellow().bold().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            label: |s| s.cyan().to_string(),
            value: |s| s.bright_white().to_string(),
            idx: |s| s.green().to_string(),
            rank: |s| s.red().italic().to_string(),
            dim: |s| s.bright_yellow().dimmed().italic().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            heading: |s| s.bright_cyan().bold().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            label: |s| s.black().to_string(),
            value: |s| s.magenta().to_string(),
            idx: |s| s.cyan().to_string(),
            rank: |s| s.red().bold().to_string(),
            dim: |s| s.bright_black().italic().to_string(),
        }
    }
}
