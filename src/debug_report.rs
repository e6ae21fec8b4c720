use rbe::{PassSummary, RewriteVerbose};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Print a per-pass report for one rewritten line on stderr.
///
/// stdout carries the rewritten tokens, so the report never goes there.
pub fn print_run(input: &str, res: &RewriteVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    eprintln!("\n{}", palette.bold(palette.paint(format!("⚙  Rewriting: \"{}\"", input), ansi::CYAN)));

    eprintln!("\n{}", palette.paint("━━━ Passes ━━━", ansi::GRAY));
    for pass in &details.passes {
        print_pass(pass, &palette);
    }

    eprintln!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    if res.rewrite.substitutions == 0 {
        eprintln!("{}", palette.dim("  No substitutions made"));
        if details.rule_count == 0 {
            eprintln!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
            eprintln!("  • No rules were loaded (check the database arguments)");
        }
    }
    eprintln!(
        "  {} {}",
        palette.bold(palette.paint(res.rewrite.tokens.join(" "), ansi::GREEN)),
        palette.dim(format!("│ {} tokens", res.rewrite.tokens.len())),
    );
    if !res.rewrite.converged {
        eprintln!("  {}", palette.paint("✗ pass limit reached before a fixed point", ansi::YELLOW));
    }

    eprintln!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    eprintln!(
        "  Total: {}  │  Passes: {}  │  Substitutions: {}  │  Rules: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(details.passes.len().to_string(), ansi::CYAN),
        palette.paint(res.rewrite.substitutions.to_string(), ansi::CYAN),
        palette.dim(details.rule_count.to_string()),
    );
    eprintln!();
}

fn print_pass(pass: &PassSummary, palette: &ansi::Palette) {
    let label = format!("Pass {}:", pass.pass);
    eprintln!(
        "  {} {} {}",
        palette.paint(label, ansi::BLUE),
        if pass.substitutions > 0 {
            palette.paint(format!("✓ {} substitutions", pass.substitutions), ansi::GREEN)
        } else {
            palette.dim("✗ fixed point")
        },
        palette.dim(format!("{:?}", pass.duration)),
    );

    for (rule, count) in pass.rules.iter().take(5) {
        eprintln!("    {} {}", palette.paint(rule, ansi::YELLOW), palette.dim(format!("×{count}")));
    }
    if pass.rules.len() > 5 {
        eprintln!("    {}", palette.dim(format!("... +{} more", pass.rules.len() - 5)));
    }
}
