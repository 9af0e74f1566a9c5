use console::style;
use std::io;
use std::path::PathBuf;

use crate::site::{ExtractionSource, GeneratedSite, SiteOrigin};

pub struct OutputHandler {
    debug: bool,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self { debug: false }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn print_prompt(&mut self, prompt: &str) -> io::Result<()> {
        println!("{} {}", style("Prompt:").cyan().bold(), prompt);
        Ok(())
    }

    pub fn print_error(&mut self, content: &str) -> io::Result<()> {
        eprintln!("{} {}", style("Error:").red().bold(), content);
        Ok(())
    }

    pub fn print_system(&mut self, content: &str) -> io::Result<()> {
        println!("{}", style(content).yellow().dim());
        Ok(())
    }

    pub fn print_site_summary(&mut self, site: &GeneratedSite, written: &[PathBuf]) -> io::Result<()> {
        match &site.origin {
            SiteOrigin::Model {
                served_by,
                attempts,
                extraction,
            } => {
                println!(
                    "{} {} {}",
                    style("Generated by").green().bold(),
                    style(served_by).green(),
                    style(format!("({} attempt(s))", attempts)).dim()
                );
                if *extraction == ExtractionSource::Fallback {
                    println!(
                        "{}",
                        style("The model reply could not be parsed; wrote the error page instead.")
                            .yellow()
                    );
                } else if self.debug {
                    println!("   {}", style(format!("extraction: {:?}", extraction)).dim());
                }
            }
            SiteOrigin::Placeholder { category } => {
                println!(
                    "{} {}",
                    style("Placeholder written:").yellow().bold(),
                    category.user_message()
                );
            }
        }

        for (name, body) in site.bundle.iter() {
            println!(
                "   {} {}",
                style(format!("{:<11}", name)).blue(),
                style(format!("{} lines", body.lines().count())).dim()
            );
        }
        for path in written {
            println!("   {} {}", style("→").dim(), path.display());
        }
        Ok(())
    }

    pub fn print_banner(&mut self) -> io::Result<()> {
        println!("{}", style("╔═══════════════════════════════════════╗").cyan().bold());
        println!("{}", style("║     SITEGEN - AI Website Builder      ║").cyan().bold());
        println!("{}", style("╚═══════════════════════════════════════╝").cyan().bold());
        Ok(())
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
