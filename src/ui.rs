use console::style;

use crate::release::AssembledRelease;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_release_summary(release: &AssembledRelease) {
    println!("\n{}", style("Assembled release:").bold());
    println!("  Tag:   {}", style(&release.tag).green());
    println!("  Title: {}", release.title);

    if release.body.is_empty() {
        println!("  Body:  (no changes since last release)");
        return;
    }

    println!("  Body:");
    let lines: Vec<&str> = release.body.lines().collect();
    for line in lines.iter().take(10) {
        println!("    {}", line);
    }
    if lines.len() > 10 {
        println!("    ... and {} more lines", lines.len() - 10);
    }
}
