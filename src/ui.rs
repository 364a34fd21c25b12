use console::style;

use crate::domain::candidate::ReleaseCandidate;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_candidate(candidate: &ReleaseCandidate) {
    println!("\n{}", style("Release candidate created").bold());
    println!("  Tag:    {}", style(candidate.tag.name()).green());
    println!("  Branch: {}", candidate.tag.branch_name());
    println!("  Issue:  {}", candidate.issue_url);
}
