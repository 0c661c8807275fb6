//! Basic usage example for vinerex
//!
//! Run with: cargo run --example basic

use vinerex::Pattern;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pattern = Pattern::compile(r"(?<year>\d{4})-(?<month>\d{2})-(?<day>\d{2})")?;

    let text = "shipped on 2024-03-15, again on 2024-11-02";
    println!("Text: {text:?}");
    println!("Pattern: {:?}", pattern.source());

    for caps in pattern.find_iter(text).enumerate() {
        let (i, m) = caps;
        println!("  match {i}: {:?} at {}..{}", m.as_str(), m.start(), m.end());
    }

    if let Some(caps) = pattern.captures(text) {
        println!();
        println!("First match breakdown:");
        println!("  year:  {:?}", caps.name("year"));
        println!("  month: {:?}", caps.name("month"));
        println!("  day:   {:?}", caps.name("day"));
    }

    Ok(())
}
