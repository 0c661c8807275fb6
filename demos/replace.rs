//! Template-based replacement, including a swap that reorders captured groups.
//!
//! Run with: cargo run --example replace

use vinerex::Pattern;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let emails = Pattern::compile(r"(\w+)@(\w+\.\w+)")?;
    let text = "contact alice@example.com or bob@example.org";

    let redacted = emails.replace_all(text, "[redacted]");
    println!("redacted: {redacted}");

    let swapped = emails.replace_all(text, r"\g<2> (was \g<1>)");
    println!("swapped:  {swapped}");

    Ok(())
}
