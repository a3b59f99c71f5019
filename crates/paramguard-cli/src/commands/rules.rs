//! Rules command - list registered parameters.

use colored::Colorize;
use paramguard::ValidatorRegistry;

pub fn run(filter: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ValidatorRegistry::global();

    let mut shown = 0;
    for name in registry.parameters() {
        if let Some(ref f) = filter {
            if !name.contains(f.as_str()) {
                continue;
            }
        }
        if let Some(validator) = registry.get(name) {
            println!("{:32} {}", name.white(), validator.label().dimmed());
            shown += 1;
        }
    }

    println!();
    println!(
        "{} of {} parameters",
        shown.to_string().white().bold(),
        registry.len()
    );
    Ok(())
}
