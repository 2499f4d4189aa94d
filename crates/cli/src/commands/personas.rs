//! `aurora personas`: List the persona catalog.

use aurora_engine::PersonaRegistry;
use aurora_engine::classifier::PRIORITY;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = PersonaRegistry::new();

    println!("🎭 Personas");
    println!("==========");
    for persona in registry.all() {
        println!();
        println!("  {} ({})", persona.display_name, persona.key);
        if PRIORITY.contains(&persona.key) {
            println!("    Keywords: {}", persona.trigger_keywords.join(", "));
        } else {
            println!("    Default when no keyword matches");
        }
    }

    let order: Vec<String> = PRIORITY.iter().map(ToString::to_string).collect();
    println!();
    println!("  Routing priority: {}", order.join(" > "));
    Ok(())
}
