//! `aurora classify`: Show which persona a message routes to.

use std::sync::Arc;

use aurora_engine::{PersonaClassifier, PersonaRegistry};

pub fn run(message: &str) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(PersonaRegistry::new());
    let key = PersonaClassifier::new(registry.clone()).classify(message);
    let persona = registry.persona(key);

    println!("{key}\t{}", persona.display_name);
    Ok(())
}
