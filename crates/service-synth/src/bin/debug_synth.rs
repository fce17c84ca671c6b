//! Debug script to see what the synthesizer produces.
//!
//! Usage: `debug_synth [ENTITY_JSON_OR_DIR...]`. Without arguments a sample
//! `Customer` entity with a password field is used. Set `RUST_LOG=debug` to
//! follow the mutation steps.

use std::path::Path;

use service_synth::entity::{load_entities, load_entity};
use service_synth::{DataType, Entity, Field, SynthConfig, Synthesizer};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn sample_entity() -> Entity {
    Entity::new(
        "Customer",
        vec![
            Field::new("name", DataType::SingleLineText),
            Field::new("password", DataType::Password),
        ],
    )
}

fn collect_entities(args: &[String]) -> Vec<Entity> {
    if args.is_empty() {
        return vec![sample_entity()];
    }

    let mut entities = Vec::new();
    for arg in args {
        let path = Path::new(arg);
        let loaded = if path.is_dir() {
            load_entities(path)
        } else {
            load_entity(path).map(|entity| vec![entity])
        };
        match loaded {
            Ok(found) => entities.extend(found),
            Err(err) => warn!(path = %path.display(), error = %err, "skipping entity definition"),
        }
    }
    entities
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let synth = Synthesizer::new(SynthConfig::default())?;

    for entity in collect_entities(&args) {
        match synth.synthesize_entity(&entity) {
            Ok(modules) => {
                for module in modules {
                    println!("// ===== {} =====", module.path.display());
                    println!("{}", module.code);
                }
            }
            Err(err) => {
                eprintln!("{}: {:?}", entity.name, miette::Report::new(err));
            }
        }
    }

    Ok(())
}
