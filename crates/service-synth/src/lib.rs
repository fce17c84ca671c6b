//! # Service Synth
//!
//! Generates NestJS service modules for data model entities. Each entity gets
//! two TypeScript modules: a regenerated `{Type}ServiceBase` implementing CRUD
//! over the Prisma client, and a `{Type}Service` subclass meant for custom
//! logic. Entities with password fields get a hashing collaborator injected
//! into both.
//!
//! ## Architecture
//!
//! ```text
//! Template (TS)          Entity (JSON)
//!        │                     │
//!        ▼                     ▼
//! ┌──────────────┐     ┌──────────────┐
//! │   Template   │     │    Naming    │  Placeholder values and
//! │  (TS → AST)  │     │   Mappings   │  create/update mappings
//! └──────┬───────┘     └──────┬───────┘
//!        └─────────┬──────────┘
//!                  ▼
//!          ┌──────────────┐
//!          │ Interpolate  │  Structural placeholder substitution
//!          └──────┬───────┘
//!                 ▼
//!          ┌──────────────┐
//!          │    Mutate    │  Collaborator injection, async, imports
//!          └──────┬───────┘
//!                 ▼
//!          ┌──────────────┐
//!          │   Scaffold   │  Drop `declare` stand-ins and
//!          │    strip     │  suppression comments
//!          └──────┬───────┘
//!                 ▼
//!          ┌──────────────┐
//!          │   Codegen    │  AST → TypeScript text
//!          └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use service_synth::{DataType, Entity, Field, SynthConfig, Synthesizer};
//!
//! let synth = Synthesizer::new(SynthConfig::default())?;
//! let customer = Entity::new(
//!     "Customer",
//!     vec![
//!         Field::new("name", DataType::SingleLineText),
//!         Field::new("password", DataType::Password),
//!     ],
//! );
//!
//! let [service, base] = synth.synthesize("customer", "Customer", &customer)?;
//! std::fs::write(&service.path, &service.code)?;
//! std::fs::write(&base.path, &base.code)?;
//! ```

pub mod ast;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod entity;
pub mod synth;
pub mod template;

pub use config::SynthConfig;
pub use diagnostic::SynthError;
pub use entity::{DataType, Entity, Field};
pub use synth::{Module, Synthesizer};
pub use template::Templates;
