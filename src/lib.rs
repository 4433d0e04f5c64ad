//! Navigation heat maps for AI agents, served over MCP.
//!
//! heattrail records which resources an agent visits while pursuing a stated intent,
//! folds those visits into a heat map over resources (nodes) and transitions
//! (edges), and keeps every finished session as a *knowledge path* with its reported
//! success. Given a new intent it ranks the successful paths and returns a loading
//! plan that fits a token budget.
//!
//! | Intent | Matched by (examples) |
//! |--------|------------------------|
//! | **debug** | fix, bug, error, crash |
//! | **implementation** | implement, build, create, add |
//! | **research** | research, explore, learn, investigate |
//! | **documentation** | document, docs, readme, explain |
//! | **planning** | plan, design, architect, roadmap |
//! | **general** | anything else |
//!
//! # Architecture
//!
//! - **Storage**: one JSON heat-map document plus one document per session, under a
//!   configurable root (`~/.heattrail` by default)
//! - **Writes**: load → mutate → save through the single [`heat::HeatStore`] owned by
//!   the [`engine::Engine`]; saves are atomic renames
//! - **Ranking**: composite exact-intent / edit-distance / keyword / category score
//! - **Transport**: MCP over stdio (primary) or streamable HTTP
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`heat`]: Heat-map document, persistence, summaries and decay
//! - [`intent`]: Keyword-based intent classification
//! - [`session`]: Session lifecycle and handles
//! - [`relevance`] / [`planner`]: Ranking and token-bounded plans
//! - [`engine`]: The facade every transport drives

pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod heat;
pub mod intent;
pub mod planner;
pub mod relevance;
pub mod server;
pub mod session;
pub mod sync;
pub mod tools;
