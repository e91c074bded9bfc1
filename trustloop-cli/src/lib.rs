//! # trustloop-cli
//!
//! Command-line runner for the reflect-critique-correct loop.
//!
//! ```bash
//! export OPENAI_API_KEY=...
//! export TLM_API_KEY=...
//! trustloop run --text "The Eiffel Tower is 500 metres tall." \
//!     --question "How tall is the Eiffel Tower?" --threshold 0.87
//!
//! # LLM-as-judge scoring instead of the hosted scorer, JSON output
//! trustloop run --file answer.txt --scorer llm --json --require-pass
//! ```
//!
//! Settings come from an optional TOML file (`--config`), then `.env` and
//! the environment, then flags. See [`Config`].

pub mod cli;
pub mod config;
pub mod run;

pub use config::{Config, ScorerKind};
