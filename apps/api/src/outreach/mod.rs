// Outreach engine: two-stage ICP screening and message drafting.
// All vendor calls go through llm_client; nothing here talks HTTP to a vendor.

pub mod adapter;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod profile;
pub mod prompt_store;
pub mod prompts;
pub mod record;

#[cfg(test)]
pub(crate) mod test_support;
