/// Data source clients.
///
/// Submodules:
/// - `nbro` — NBRO air quality API: request + JSON parsing.
/// - `fixtures` (test only) — representative API response payloads.

pub mod nbro;

#[cfg(test)]
pub(crate) mod fixtures;
