/// Data layer: core types, ingestion, and combination filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows (days, times) → Catalog
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Catalog  │  Vec<Section>, distinct courses
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  k-subsets of courses → rule predicates → combinations
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod parse;
