/// Data layer: core types, loading, querying and derived series.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table   │  Vec<Row>, header order
///   └──────────┘
///        │
///        ├────────────────┐
///        ▼                ▼
///   ┌──────────┐    ┌────────────┐
///   │  query   │    │ indicators │  moving averages, summary
///   └──────────┘    └────────────┘
///   predicates → FilterResult
/// ```

pub mod indicators;
pub mod loader;
pub mod model;
pub mod query;
