/// Data layer: core types, loading, caching and selection.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv upload
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  content hash → Arc<Dataset>, loads on miss
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse → RawTable → validate, coerce, drop, derive → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection (≥ 5 states) → filtered records
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod states;
