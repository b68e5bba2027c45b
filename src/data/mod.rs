/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (cached once per process)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ RawTable  │  Vec<RawRecord>, headers resolved
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  derive weekday/term, dedup, filter, sort → Vec<Session>
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
