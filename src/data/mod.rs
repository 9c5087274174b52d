/// Data layer: core types, loading, normalization, writing and filtering.
///
/// Architecture:
/// ```text
///  coordinate_data/<name>            polar_data/<name>
///        │                                 │
///        ▼                                 ▼
///   ┌──────────┐                     ┌──────────┐
///   │  loader   │  trial ladder       │  loader   │  parse XFOIL polar
///   └──────────┘  → RawTable          └──────────┘  → Polar
///        │                                 │
///        ▼                                 ▼
///   ┌───────────┐                    ┌──────────────┐
///   │ normalize  │ → Airfoil          │ SummaryTable  │ long format
///   └───────────┘                    └──────────────┘
///        │                                 │
///        ▼                                 ▼
///   ┌──────────┐                     ┌──────────┐
///   │  writer   │ processed file      │  filter   │ scatter / series
///   └──────────┘                     └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod writer;
