//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐     ┌───────┐
//!   │  loader  │ ◄── │ cache │  keyed by path + mtime + size
//!   └──────────┘     └───────┘
//!        │
//!        ▼
//!   ┌───────────────┐
//!   │ EmployeeTable │  Vec<EmployeeRecord>, filter options
//!   └───────────────┘
//!        │  + FilterSelection
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  three row subsets (both / country / department)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate │  KPIs, distributions, hiring series, salaries
//!   └───────────┘
//!        │
//!        ▼
//!    DerivedViews
//! ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod views;

pub use aggregate::DatePolicy;
pub use error::{DataLoadError, DateParseError};
pub use filter::FilterSelection;
pub use model::{EmployeeRecord, EmployeeTable};
pub use views::DerivedViews;
