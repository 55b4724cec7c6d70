//! Grouped aggregations behind the three analysis views.
//!
//! Each view module turns a [`Dataset`](crate::record::Dataset) into a
//! serializable result made of the rows in [`types`]. Grouping, top-N
//! selection and long-form reshaping live in [`aggregate`].

pub mod aggregate;
pub mod lines;
pub mod stations;
pub mod trend;
pub mod types;
pub mod utility;
