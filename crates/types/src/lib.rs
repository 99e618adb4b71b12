//! # quadlineage-types
//!
//! Core data types shared by the quadlineage crates:
//!
//! - **Point types**: `SamplePoint`, a sample identifier bound to a `geo::Point`
//! - **Metadata types**: `RawValue`, `SampleMetadata`
//! - **Lineage types**: `LineagePath`, `BinRecord`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use quadlineage_types::lineage::LineagePath;
//! use quadlineage_types::point::SamplePoint;
//!
//! let point = SamplePoint::new("site-1", 12.5, 40.0);
//! assert_eq!(point.id(), "site-1");
//!
//! let path = LineagePath::root().child(3).child(1);
//! assert_eq!(path.as_str(), "3.1.");
//! assert_eq!(path.truncate(1).as_deref(), Some("3"));
//! ```

pub mod lineage;
pub mod metadata;
pub mod point;
