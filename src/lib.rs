//! wondergrid - Period sets and span-compressed table decoding for WONDER responses
//!
//! This crate provides two pieces used when querying a WONDER-style statistics
//! service: calendar period arithmetic (years, months and canonical month sets)
//! and a decoder that rebuilds a dense, rectangular table from the service's
//! sparse, label-compressed `<r>`/`<c>` response rows.
//!
//! # Quick Start
//!
//! ```rust
//! use wondergrid::{CellValue, DecoderBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let decoder = DecoderBuilder::new()
//!         .with_groupings(["Year"])
//!         .build()?;
//!
//!     let xml = r#"<r><c l="2019"/><c v="1,234"/><c v="4,903,185"/><c v="25.2"/></r>"#;
//!     let frame = decoder.frame_str(xml)?;
//!
//!     let deaths: Vec<_> = frame.column("Deaths").unwrap().collect();
//!     assert_eq!(deaths, vec![&CellValue::Number(1234.0)]);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Periods
//!
//! ```rust
//! use wondergrid::{CalendarMonth, PeriodSet, Year};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let months = PeriodSet::range(CalendarMonth::new(11, 2019)?, CalendarMonth::new(2, 2020)?)?;
//!     assert_eq!(months.len(), 4);
//!
//!     let all = PeriodSet::union(&months, &PeriodSet::of(Year::new(2020)));
//!     assert_eq!(all.len(), 14);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Convert to String
//!
//! ```rust
//! use std::io::Cursor;
//! use wondergrid::{DecoderBuilder, OutputFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let decoder = DecoderBuilder::new()
//!         .with_groupings(["Group"])
//!         .with_trailing_columns(["Deaths"])
//!         .with_output_format(OutputFormat::Csv)
//!         .build()?;
//!
//!     let xml = r#"<r><c l="Total" r="2"/><c v="10"/></r><r><c v="20"/></r>"#;
//!     let csv = decoder.convert_to_string(Cursor::new(xml))?;
//!     assert_eq!(csv, "Group,Deaths\nTotal,10\nTotal,20\n");
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod dates;
mod error;
mod formatter;
mod frame;
mod grid;
mod output;
mod parser;
mod period;
mod security;
mod types;

// 公開API
pub use api::{OutputFormat, SpanPolicy};
pub use builder::{Decoder, DecoderBuilder};
pub use dates::PeriodSet;
pub use error::WonderError;
pub use frame::{Frame, DEFAULT_TRAILING_COLUMNS};
pub use grid::{decode, GridDecoder, Table};
pub use parser::parse_rows;
pub use period::{CalendarMonth, Period, Year, NUM_MONTHS};
pub use types::{CellSpec, CellValue, RawCell, RowRecord};
