//! Renders a repository file tree as a packed SVG diagram.
//!
//! Files become circles sized relative to the smallest file; folders become
//! rectangles around their contents. Build a [`GitTree`], optionally annotate
//! risk with a [`CodeQualityAnalyst`], then hand it to an [`SvgChartDataWriter`].

pub mod calculators;
pub mod color;
pub mod config;
pub mod diagram;
pub mod error;
pub mod layout;
pub mod radius;
pub mod risk;
pub mod svg;
pub mod tree;

pub use calculators::{BoundedCalculator, ScalarCalculator, UnboundedCalculator};
pub use color::{color_key, FileColorMapper, TableColorMapper};
pub use config::{ColorMode, DiagramConfig};
pub use diagram::{ChartData, SvgChartDataWriter};
pub use error::{DiagramError, Result};
pub use layout::{Geometry, LayoutPolicy, Point, Shape, Size};
pub use radius::{FileRadiusCalculator, UnboundedFileRadiusCalculator};
pub use risk::CodeQualityAnalyst;
pub use tree::{Commit, GitFile, GitFolder, GitTree};
