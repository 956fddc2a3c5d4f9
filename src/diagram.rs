use serde::Serialize;

use crate::color::{FileColorMapper, TableColorMapper};
use crate::config::{ColorMode, DiagramConfig};
use crate::error::Result;
use crate::layout::{self, LayoutPolicy, Size};
use crate::radius::{FileRadiusCalculator, UnboundedFileRadiusCalculator};
use crate::svg;
use crate::tree::GitTree;

/// Rendered markup plus the canvas size it needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub data: String,
    pub size: Size,
}

/// Lays out a tree and serializes it as SVG elements
pub struct SvgChartDataWriter<R = UnboundedFileRadiusCalculator, C = TableColorMapper> {
    radius_calculator: R,
    color_mapper: C,
    mode: ColorMode,
    policy: LayoutPolicy,
}

impl SvgChartDataWriter {
    pub fn from_config(config: &DiagramConfig) -> Self {
        SvgChartDataWriter::new(
            UnboundedFileRadiusCalculator::default(),
            TableColorMapper::from_config(config),
        )
        .with_mode(config.mode)
        .with_policy(config.layout)
    }
}

impl<R: FileRadiusCalculator, C: FileColorMapper> SvgChartDataWriter<R, C> {
    pub fn new(radius_calculator: R, color_mapper: C) -> Self {
        Self {
            radius_calculator,
            color_mapper,
            mode: ColorMode::default(),
            policy: LayoutPolicy::default(),
        }
    }

    pub fn with_mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: LayoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn write_chart_data(&self, tree: &GitTree) -> Result<ChartData> {
        let geometry = layout::layout(
            tree,
            self.policy,
            &self.radius_calculator,
            &self.color_mapper,
            self.mode,
        )?;

        tracing::debug!(
            shapes = geometry.shapes.len(),
            width = geometry.size.width,
            height = geometry.size.height,
            "chart data written"
        );
        Ok(ChartData {
            data: svg::render(&geometry),
            size: geometry.size,
        })
    }
}
