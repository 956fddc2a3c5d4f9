use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::calculators::{BoundedCalculator, ScalarCalculator};
use crate::color::{FileColorMapper, FULL_INTENSITY};
use crate::config::ColorMode;
use crate::error::{DiagramError, Result};
use crate::radius::FileRadiusCalculator;
use crate::tree::{GitFile, GitFolder, GitTree};

/// Gap between the canvas edge and the first row of top-level files
pub const OUTER_MARGIN: u64 = 10;

/// Gap between neighbouring circles and after the last shape on the x axis
pub const ITEM_MARGIN: u64 = 5;

/// Inset of a folder's files from its border
pub const FOLDER_PADDING: u64 = 5;

/// Gap around stacked folders
pub const FOLDER_GAP: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Point {
    pub x: u64,
    pub y: u64,
}

impl Point {
    pub fn new(x: u64, y: u64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Size {
    pub width: u64,
    pub height: u64,
}

impl Size {
    pub fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }
}

/// Hover text for a file circle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub path: String,
    pub size: u64,
    pub commit_count: usize,
}

/// A placed shape, in absolute diagram units
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Shape {
    Circle {
        center: Point,
        radius: u64,
        fill: String,
        label: String,
        tooltip: Tooltip,
    },
    Rectangle {
        origin: Point,
        width: u64,
        height: u64,
        label: String,
        path: String,
    },
}

/// Layout output: shapes in placement order plus the canvas size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Geometry {
    pub shapes: Vec<Shape>,
    pub size: Size,
}

/// How files are grouped on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPolicy {
    /// Every file in one row, no folder boxes
    Flat,
    /// Top-level files in a row, folders stacked below as boxes
    #[default]
    Foldered,
}

/// Per-file color intensity, decided before layout starts
#[derive(Debug, Clone)]
pub enum Coloring {
    Size,
    Risk(BTreeMap<String, u8>),
}

impl Coloring {
    pub fn for_mode(mode: ColorMode, files: &[&GitFile]) -> Result<Self> {
        match mode {
            ColorMode::Size => Ok(Coloring::Size),
            ColorMode::Risk => {
                let batch: Vec<(String, f64)> = files
                    .iter()
                    .map(|file| (file.path.clone(), file.risk_index()))
                    .collect();
                let intensities = BoundedCalculator
                    .calculate(&batch)?
                    .into_iter()
                    .map(|(path, intensity)| (path, intensity.round() as u8))
                    .collect();
                Ok(Coloring::Risk(intensities))
            }
        }
    }

    /// Shade for `file`; under risk coloring the file must belong to the scored batch
    pub fn intensity(&self, file: &GitFile) -> Result<u8> {
        match self {
            Coloring::Size => Ok(FULL_INTENSITY),
            Coloring::Risk(intensities) => intensities
                .get(&file.path)
                .copied()
                .ok_or_else(|| DiagramError::UnknownFile(file.path.clone())),
        }
    }
}

/// Checked sum of coordinate terms, failing with the path being placed
fn sum(path: &str, terms: &[u64]) -> Result<u64> {
    terms
        .iter()
        .try_fold(0u64, |acc, &term| acc.checked_add(term))
        .ok_or_else(|| DiagramError::CanvasOverflow(path.to_string()))
}

/// Trailing edges of a packed row of circles
#[derive(Debug, Clone, Copy)]
struct Row {
    right: u64,
    bottom: u64,
}

/// Lay out `tree` into absolute geometry.
///
/// Radii and intensities are computed once over every file in the tree, so a
/// deeply nested file and a top-level file share one scale.
pub fn layout<R, C>(
    tree: &GitTree,
    policy: LayoutPolicy,
    radius_calculator: &R,
    color_mapper: &C,
    mode: ColorMode,
) -> Result<Geometry>
where
    R: FileRadiusCalculator + ?Sized,
    C: FileColorMapper + ?Sized,
{
    if tree.is_empty() {
        return Ok(Geometry::default());
    }

    let files: Vec<&GitFile> = tree.files().collect();
    let mut packer = ShelfPacker {
        radii: radius_calculator.radii(&files)?,
        coloring: Coloring::for_mode(mode, &files)?,
        color_mapper,
        shapes: Vec::with_capacity(files.len()),
    };

    let size = match policy {
        LayoutPolicy::Flat => packer.pack_flat(files)?,
        LayoutPolicy::Foldered => packer.pack_foldered(tree)?,
    };

    Ok(Geometry {
        shapes: packer.shapes,
        size,
    })
}

/// Left-to-right shelf packer, applied at every folder level
struct ShelfPacker<'a, C: ?Sized> {
    radii: BTreeMap<String, u64>,
    coloring: Coloring,
    color_mapper: &'a C,
    shapes: Vec<Shape>,
}

impl<C: FileColorMapper + ?Sized> ShelfPacker<'_, C> {
    fn pack_flat(&mut self, files: Vec<&GitFile>) -> Result<Size> {
        info!("Writing files");
        let row = self.pack_row(files, Point::new(OUTER_MARGIN, OUTER_MARGIN))?;
        match row {
            Some(row) => Ok(Size::new(
                sum("canvas", &[row.right, ITEM_MARGIN])?,
                sum("canvas", &[row.bottom, OUTER_MARGIN])?,
            )),
            None => Ok(Size::default()),
        }
    }

    fn pack_foldered(&mut self, tree: &GitTree) -> Result<Size> {
        info!("Writing top-level files");
        let origin = Point::new(OUTER_MARGIN, OUTER_MARGIN);
        let row = self.pack_row(tree.top_level_files(), origin)?;

        let mut size = Size::default();
        let mut y = OUTER_MARGIN;
        if let Some(row) = row {
            size = Size::new(
                sum("canvas", &[row.right, ITEM_MARGIN])?,
                sum("canvas", &[row.bottom, OUTER_MARGIN])?,
            );
            y = sum("canvas", &[row.bottom, FOLDER_GAP])?;
        }

        info!("Writing foldered files");
        for folder in tree.folders() {
            let boxed = self.pack_folder(folder, Point::new(OUTER_MARGIN, y))?;
            let right = sum(folder.path(), &[OUTER_MARGIN, boxed.width, ITEM_MARGIN])?;
            size.width = size.width.max(right);
            size.height = size.height.max(sum(folder.path(), &[y, boxed.height])?);
            y = sum(folder.path(), &[y, boxed.height, FOLDER_GAP])?;
        }

        Ok(size)
    }

    /// Pack a folder with its top-left corner at `origin` and return its box size.
    ///
    /// Files go in a row inside the padding; subfolders stack beneath them.
    /// The folder's own rectangle is emitted after everything it contains.
    fn pack_folder(&mut self, folder: GitFolder<'_>, origin: Point) -> Result<Size> {
        info!("Writing folder {}/", folder.name());
        let path = folder.path();

        let inner = Point::new(
            sum(path, &[origin.x, FOLDER_PADDING])?,
            sum(path, &[origin.y, FOLDER_PADDING])?,
        );
        let row = self.pack_row(folder.files(), inner)?;

        // Row edges never sit left of or above the origin
        let (mut width, mut height) = match row {
            Some(row) => (
                sum(path, &[row.right, FOLDER_PADDING])? - origin.x,
                sum(path, &[row.bottom, FOLDER_PADDING])? - origin.y,
            ),
            None => (0, 0),
        };

        let subfolders = folder.folders();
        if !subfolders.is_empty() {
            let mut y = sum(path, &[row.map_or(origin.y, |row| row.bottom), FOLDER_GAP])?;
            let x = sum(path, &[origin.x, FOLDER_GAP])?;
            for subfolder in subfolders {
                let boxed = self.pack_folder(subfolder, Point::new(x, y))?;
                width = width.max(sum(path, &[FOLDER_GAP, boxed.width, FOLDER_GAP])?);
                y = sum(path, &[y, boxed.height, FOLDER_GAP])?;
            }
            height = y - origin.y;
        }

        self.shapes.push(Shape::Rectangle {
            origin,
            width,
            height,
            label: folder.name().to_string(),
            path: path.to_string(),
        });
        Ok(Size::new(width, height))
    }

    /// Place files left to right, largest first, each circle's top edge at `origin.y`.
    fn pack_row(&mut self, files: Vec<&GitFile>, origin: Point) -> Result<Option<Row>> {
        let mut sized = files
            .into_iter()
            .map(|file| self.radius(file).map(|radius| (file, radius)))
            .collect::<Result<Vec<_>>>()?;
        // Stable: equal radii keep insertion order
        sized.sort_by(|a, b| b.1.cmp(&a.1));

        let mut row: Option<Row> = None;
        let mut x = origin.x;
        for (file, radius) in sized {
            let center = Point::new(
                sum(&file.path, &[x, radius])?,
                sum(&file.path, &[origin.y, radius])?,
            );
            let right = sum(&file.path, &[center.x, radius])?;
            let bottom = sum(&file.path, &[center.y, radius])?;
            self.place_file(file, center, radius)?;

            x = sum(&file.path, &[right, ITEM_MARGIN])?;
            row = Some(Row {
                right,
                bottom: row.map_or(bottom, |r| r.bottom.max(bottom)),
            });
        }

        Ok(row)
    }

    fn place_file(&mut self, file: &GitFile, center: Point, radius: u64) -> Result<()> {
        info!("Writing file {}", file.name);

        let intensity = self.coloring.intensity(file)?;
        let fill = self.color_mapper.map(file.color_key(), intensity);

        self.shapes.push(Shape::Circle {
            center,
            radius,
            fill,
            label: file.name.clone(),
            tooltip: Tooltip {
                path: file.path.clone(),
                size: file.size,
                commit_count: file.commit_count(),
            },
        });
        Ok(())
    }

    fn radius(&self, file: &GitFile) -> Result<u64> {
        self.radii
            .get(&file.path)
            .copied()
            .ok_or_else(|| DiagramError::UnknownFile(file.path.clone()))
    }
}
