//! Grid layout: children placed in cells of column and row tracks.
//!
//! Tracks resolve in three steps:
//! 1. `Fixed` tracks take their literal size.
//! 2. Content-sized tracks take the largest unmet requirement of the cells
//!    that span them. A cell's requirement, minus the fixed tracks it spans,
//!    is divided evenly among its non-fixed tracks (rounding up).
//! 3. Whatever space is left is split among `Parts` and `FitParts` tracks by
//!    weight: `unit = remaining / total_weight`, `track = weight * unit`.
//!
//! While measuring there is no "remaining space", so `Parts` and `FitParts`
//! are content-sized like `Auto`. While arranging, `FitParts` keep their
//! content size as a base and add their weighted share on top.

use std::collections::HashMap;

use crate::control::{ControlBehavior, ControlId, Orientation};
use crate::error::{Result, TrellisError};
use crate::geometry::{Rectangle, Size};
use crate::skin_registry::TypeTag;
use crate::tree::UiTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Literal size.
    Fixed,
    /// Sized to content.
    Auto,
    /// Weighted share of the remaining space.
    Parts,
    /// Content size plus a weighted share of the remaining space.
    FitParts,
}

/// A column or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackDefinition {
    pub mode: ResizeMode,
    /// Literal size for `Fixed`, weight for `Parts` and `FitParts`.
    pub size: i32,
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl TrackDefinition {
    pub fn fixed(size: i32) -> Self {
        Self::new(ResizeMode::Fixed, size)
    }

    pub fn auto() -> Self {
        Self::new(ResizeMode::Auto, 0)
    }

    pub fn parts(weight: i32) -> Self {
        Self::new(ResizeMode::Parts, weight)
    }

    pub fn fit_parts(weight: i32) -> Self {
        Self::new(ResizeMode::FitParts, weight)
    }

    fn new(mode: ResizeMode, size: i32) -> Self {
        Self {
            mode,
            size: size.max(0),
            min: None,
            max: None,
        }
    }

    pub fn with_min(mut self, min: i32) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: i32) -> Self {
        self.max = Some(max);
        self
    }

    fn clamp(&self, size: i32) -> i32 {
        let lo = self.min.unwrap_or(0);
        let hi = self.max.unwrap_or(i32::MAX).max(lo);
        size.clamp(lo, hi)
    }

    fn is_weighted(&self) -> bool {
        matches!(self.mode, ResizeMode::Parts | ResizeMode::FitParts)
    }
}

/// Where a child sits in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSlot {
    pub column: usize,
    pub row: usize,
    pub column_span: usize,
    pub row_span: usize,
}

impl Default for CellSlot {
    fn default() -> Self {
        Self {
            column: 0,
            row: 0,
            column_span: 1,
            row_span: 1,
        }
    }
}

impl CellSlot {
    fn span(&self, orientation: Orientation) -> (usize, usize) {
        match orientation {
            Orientation::Horizontal => (self.column, self.column_span),
            Orientation::Vertical => (self.row, self.row_span),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedTrack {
    offset: i32,
    size: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Grid {
    columns: Vec<TrackDefinition>,
    rows: Vec<TrackDefinition>,
    cells: HashMap<ControlId, CellSlot>,
}

const IMPLICIT_TRACK: [TrackDefinition; 1] = [TrackDefinition {
    mode: ResizeMode::Parts,
    size: 1,
    min: None,
    max: None,
}];

impl Grid {
    pub const TAG: TypeTag = TypeTag("Grid");

    pub fn new(columns: Vec<TrackDefinition>, rows: Vec<TrackDefinition>) -> Self {
        Self {
            columns,
            rows,
            cells: HashMap::new(),
        }
    }

    /// Column definitions; an empty list behaves as one `Parts(1)` column.
    pub fn columns(&self) -> &[TrackDefinition] {
        Self::effective(&self.columns)
    }

    pub fn rows(&self) -> &[TrackDefinition] {
        Self::effective(&self.rows)
    }

    fn effective(defs: &[TrackDefinition]) -> &[TrackDefinition] {
        if defs.is_empty() { &IMPLICIT_TRACK } else { defs }
    }

    fn tracks(&self, orientation: Orientation) -> &[TrackDefinition] {
        match orientation {
            Orientation::Horizontal => self.columns(),
            Orientation::Vertical => self.rows(),
        }
    }

    pub fn cell(&self, control: ControlId) -> CellSlot {
        self.cells.get(&control).copied().unwrap_or_default()
    }

    fn validate(&self, slot: &CellSlot) -> Result<()> {
        if slot.column_span == 0 || slot.row_span == 0 {
            return Err(TrellisError::InvalidArgument(
                "grid spans must be positive".to_string(),
            ));
        }
        let columns = self.columns().len();
        let rows = self.rows().len();
        if slot.column + slot.column_span > columns || slot.row + slot.row_span > rows {
            return Err(TrellisError::InvalidArgument(format!(
                "cell {:?} is outside a {}x{} grid",
                slot, columns, rows
            )));
        }
        Ok(())
    }

    /// Add `control` to `grid` at a single cell.
    pub fn add_control(
        tree: &mut UiTree,
        grid: ControlId,
        control: ControlId,
        column: usize,
        row: usize,
    ) -> Result<()> {
        Self::add_control_spanning(tree, grid, control, column, row, 1, 1)
    }

    /// Add `control` to `grid` covering `column_span` x `row_span` cells.
    pub fn add_control_spanning(
        tree: &mut UiTree,
        grid: ControlId,
        control: ControlId,
        column: usize,
        row: usize,
        column_span: usize,
        row_span: usize,
    ) -> Result<()> {
        let slot = CellSlot {
            column,
            row,
            column_span,
            row_span,
        };
        let behavior = tree.behavior::<Grid>(grid).ok_or_else(|| {
            TrellisError::InvalidArgument(format!("{:?} is not a grid", grid))
        })?;
        behavior.validate(&slot)?;
        tree.add_child(grid, control)?;
        if let Some(behavior) = tree.behavior_mut::<Grid>(grid) {
            behavior.cells.insert(control, slot);
        }
        Ok(())
    }

    /// Measure every visible child against its cell budget along both axes.
    fn requirements(&self, tree: &UiTree, id: ControlId, budget: Size) -> Vec<(CellSlot, Size)> {
        tree.children(id)
            .iter()
            .filter(|child| tree.get(**child).is_some_and(|c| c.is_visible()))
            .map(|child| {
                let slot = self.cell(*child);
                let available = Size::new(
                    self.cell_budget(Orientation::Horizontal, &slot, budget.width),
                    self.cell_budget(Orientation::Vertical, &slot, budget.height),
                );
                (slot, tree.expected_size(*child, available))
            })
            .collect()
    }

    /// The exact fixed sum when every spanned track is fixed, else `fallback`.
    fn cell_budget(&self, orientation: Orientation, slot: &CellSlot, fallback: i32) -> i32 {
        let (start, span) = slot.span(orientation);
        let tracks = &self.tracks(orientation)[start..start + span];
        if tracks.iter().all(|t| t.mode == ResizeMode::Fixed) {
            tracks.iter().map(|t| t.clamp(t.size)).sum()
        } else {
            fallback
        }
    }

    /// Content size of each track along one axis.
    fn content_sizes(&self, orientation: Orientation, cells: &[(CellSlot, Size)]) -> Vec<i32> {
        let tracks = self.tracks(orientation);
        let mut sizes = vec![0; tracks.len()];
        for (slot, size) in cells {
            let (start, span) = slot.span(orientation);
            let spanned = &tracks[start..start + span];
            let flexible = spanned
                .iter()
                .filter(|t| t.mode != ResizeMode::Fixed)
                .count() as i32;
            if flexible == 0 {
                continue;
            }
            let fixed: i32 = spanned
                .iter()
                .filter(|t| t.mode == ResizeMode::Fixed)
                .map(|t| t.clamp(t.size))
                .sum();
            let needed = match orientation {
                Orientation::Horizontal => size.width,
                Orientation::Vertical => size.height,
            };
            let unmet = (needed - fixed).max(0);
            let share = (unmet + flexible - 1) / flexible;
            for (index, track) in spanned.iter().enumerate() {
                if track.mode != ResizeMode::Fixed {
                    sizes[start + index] = sizes[start + index].max(share);
                }
            }
        }
        sizes
    }

    /// Track sizes for measuring: weighted tracks are content-sized.
    fn measure_axis(&self, orientation: Orientation, cells: &[(CellSlot, Size)]) -> i32 {
        let content = self.content_sizes(orientation, cells);
        self.tracks(orientation)
            .iter()
            .zip(content)
            .map(|(track, content)| match track.mode {
                ResizeMode::Fixed => track.clamp(track.size),
                _ => track.clamp(content),
            })
            .fold(0i32, |acc, size| acc.saturating_add(size))
    }

    /// Track sizes and offsets for arranging into `extent`.
    fn resolve_axis(
        &self,
        orientation: Orientation,
        cells: &[(CellSlot, Size)],
        extent: i32,
    ) -> Vec<ResolvedTrack> {
        let tracks = self.tracks(orientation);
        let content = self.content_sizes(orientation, cells);

        let mut sizes: Vec<i32> = tracks
            .iter()
            .zip(&content)
            .map(|(track, content)| match track.mode {
                ResizeMode::Fixed => track.clamp(track.size),
                ResizeMode::Auto => track.clamp(*content),
                ResizeMode::FitParts => *content,
                ResizeMode::Parts => 0,
            })
            .collect();

        let used: i32 = sizes.iter().sum();
        let remaining = (extent - used).max(0);
        let total_weight: i32 = tracks
            .iter()
            .filter(|t| t.is_weighted())
            .map(|t| t.size)
            .sum();
        if total_weight > 0 {
            let unit = remaining / total_weight;
            for (size, track) in sizes.iter_mut().zip(tracks) {
                if track.is_weighted() {
                    *size = track.clamp(*size + track.size * unit);
                }
            }
        }

        let mut offset = 0;
        sizes
            .into_iter()
            .map(|size| {
                let track = ResolvedTrack { offset, size };
                offset += size;
                track
            })
            .collect()
    }

    /// Resolved track sizes along one axis for the last arranged size of
    /// `grid`. Useful for hosts drawing grid lines.
    pub fn track_sizes(
        tree: &UiTree,
        grid: ControlId,
        orientation: Orientation,
    ) -> Option<Vec<i32>> {
        let behavior = tree.behavior::<Grid>(grid)?;
        let client = tree.get(grid)?.client_size();
        let cells = behavior.requirements(tree, grid, client);
        let extent = match orientation {
            Orientation::Horizontal => client.width,
            Orientation::Vertical => client.height,
        };
        Some(
            behavior
                .resolve_axis(orientation, &cells, extent)
                .into_iter()
                .map(|t| t.size)
                .collect(),
        )
    }
}

fn span_rect(tracks: &[ResolvedTrack], start: usize, span: usize) -> (i32, i32) {
    let spanned = &tracks[start..start + span];
    let offset = spanned.first().map(|t| t.offset).unwrap_or(0);
    (offset, spanned.iter().map(|t| t.size).sum())
}

impl ControlBehavior for Grid {
    behavior_identity!(Grid::TAG);

    fn measure_override(&self, tree: &UiTree, id: ControlId, max_client: Size) -> Size {
        let cells = self.requirements(tree, id, max_client);
        Size::new(
            self.measure_axis(Orientation::Horizontal, &cells),
            self.measure_axis(Orientation::Vertical, &cells),
        )
    }

    fn arrange_override(&mut self, tree: &mut UiTree, id: ControlId, client: Size) {
        self.cells.retain(|child, _| tree.children(id).contains(child));
        let cells = self.requirements(tree, id, client);
        let columns = self.resolve_axis(Orientation::Horizontal, &cells, client.width);
        let rows = self.resolve_axis(Orientation::Vertical, &cells, client.height);

        for child in tree.children(id).to_vec() {
            let slot = self.cell(child);
            let (x, width) = span_rect(&columns, slot.column, slot.column_span);
            let (y, height) = span_rect(&rows, slot.row, slot.row_span);
            tree.arrange_in(child, Rectangle::new(x, y, width, height));
        }
    }
}
