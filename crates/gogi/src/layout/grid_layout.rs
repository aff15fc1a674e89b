//! Grid layout.
//!
//! Children fill cells row-major in `columns` columns. A column is as wide as
//! its widest child and a row as tall as its tallest, margins included. Extra
//! or missing space is shared between tracks the same way a row shares it
//! between children; a track stretches if any of its cells does.

use gogi_core::{Rect, Size};
use gogi_style::{Align, ResolvedStyle};

use super::{Arrangement, AxisItem, Distribution, LayoutItem, distribute, place_cross};
use crate::geometry::Orientation;

/// Column and row track sizes of a grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridTracks {
    pub column_prefs: Vec<f32>,
    pub column_mins: Vec<f32>,
    pub column_stretch: Vec<bool>,
    pub row_prefs: Vec<f32>,
    pub row_mins: Vec<f32>,
    pub row_stretch: Vec<bool>,
}

impl GridTracks {
    pub fn preferred_size(&self, spacing: f32) -> Size {
        Size::new(
            track_sum(&self.column_prefs, spacing),
            track_sum(&self.row_prefs, spacing),
        )
    }

    pub fn min_size(&self, spacing: f32) -> Size {
        Size::new(
            track_sum(&self.column_mins, spacing),
            track_sum(&self.row_mins, spacing),
        )
    }

    fn column_items(&self) -> Vec<AxisItem> {
        tracks_as_items(&self.column_prefs, &self.column_mins, &self.column_stretch)
    }

    fn row_items(&self) -> Vec<AxisItem> {
        tracks_as_items(&self.row_prefs, &self.row_mins, &self.row_stretch)
    }
}

fn track_sum(tracks: &[f32], spacing: f32) -> f32 {
    if tracks.is_empty() {
        return 0.0;
    }
    tracks.iter().sum::<f32>() + spacing * (tracks.len() - 1) as f32
}

fn tracks_as_items(prefs: &[f32], mins: &[f32], stretch: &[bool]) -> Vec<AxisItem> {
    prefs
        .iter()
        .zip(mins)
        .zip(stretch)
        .map(|((&pref, &min), &stretch)| AxisItem {
            pref,
            min,
            max: None,
            stretch,
            margin: 0.0,
        })
        .collect()
}

/// Cell position of the `index`th child.
#[inline]
fn cell(index: usize, columns: usize) -> (usize, usize) {
    (index % columns, index / columns)
}

/// Compute track sizes for `items` placed in `columns` columns.
pub fn grid_tracks(columns: usize, items: &[LayoutItem]) -> GridTracks {
    let columns = columns.max(1);
    let n = items.len();
    let used_columns = columns.min(n);
    let rows = n.div_ceil(columns);

    let mut tracks = GridTracks {
        column_prefs: vec![0.0; used_columns],
        column_mins: vec![0.0; used_columns],
        column_stretch: vec![false; used_columns],
        row_prefs: vec![0.0; rows],
        row_mins: vec![0.0; rows],
        row_stretch: vec![false; rows],
    };

    for (i, item) in items.iter().enumerate() {
        let (col, row) = cell(i, columns);
        let outer = 2.0 * item.margin;
        let w = &item.req.width;
        let h = &item.req.height;
        tracks.column_prefs[col] = tracks.column_prefs[col].max(w.pref + outer);
        tracks.column_mins[col] = tracks.column_mins[col].max(w.min + outer);
        tracks.column_stretch[col] |= w.stretch;
        tracks.row_prefs[row] = tracks.row_prefs[row].max(h.pref + outer);
        tracks.row_mins[row] = tracks.row_mins[row].max(h.min + outer);
        tracks.row_stretch[row] |= h.stretch;
    }
    tracks
}

pub(super) fn arrange(style: &ResolvedStyle, content: Rect, items: &[LayoutItem]) -> Arrangement {
    let tracks = grid_tracks(style.columns, items);
    let columns = distribute(
        &tracks.column_items(),
        content.width(),
        style.spacing,
        Align::Start,
    );
    let rows = distribute(
        &tracks.row_items(),
        content.height(),
        style.spacing,
        Align::Start,
    );

    let columns_count = style.columns.max(1);
    let mut rects = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let (col, row) = cell(i, columns_count);
        let (x, w) = place_cross(
            &AxisItem::new(item.req.axis(Orientation::Horizontal), item.margin),
            columns.sizes[col],
            style.horizontal_align,
        );
        let (y, h) = place_cross(
            &AxisItem::new(item.req.axis(Orientation::Vertical), item.margin),
            rows.sizes[row],
            style.vertical_align,
        );
        rects.push(Rect::new(
            content.left() + columns.offsets[col] + x,
            content.top() + rows.offsets[row] + y,
            w,
            h,
        ));
    }

    Arrangement {
        rects,
        overflow: columns.overflow || rows.overflow,
        used: Size::new(span(&columns, style.spacing), span(&rows, style.spacing)),
    }
}

fn span(dist: &Distribution, spacing: f32) -> f32 {
    track_sum(&dist.sizes, spacing)
}

#[cfg(test)]
mod tests {
    use gogi_style::LayoutMode;

    use super::super::arrange as arrange_mode;
    use super::*;
    use crate::geometry::{AxisReq, SizeReq};

    fn req(w: f32, h: f32) -> SizeReq {
        SizeReq {
            width: AxisReq {
                pref: w,
                ..Default::default()
            },
            height: AxisReq {
                pref: h,
                ..Default::default()
            },
        }
    }

    fn four() -> Vec<LayoutItem> {
        [(10.0, 10.0), (20.0, 10.0), (10.0, 20.0), (20.0, 20.0)]
            .into_iter()
            .map(|(w, h)| LayoutItem::new(req(w, h), 0.0))
            .collect()
    }

    fn grid(columns: usize) -> ResolvedStyle {
        ResolvedStyle {
            layout_mode: LayoutMode::Grid,
            columns,
            ..Default::default()
        }
    }

    #[test]
    fn test_tracks_take_max_per_column_and_row() {
        let tracks = grid_tracks(2, &four());
        assert_eq!(tracks.column_prefs, vec![10.0, 20.0]);
        assert_eq!(tracks.row_prefs, vec![10.0, 20.0]);
        assert_eq!(tracks.preferred_size(0.0), Size::new(30.0, 30.0));
        assert_eq!(tracks.preferred_size(5.0), Size::new(35.0, 35.0));
    }

    #[test]
    fn test_partial_last_row() {
        let items = &four()[..3];
        let tracks = grid_tracks(2, items);
        assert_eq!(tracks.column_prefs.len(), 2);
        assert_eq!(tracks.row_prefs, vec![10.0, 20.0]);

        let single = grid_tracks(4, &four()[..1]);
        assert_eq!(single.column_prefs, vec![10.0]);
        assert_eq!(single.row_prefs, vec![10.0]);
    }

    #[test]
    fn test_arrange_cells() {
        let arr = arrange_mode(&grid(2), Rect::new(0.0, 0.0, 100.0, 100.0), &four());
        assert_eq!(arr.rects[0], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(arr.rects[1], Rect::new(10.0, 0.0, 20.0, 10.0));
        assert_eq!(arr.rects[2], Rect::new(0.0, 10.0, 10.0, 20.0));
        assert_eq!(arr.rects[3], Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(arr.used, Size::new(30.0, 30.0));
        assert!(!arr.overflow);
    }

    #[test]
    fn test_stretch_track_takes_leftover() {
        let mut items = four();
        items[1].req.width.stretch = true;
        let arr = arrange_mode(&grid(2), Rect::new(0.0, 0.0, 100.0, 100.0), &items);
        // Second column grows to 90; the stretching cell fills it.
        assert_eq!(arr.rects[1], Rect::new(10.0, 0.0, 90.0, 10.0));
        assert_eq!(arr.rects[3], Rect::new(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn test_zero_columns_treated_as_one() {
        let tracks = grid_tracks(0, &four());
        assert_eq!(tracks.column_prefs, vec![20.0]);
        assert_eq!(tracks.row_prefs.len(), 4);
    }
}
