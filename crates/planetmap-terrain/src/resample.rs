//! Resampling the stitched cube into other charts.

use glam::{DVec2, DVec3};
use planetmap_cubesphere::{
    Chart, ChartFrame, CubeFace, MercatorProjection, project_to_cube, unproject_face,
};
use rayon::prelude::*;

use crate::face_grid::{CubeGrids, FaceGrid};
use crate::grid::BorderedGrid;
use crate::material::MaterialSample;

/// Sample the cube along a planet-local direction.
///
/// Heights are bilinearly interpolated and materials nearest-sampled from
/// the stitched face grid the direction falls on. The halo must be filled
/// for samples near face edges to be correct.
#[must_use]
pub fn sample_cube(grids: &CubeGrids, dir: DVec3) -> (u16, MaterialSample) {
    let w = grids.size();
    let scale = w as f64 * 0.5;
    let Some((face, p)) = project_to_cube(dir, scale, ChartFrame::Aligned) else {
        return (0, MaterialSample::default());
    };
    let grid = grids.face(face);

    // Interior sample `j` is centred at local `j + 0.5 - scale`, stored at `j + 1`.
    let x = p.x + scale + 0.5;
    let y = p.y + scale + 0.5;
    let xi = (x.floor().max(0.0) as usize).min(w);
    let yi = (y.floor().max(0.0) as usize).min(w);
    let fx = (x - xi as f64).clamp(0.0, 1.0);
    let fy = (y - yi as f64).clamp(0.0, 1.0);

    // Halo corners belong to no edge and are never stitched; skip their taps.
    let is_corner = |cx: usize, cy: usize| (cx == 0 || cx == w + 1) && (cy == 0 || cy == w + 1);
    let taps = [
        (xi, yi, (1.0 - fx) * (1.0 - fy)),
        (xi + 1, yi, fx * (1.0 - fy)),
        (xi, yi + 1, (1.0 - fx) * fy),
        (xi + 1, yi + 1, fx * fy),
    ];
    let (sum, weight) = taps
        .iter()
        .filter(|(cx, cy, _)| !is_corner(*cx, *cy))
        .fold((0.0, 0.0), |(sum, weight), &(cx, cy, wt)| {
            (sum + grid.heights().get(cx, cy) as f64 * wt, weight + wt)
        });
    let height = if weight > 0.0 { sum / weight } else { 0.0 };
    let height = height.round().clamp(0.0, u16::MAX as f64) as u16;

    let mx = (x.round().max(0.0) as usize).min(w + 1);
    let my = (y.round().max(0.0) as usize).min(w + 1);
    (height, grid.materials().get(mx, my))
}

fn resample_face(grids: &CubeGrids, face: CubeFace) -> FaceGrid {
    let w = grids.size();
    let scale = w as f64 * 0.5;
    let interior: Vec<(u16, MaterialSample)> = (0..w * w)
        .into_par_iter()
        .map(|i| {
            let (col, row) = (i % w, i / w);
            let x = col as f64 + 0.5 - scale;
            let y = row as f64 + 0.5 - scale;
            sample_cube(grids, unproject_face(face, x, y, scale, ChartFrame::Rotated45))
        })
        .collect();
    let heights: Vec<u16> = interior.iter().map(|s| s.0).collect();
    let materials: Vec<MaterialSample> = interior.iter().map(|s| s.1).collect();
    FaceGrid::from_grids(
        Chart::Face(face),
        BorderedGrid::from_interior(w, w, &heights).expect("one height per interior cell"),
        BorderedGrid::from_interior(w, w, &materials).expect("one material per interior cell"),
    )
}

/// Resample stitched aligned faces into faces of the 45°-rotated cube.
///
/// The returned grids have empty halos; stitch them again before shading.
#[must_use]
pub fn resample_45(grids: &CubeGrids) -> CubeGrids {
    let faces: Vec<FaceGrid> = CubeFace::ALL
        .par_iter()
        .map(|&face| resample_face(grids, face))
        .collect();
    tracing::debug!(size = grids.size(), "resampled cube into rotated frame");
    CubeGrids::new(faces).expect("resampled faces keep the validated input size")
}

/// Resample stitched aligned faces into a Mercator sheet reaching
/// `max_lat_deg` north and south. The halo ring is sampled too.
#[must_use]
pub fn resample_mercator(
    grids: &CubeGrids,
    projection: &MercatorProjection,
    max_lat_deg: f64,
) -> FaceGrid {
    let (w, h) = projection.sheet_size(max_lat_deg);
    let (w, h) = (w as usize, h as usize);
    let half = DVec2::new(w as f64, h as f64) * 0.5;
    let stride = w + 2;

    let samples: Vec<(u16, MaterialSample)> = (0..stride * (h + 2))
        .into_par_iter()
        .map(|i| {
            let col = (i % stride) as f64 - 1.0;
            let row = (i / stride) as f64 - 1.0;
            let p = DVec2::new(col + 0.5, row + 0.5) - half;
            sample_cube(grids, projection.unproject(p))
        })
        .collect();

    let heights = BorderedGrid::from_fn(w, h, |x, y| samples[y * stride + x].0);
    let materials = BorderedGrid::from_fn(w, h, |x, y| samples[y * stride + x].1);
    tracing::debug!(width = w, height = h, "resampled Mercator sheet");
    FaceGrid::from_grids(Chart::Mercator, heights, materials)
}
