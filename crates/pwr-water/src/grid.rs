//! The (u,v) grid of tabulated single-phase points, used for vapor and
//! supercritical inversion via inverse-distance weighting in
//! (log10 v, u) space.

use crate::data::{GridPoint, Region, UvGridData};

struct GridNode {
    log_v: f64,
    u: f64,
    t_k: f64,
    p_pa: f64,
    region: Region,
}

pub struct UvGrid {
    nodes: Vec<GridNode>,
}

/// Number of nearest neighbours averaged by the IDW interpolation.
const K_NEAREST: usize = 6;
/// IDW power; 2 is the conventional choice.
const IDW_POWER: f64 = 2.0;

impl UvGrid {
    pub fn from_data(data: UvGridData) -> Self {
        let nodes = data
            .points
            .iter()
            .map(|p: &GridPoint| GridNode {
                log_v: p.v.max(1e-12).log10(),
                u: p.u * 1.0e3,
                t_k: p.t_k,
                p_pa: p.p_mpa * 1.0e6,
                region: p.region,
            })
            .collect();
        Self { nodes }
    }

    /// Inverse-distance-weighted (T, P) at (u [J/kg], v [m^3/kg]) over the
    /// nearest grid cells tagged with `region`. Returns `None` if no point
    /// of that region exists.
    pub fn interpolate(&self, u: f64, v: f64, region: Region) -> Option<(f64, f64)> {
        let log_v = v.max(1e-12).log10();
        let mut dists: Vec<(f64, &GridNode)> = self
            .nodes
            .iter()
            .filter(|n| n.region == region)
            .map(|n| {
                let du = n.u - u;
                let dv = n.log_v - log_v;
                ((du * du + dv * dv).sqrt(), n)
            })
            .collect();
        if dists.is_empty() {
            return None;
        }
        dists.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        // Exact hit: avoid dividing by zero.
        if let Some((d0, n0)) = dists.first() {
            if *d0 < 1e-9 {
                return Some((n0.t_k, n0.p_pa));
            }
        }

        let nearest = &dists[..dists.len().min(K_NEAREST)];
        let mut sum_w = 0.0;
        let mut sum_wt = 0.0;
        let mut sum_wp = 0.0;
        for (d, n) in nearest {
            let w = 1.0 / d.powf(IDW_POWER);
            sum_w += w;
            sum_wt += w * n.t_k;
            sum_wp += w * n.p_pa;
        }
        Some((sum_wt / sum_w, sum_wp / sum_w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GridPoint;

    fn toy_grid() -> UvGrid {
        let points = vec![
            GridPoint {
                u: 2600.0,
                v: 1.0,
                t_k: 400.0,
                t_c: 126.85,
                p_mpa: 0.25,
                region: Region::Vapor,
                curve: None,
            },
            GridPoint {
                u: 2700.0,
                v: 1.2,
                t_k: 420.0,
                t_c: 146.85,
                p_mpa: 0.22,
                region: Region::Vapor,
                curve: None,
            },
            GridPoint {
                u: 1200.0,
                v: 0.0012,
                t_k: 500.0,
                t_c: 226.85,
                p_mpa: 5.0,
                region: Region::CompressedLiquid,
                curve: None,
            },
        ];
        UvGrid::from_data(UvGridData {
            n_points: points.len(),
            points,
        })
    }

    #[test]
    fn exact_match_returns_node_values() {
        let grid = toy_grid();
        let (t, p) = grid
            .interpolate(2_600_000.0, 1.0, Region::Vapor)
            .unwrap();
        assert!((t - 400.0).abs() < 1e-6);
        assert!((p - 0.25e6).abs() < 1.0);
    }

    #[test]
    fn interpolated_point_between_two_nodes() {
        let grid = toy_grid();
        let (t, _p) = grid
            .interpolate(2_650_000.0, 1.1, Region::Vapor)
            .unwrap();
        assert!(t > 400.0 && t < 420.0);
    }

    #[test]
    fn missing_region_returns_none() {
        let grid = toy_grid();
        assert!(grid.interpolate(1000.0, 0.01, Region::Supercritical).is_none());
    }
}
