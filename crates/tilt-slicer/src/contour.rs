//! Contour reconstruction from cut edges.
//!
//! Cut edges from a bisection are an unordered soup. Contours are rebuilt by
//! greedy traversal of the edge graph: start on an unused edge, keep stepping
//! to an unused edge sharing the current vertex, stop when the start vertex
//! comes around again (closed) or nothing connects (open).

use std::collections::VecDeque;

use tilt_math::Point2;
use tilt_mesh::CutEdges;

use crate::path::Path;

/// Rebuild polylines from a cut-edge set, projected onto XY.
///
/// Each traversal is capped at twice the edge count.
pub fn build_contours(cut: &CutEdges) -> Vec<Path> {
    build_contours_with_limit(cut, cut.edges.len() * 2)
}

/// Rebuild polylines with an explicit per-contour step limit.
///
/// A contour that reaches `max_steps` is returned as traced so far with
/// `truncated` set. Contours with fewer than two points are dropped.
pub fn build_contours_with_limit(cut: &CutEdges, max_steps: usize) -> Vec<Path> {
    let edges = &cut.edges;
    if edges.is_empty() {
        return Vec::new();
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); cut.points.len()];
    let mut used = vec![false; edges.len()];
    for (i, &[a, b]) in edges.iter().enumerate() {
        if a >= cut.points.len() || b >= cut.points.len() {
            used[i] = true;
            continue;
        }
        adjacency[a].push(i);
        if b != a {
            adjacency[b].push(i);
        }
    }

    let next_unused = |vertex: usize, used: &[bool]| -> Option<usize> {
        adjacency[vertex].iter().copied().find(|&e| !used[e])
    };

    let mut contours = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let first = edges[start][0];
        let mut chain: VecDeque<usize> = VecDeque::from([first]);
        let mut current = first;
        let mut runner = start;
        let mut steps = 0;
        let mut closed = false;
        let mut truncated = false;

        // Forward walk
        loop {
            if steps >= max_steps {
                truncated = true;
                break;
            }
            steps += 1;

            let next = other_end(edges[runner], current);
            if next == first {
                closed = true;
                break;
            }
            chain.push_back(next);
            current = next;

            match next_unused(current, &used) {
                Some(edge) => {
                    used[edge] = true;
                    runner = edge;
                }
                None => break,
            }
        }

        // Open chain: pick up whatever hangs off the start vertex
        if !closed && !truncated {
            let mut current = first;
            while let Some(edge) = next_unused(current, &used) {
                if steps >= max_steps {
                    truncated = true;
                    break;
                }
                steps += 1;
                used[edge] = true;
                current = other_end(edges[edge], current);
                chain.push_front(current);
            }
        }

        if chain.len() < 2 {
            continue;
        }

        let points = chain
            .iter()
            .map(|&v| Point2::new(cut.points[v].x, cut.points[v].y))
            .collect();
        contours.push(Path {
            points,
            closed,
            truncated,
        });
    }

    contours
}

fn other_end(edge: [usize; 2], vertex: usize) -> usize {
    if edge[0] == vertex {
        edge[1]
    } else {
        edge[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tilt_math::Point3;

    fn cut(points: &[(f64, f64)], edges: &[[usize; 2]]) -> CutEdges {
        CutEdges {
            points: points.iter().map(|&(x, y)| Point3::new(x, y, 1.0)).collect(),
            edges: edges.to_vec(),
        }
    }

    #[test]
    fn test_square_closes() {
        // edges deliberately shuffled and reversed
        let cut = cut(
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            &[[2, 1], [0, 3], [1, 0], [3, 2]],
        );
        let contours = build_contours(&cut);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        assert!(c.closed);
        assert!(!c.truncated);
        assert_eq!(c.len(), 4);
        // The start vertex is not repeated
        assert_abs_diff_eq!(c.length(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_loops() {
        let cut = cut(
            &[
                (0.0, 0.0),
                (1.0, 0.0),
                (0.0, 1.0),
                (5.0, 5.0),
                (6.0, 5.0),
                (5.0, 6.0),
            ],
            &[[0, 1], [3, 4], [1, 2], [4, 5], [2, 0], [5, 3]],
        );
        let contours = build_contours(&cut);
        assert_eq!(contours.len(), 2);
        assert!(contours.iter().all(|c| c.closed && c.len() == 3));
    }

    #[test]
    fn test_open_chain_is_kept_whole() {
        // Chain 0-1-2-3, traversal starts on the middle edge
        let cut = cut(
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)],
            &[[1, 2], [0, 1], [2, 3]],
        );
        let contours = build_contours(&cut);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        assert!(!c.closed);
        assert_eq!(c.len(), 4);
        assert_abs_diff_eq!(c.length(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_edge_is_open_segment() {
        let cut = cut(&[(0.0, 0.0), (2.0, 0.0)], &[[0, 1]]);
        let contours = build_contours(&cut);
        assert_eq!(contours.len(), 1);
        assert!(!contours[0].closed);
        assert_eq!(contours[0].len(), 2);
    }

    #[test]
    fn test_step_limit_truncates() {
        let cut = cut(
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            &[[0, 1], [1, 2], [2, 3], [3, 0]],
        );
        let contours = build_contours_with_limit(&cut, 2);
        assert!(contours[0].truncated);
        assert!(!contours[0].closed);
        assert_eq!(contours[0].len(), 3);
        // remaining edges still end up in some contour
        assert!(contours.len() >= 2);
    }

    #[test]
    fn test_degenerate_edges_are_dropped() {
        let cut = cut(&[(0.0, 0.0)], &[[0, 0], [0, 7]]);
        assert!(build_contours(&cut).is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(build_contours(&CutEdges::default()).is_empty());
    }
}
