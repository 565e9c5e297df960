use nalgebra::Point2;

/// `vertices` is an open ring, i.e. without the repeated closing vertex.
///
/// Collinear edges are ignored, so a degenerate ring counts as convex.
pub fn is_convex(vertices: &[Point2<f64>]) -> bool {
    if vertices.len() < 3 {
        return true;
    }

    let n = vertices.len();
    let mut sign = 0;

    for i in 0..n {
        let p1 = vertices[i];
        let p2 = vertices[(i + 1) % n];
        let p3 = vertices[(i + 2) % n];

        let v1 = p2 - p1;
        let v2 = p3 - p2;

        // Cross product in 2D
        let cross = v1.x * v2.y - v1.y * v2.x;
        if cross == 0.0 {
            continue;
        }

        let edge_sign = if cross > 0.0 { 1 } else { -1 };
        if sign == 0 {
            sign = edge_sign;
        } else if sign != edge_sign {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;
    use rstest::rstest;

    use super::is_convex;

    #[rstest]
    #[case(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], true)]
    #[case(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)], true)]
    #[case(vec![(0.0, 0.0), (2.0, 0.0), (1.0, 0.5), (2.0, 2.0), (0.0, 2.0)], false)]
    #[case(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0)], true)]
    #[case(vec![(0.0, 0.0), (1.0, 1.0)], true)]
    fn test_is_convex(#[case] points: Vec<(f64, f64)>, #[case] expected: bool) {
        let vertices = points
            .into_iter()
            .map(|(x, y)| Point2::new(x, y))
            .collect::<Vec<_>>();

        assert_eq!(is_convex(&vertices), expected);
    }
}
