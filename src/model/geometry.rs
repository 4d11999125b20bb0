//! Periodic-boundary geometry helpers.
//!
//! All functions operate on plain `[f64; 3]` vectors and an orthorhombic box
//! given by its three edge lengths. Distances follow the minimum-image
//! convention; a zero box component disables wrapping along that axis.

pub type Vec3 = [f64; 3];

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Minimum-image vector pointing from `from` to `to`.
pub fn distance_vector(from: Vec3, to: Vec3, dimensions: Vec3) -> Vec3 {
    let mut d = sub(to, from);
    for axis in 0..3 {
        let length = dimensions[axis];
        if length > 0.0 {
            d[axis] -= length * (d[axis] / length).round();
        }
    }
    d
}

/// Minimum-image distance between two points.
pub fn distance(a: Vec3, b: Vec3, dimensions: Vec3) -> f64 {
    norm(distance_vector(a, b, dimensions))
}

/// Unit normal of the plane spanned by `a` and `b`, or the zero vector when
/// the two are parallel.
pub fn normal_vector(a: Vec3, b: Vec3) -> Vec3 {
    let n = cross(a, b);
    let length = norm(n);
    if length == 0.0 {
        [0.0; 3]
    } else {
        scale(n, 1.0 / length)
    }
}

/// Angle in degrees between the bond vectors `p1 -> p2` and `p2 -> p3`.
pub fn angle(p1: Vec3, p2: Vec3, p3: Vec3, dimensions: Vec3) -> f64 {
    let v1 = distance_vector(p1, p2, dimensions);
    let v2 = distance_vector(p2, p3, dimensions);
    let denominator = norm(v1) * norm(v2);
    if denominator == 0.0 {
        return 0.0;
    }
    (dot(v1, v2) / denominator).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Signed dihedral angle in degrees for the chain `p1 - p2 - p3 - p4`.
pub fn dihedral(p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3, dimensions: Vec3) -> f64 {
    let b1 = distance_vector(p1, p2, dimensions);
    let b2 = distance_vector(p2, p3, dimensions);
    let b3 = distance_vector(p3, p4, dimensions);

    let n1 = normal_vector(b1, b2);
    let n2 = normal_vector(b2, b3);

    let b2_length = norm(b2);
    if b2_length == 0.0 {
        return 0.0;
    }

    let x = dot(cross(n1, n2), scale(b2, 1.0 / b2_length));
    let y = dot(n1, n2);
    x.atan2(y).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: Vec3 = [10.0, 10.0, 10.0];

    #[test]
    fn distance_uses_minimum_image() {
        let d = distance([0.5, 0.0, 0.0], [9.5, 0.0, 0.0], BOX);
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distance_vector_points_across_boundary() {
        let v = distance_vector([9.5, 5.0, 5.0], [0.5, 5.0, 5.0], BOX);
        assert!((v[0] - 1.0).abs() < 1e-12);
        assert_eq!(v[1], 0.0);
    }

    #[test]
    fn zero_box_disables_wrapping() {
        let d = distance([0.0, 0.0, 0.0], [9.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        assert!((d - 9.0).abs() < 1e-12);
    }

    #[test]
    fn straight_chain_has_zero_bond_angle() {
        let a = angle([1.0, 1.0, 1.0], [2.0, 1.0, 1.0], [3.0, 1.0, 1.0], BOX);
        assert!(a.abs() < 1e-9);
    }

    #[test]
    fn right_angle_between_bond_vectors() {
        let a = angle([1.0, 1.0, 1.0], [2.0, 1.0, 1.0], [2.0, 2.0, 1.0], BOX);
        assert!((a - 90.0).abs() < 1e-9);
    }

    #[test]
    fn dihedral_cis_and_trans() {
        let p1 = [1.0, 2.0, 1.0];
        let p2 = [1.0, 1.0, 1.0];
        let p3 = [2.0, 1.0, 1.0];

        let cis = dihedral(p1, p2, p3, [2.0, 2.0, 1.0], BOX);
        assert!(cis.abs() < 1e-9);

        let trans = dihedral(p1, p2, p3, [2.0, 0.0, 1.0], BOX);
        assert!((trans.abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn dihedral_sign_follows_handedness() {
        let p1 = [1.0, 2.0, 1.0];
        let p2 = [1.0, 1.0, 1.0];
        let p3 = [2.0, 1.0, 1.0];
        let plus = dihedral(p1, p2, p3, [2.0, 1.0, 2.0], BOX);
        let minus = dihedral(p1, p2, p3, [2.0, 1.0, 0.0], BOX);
        assert!((plus.abs() - 90.0).abs() < 1e-9);
        assert!((plus + minus).abs() < 1e-9);
    }

    #[test]
    fn normal_of_parallel_vectors_is_zero() {
        assert_eq!(normal_vector([1.0, 0.0, 0.0], [2.0, 0.0, 0.0]), [0.0; 3]);
    }
}
