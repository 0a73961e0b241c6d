use crate::dtype::DotKind;

/// One dword update: `c + sum(extend(x[i]) * extend(y[i]))` for `i in 0..4`.
///
/// Each product of two widened bytes fits in 32 bits; the running sum wraps
/// on overflow like the hardware accumulator.
#[inline]
pub fn dpbd(kind: DotKind, c: i32, x: [i8; 4], y: [i8; 4]) -> i32 {
    x.iter().zip(y.iter()).fold(c, |acc, (&a, &b)| {
        acc.wrapping_add(kind.extend_src0(a) * kind.extend_src1(b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_dot() {
        assert_eq!(dpbd(DotKind::Ssd, 0, [1, 2, 3, 4], [5, 6, 7, 8]), 70);
        assert_eq!(dpbd(DotKind::Ssd, 10, [-1, -2, -3, -4], [1, 1, 1, 1]), 0);
        assert_eq!(dpbd(DotKind::Ssd, 0, [-128; 4], [-128; 4]), 65536);
    }

    #[test]
    fn test_unsigned_dot() {
        assert_eq!(dpbd(DotKind::Uud, 0, [-1; 4], [-1; 4]), 4 * 255 * 255);
        assert_eq!(dpbd(DotKind::Sud, 0, [-1, 0, 0, 0], [-1, 0, 0, 0]), -255);
        assert_eq!(dpbd(DotKind::Usd, 0, [-1, 0, 0, 0], [-1, 0, 0, 0]), -255);
    }

    #[test]
    fn test_accumulator_wraps() {
        assert_eq!(dpbd(DotKind::Ssd, i32::MAX, [1, 0, 0, 0], [1, 0, 0, 0]), i32::MIN);
        assert_eq!(dpbd(DotKind::Ssd, i32::MIN, [-1, 0, 0, 0], [1, 0, 0, 0]), i32::MAX);
    }
}
