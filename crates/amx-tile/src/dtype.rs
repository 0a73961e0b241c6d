use std::fmt;

/// Lane interpretation of an AMX-INT8 dot-product instruction.
///
/// The two letters after `tdpb` name the signedness of `src0` and `src1`
/// lanes respectively: `s` lanes are sign-extended to 32 bits, `u` lanes
/// are zero-extended. The accumulator is always a signed 32-bit dword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DotKind {
    /// `tdpbssd`: signed x signed.
    #[default]
    Ssd,
    /// `tdpbsud`: signed x unsigned.
    Sud,
    /// `tdpbusd`: unsigned x signed.
    Usd,
    /// `tdpbuud`: unsigned x unsigned.
    Uud,
}

impl DotKind {
    pub const ALL: [DotKind; 4] = [DotKind::Ssd, DotKind::Sud, DotKind::Usd, DotKind::Uud];

    /// Returns the instruction mnemonic, e.g. `"tdpbssd"`.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            DotKind::Ssd => "tdpbssd",
            DotKind::Sud => "tdpbsud",
            DotKind::Usd => "tdpbusd",
            DotKind::Uud => "tdpbuud",
        }
    }

    /// Parses an instruction mnemonic.
    pub fn from_mnemonic(s: &str) -> Option<DotKind> {
        DotKind::ALL.into_iter().find(|k| k.mnemonic() == s)
    }

    pub fn src0_signed(&self) -> bool {
        matches!(self, DotKind::Ssd | DotKind::Sud)
    }

    pub fn src1_signed(&self) -> bool {
        matches!(self, DotKind::Ssd | DotKind::Usd)
    }

    /// Widens one `src0` lane to 32 bits.
    pub fn extend_src0(&self, lane: i8) -> i32 {
        extend(lane, self.src0_signed())
    }

    /// Widens one `src1` lane to 32 bits.
    pub fn extend_src1(&self, lane: i8) -> i32 {
        extend(lane, self.src1_signed())
    }
}

fn extend(lane: i8, signed: bool) -> i32 {
    if signed {
        lane as i32
    } else {
        lane as u8 as i32
    }
}

impl fmt::Display for DotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonic_lookup() {
        for kind in DotKind::ALL {
            assert_eq!(DotKind::from_mnemonic(kind.mnemonic()), Some(kind));
        }
        assert_eq!(DotKind::from_mnemonic("tdpbf16ps"), None);
    }

    #[test]
    fn test_extension() {
        assert_eq!(DotKind::Ssd.extend_src0(-1), -1);
        assert_eq!(DotKind::Ssd.extend_src1(-128), -128);
        assert_eq!(DotKind::Uud.extend_src0(-1), 255);
        assert_eq!(DotKind::Uud.extend_src1(-128), 128);
        assert_eq!(DotKind::Sud.extend_src0(-2), -2);
        assert_eq!(DotKind::Sud.extend_src1(-2), 254);
        assert_eq!(DotKind::Usd.extend_src0(-2), 254);
        assert_eq!(DotKind::Usd.extend_src1(-2), -2);
    }

    #[test]
    fn test_default_is_signed() {
        assert_eq!(DotKind::default(), DotKind::Ssd);
        assert_eq!(DotKind::Uud.to_string(), "tdpbuud");
    }
}
