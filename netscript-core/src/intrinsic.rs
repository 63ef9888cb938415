#![forbid(unsafe_code)]

/// Call targets expanded by the compiler instead of being emitted as a
/// generic operation named after the callee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Zeros,
    Ones,
    ZerosLike,
    OnesLike,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 4] = [
        Intrinsic::Zeros,
        Intrinsic::Ones,
        Intrinsic::ZerosLike,
        Intrinsic::OnesLike,
    ];

    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "zeros" => Some(Intrinsic::Zeros),
            "ones" => Some(Intrinsic::Ones),
            "zeros_like" => Some(Intrinsic::ZerosLike),
            "ones_like" => Some(Intrinsic::OnesLike),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::Zeros => "zeros",
            Intrinsic::Ones => "ones",
            Intrinsic::ZerosLike => "zeros_like",
            Intrinsic::OnesLike => "ones_like",
        }
    }

    /// `_like` variants take the output shape from the operand's shape;
    /// the others read it from the operand's values or a `shape` attribute.
    pub fn is_like(self) -> bool {
        matches!(self, Intrinsic::ZerosLike | Intrinsic::OnesLike)
    }

    pub fn fill_value(self) -> f32 {
        match self {
            Intrinsic::Ones | Intrinsic::OnesLike => 1.0,
            Intrinsic::Zeros | Intrinsic::ZerosLike => 0.0,
        }
    }

    /// Value of the `input_as_shape` flag when an operand is wired in.
    pub fn input_as_shape(self) -> i64 {
        if self.is_like() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_round_trips_names() {
        for intrinsic in Intrinsic::ALL {
            assert_eq!(Intrinsic::lookup(intrinsic.name()), Some(intrinsic));
        }
        assert_eq!(Intrinsic::lookup("full"), None);
        assert_eq!(Intrinsic::lookup("Zeros"), None);
    }

    #[test]
    fn fill_flags() {
        assert_eq!(Intrinsic::Ones.fill_value(), 1.0);
        assert_eq!(Intrinsic::ZerosLike.fill_value(), 0.0);
        assert_eq!(Intrinsic::Zeros.input_as_shape(), 1);
        assert_eq!(Intrinsic::OnesLike.input_as_shape(), 0);
    }
}
