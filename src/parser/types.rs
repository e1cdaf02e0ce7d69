use std::fmt;


/// The types the verifier can attach to a node.
///
/// `Any` is what an identifier reference gets before its declaration is consulted, and it is
/// compatible with every other type. `None` marks constructs that produce no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Text,
    Number,
    Integer,
    Float,
    Boolean,
    Any,
    LogicalComparator,
    None
}


impl Type {
    /// True if a value of this type may appear as an operand of a math expression.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Any)
    }


    /// Two types can be compared if they are identical or if either is `Any`.
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self == other || *self == Self::Any || *other == Self::Any
    }
}


impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
