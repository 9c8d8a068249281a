/// Three-valued logic, used to describe the seek contract of an iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trinary {
    False,
    True,
    Undefined,
}

impl From<bool> for Trinary {
    fn from(value: bool) -> Self {
        if value { Trinary::True } else { Trinary::False }
    }
}

impl std::fmt::Display for Trinary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Trinary::False => "false",
            Trinary::True => "true",
            Trinary::Undefined => "undefined",
        };
        f.write_str(s)
    }
}
