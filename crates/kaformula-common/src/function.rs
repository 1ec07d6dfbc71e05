use std::fmt;

/// How many arguments a built-in accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Which collection the host is asked for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    Number,
    Text,
}

/// Relationship keywords recognised inside a range function's argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeKeyword {
    ChildsNotNull,
    ParentNotNull,
    ParentsNotNull,
    Childs,
    Parents,
    Parent,
}

impl RangeKeyword {
    /// Search order. Each keyword precedes every keyword that is a
    /// substring of it.
    pub const PRIORITY: [RangeKeyword; 6] = [
        RangeKeyword::ChildsNotNull,
        RangeKeyword::ParentNotNull,
        RangeKeyword::ParentsNotNull,
        RangeKeyword::Childs,
        RangeKeyword::Parents,
        RangeKeyword::Parent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RangeKeyword::ChildsNotNull => "childsnotnull",
            RangeKeyword::ParentNotNull => "parentnotnull",
            RangeKeyword::ParentsNotNull => "parentsnotnull",
            RangeKeyword::Childs => "childs",
            RangeKeyword::Parents => "parents",
            RangeKeyword::Parent => "parent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
    }

    /// Find the first keyword (in priority order) occurring anywhere in
    /// `name`, ignoring ASCII case. Returns the keyword and the byte offset
    /// just past it.
    ///
    /// Any prefix or suffix around the keyword is tolerated, so
    /// `xparentsy` matches `parents`. `parents` is tried before `parent`,
    /// unlike the older listing that put `parent` first and so could never
    /// select `parents`.
    pub fn locate(name: &str) -> Option<(Self, usize)> {
        let lowered = name.to_ascii_lowercase();
        Self::PRIORITY.into_iter().find_map(|k| {
            lowered
                .find(k.as_str())
                .map(|start| (k, start + k.as_str().len()))
        })
    }
}

impl fmt::Display for RangeKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(2).accepts(1));
    }

    #[test]
    fn longer_keywords_win_over_their_substrings() {
        assert_eq!(
            RangeKeyword::locate("parentnotnull"),
            Some((RangeKeyword::ParentNotNull, 13))
        );
        assert_eq!(
            RangeKeyword::locate("PARENTS"),
            Some((RangeKeyword::Parents, 7))
        );
        assert_eq!(
            RangeKeyword::locate("childsNotNull"),
            Some((RangeKeyword::ChildsNotNull, 13))
        );
        assert_eq!(RangeKeyword::locate("parent"), Some((RangeKeyword::Parent, 6)));
        assert_eq!(RangeKeyword::locate("amount"), None);
    }

    #[test]
    fn surrounding_characters_are_tolerated() {
        assert_eq!(
            RangeKeyword::locate("my_childs_x"),
            Some((RangeKeyword::Childs, 9))
        );
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(RangeKeyword::parse("Childs"), Some(RangeKeyword::Childs));
        assert_eq!(RangeKeyword::parse("child"), None);
    }
}
