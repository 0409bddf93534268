use std::fmt;

use crate::scanner::Scanner;
use crate::token::{Marker, Token};

/// A [`Token`] with a textual `info` label; an empty label marks an
/// anonymous segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Segment {
    pub info: String,
    pub token: Token,
}

impl Segment {
    pub fn new<S: Into<String>>(info: S, token: Token) -> Segment {
        Segment {
            info: info.into(),
            token,
        }
    }

    /// Reports if information about this segment exists.
    pub fn known(&self) -> bool {
        !self.info.is_empty()
    }

    /// Split this segment into two parts via `sep`; both parts keep the
    /// label.
    pub fn split(&self, sep: &Segment) -> (Segment, Segment) {
        let (l, r) = self.token.split(sep.token);
        (Segment::new(&self.info[..], l), Segment::new(&self.info[..], r))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.info, self.token)
    }
}

fn covers_or_before(a: &Segment, b: &Segment) -> bool {
    a.token.covers(b.token) || a.token.before(b.token)
}

/// Sort segments so that covering segments appear before the segments they
/// cover, and disjoint segments stay in input order.
pub fn sort_segments(values: &mut [Segment]) {
    values.sort_by(|a, b| {
        if covers_or_before(a, b) {
            std::cmp::Ordering::Less
        } else if covers_or_before(b, a) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    });
}

/// Sort like [`sort_segments`], with `order` as additional tiebreaker: for
/// segments with equal tokens, the one whose info appears earlier in `order`
/// wins.
pub fn sort_segments_by_order(values: &mut [Segment], order: &[&str]) {
    let rank = |seg: &Segment| -> isize {
        order
            .iter()
            .position(|info| seg.info == *info)
            .map_or(-1, |i| i as isize)
    };
    values.sort_by(|a, b| {
        if a.token != b.token {
            if covers_or_before(a, b) {
                std::cmp::Ordering::Less
            } else if covers_or_before(b, a) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        } else {
            rank(a).cmp(&rank(b))
        }
    });
}

/// Raised when a segment that should subdivide another is not covered by it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid segment {0}")]
pub struct SegmentateError(pub String);

impl Segment {
    /// Split this segment into subsegments: the covered `segments` in order,
    /// with anonymous gap segments filled in between them.
    pub fn segmentate(&self, segments: &[Segment]) -> Result<Vec<Segment>, SegmentateError> {
        let mut res = Vec::new();
        let mut rest = self.clone();
        for seg in segments {
            if !rest.token.covers(seg.token) {
                return Err(SegmentateError(seg.to_string()));
            }
            let (left, next) = rest.split(seg);
            if left.token.len() > 0 {
                res.push(Segment::new("", left.token));
            }
            res.push(seg.clone());
            rest = next;
        }
        if rest.token.len() > 0 {
            res.push(Segment::new("", rest.token));
        }
        Ok(res)
    }
}

impl<'a> Scanner<'a> {
    /// Split the full input of this scanner into segments; gaps between the
    /// given segments become anonymous segments.
    pub fn segmentate(&self, segments: &[Segment]) -> Result<Vec<Segment>, SegmentateError> {
        let all = Segment::new(
            "",
            Token::new(Marker(0), Marker(self.input().len())),
        );
        all.segmentate(segments)
    }
}
